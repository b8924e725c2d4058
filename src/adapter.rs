//! Connection adapters: transaction lifecycle plus (optionally) statement
//! reuse. One adapter instance wraps exactly one connection and must be
//! driven by a single task at a time; there is no internal cross-adapter
//! synchronization.

use crate::cache::LruStatementCache;
use crate::cache_key::SqlAndParamCountKeyBuilder;
use crate::connection::DriverConnection;
use crate::errors::StmtCacheError;
use crate::executor::StatementExecutor;
use crate::isolation::{TransactionDialect, TxOptions};
use crate::query::{Query, StatementReusePolicy};

fn begin_with_options<C: DriverConnection>(
    conn: &mut C,
    dialect: TransactionDialect,
    opts: TxOptions,
) -> Result<(), StmtCacheError> {
    match dialect {
        TransactionDialect::Mysql => {
            // MySQL/MariaDB: isolation applies to the NEXT transaction only
            // and must be set while no transaction is active.
            if let Some(level) = opts.isolation_level {
                conn.execute_direct(&TransactionDialect::isolation_sql(level))?;
            }
            conn.begin_transaction()
        }
        TransactionDialect::Postgres => {
            // PostgreSQL: BEGIN first, then scope isolation to the open
            // transaction.
            conn.begin_transaction()?;
            if let Some(level) = opts.isolation_level {
                conn.execute_direct(&TransactionDialect::isolation_sql(level))?;
            }
            Ok(())
        }
    }
}

fn ensure_no_active_transaction<C: DriverConnection>(conn: &C) -> Result<(), StmtCacheError> {
    if conn.is_transaction_active() {
        return Err(StmtCacheError::illegal_state(
            "cannot begin a transaction when one is already active",
        ));
    }
    Ok(())
}

/// Plain adapter: transaction lifecycle and parameter binding, no statement
/// reuse. Every parameterized query prepares a fresh handle.
pub struct ConnectionAdapter<C: DriverConnection> {
    conn: C,
    dialect: TransactionDialect,
    executor: StatementExecutor,
}

impl<C: DriverConnection> ConnectionAdapter<C> {
    pub fn new(conn: C, dialect: TransactionDialect) -> Self {
        Self {
            conn,
            dialect,
            executor: StatementExecutor,
        }
    }

    pub fn execute_query(&mut self, query: &Query) -> Result<u64, StmtCacheError> {
        if query.params.is_empty() {
            return self.conn.execute_direct(&query.sql);
        }
        let handle = self.conn.prepare(&query.sql)?;
        self.executor
            .execute(&mut self.conn, &handle, &query.params, &query.types)
    }

    pub fn begin_transaction_with_options(&mut self, opts: TxOptions) -> Result<(), StmtCacheError> {
        ensure_no_active_transaction(&self.conn)?;
        begin_with_options(&mut self.conn, self.dialect, opts)
    }

    pub fn commit(&mut self) -> Result<(), StmtCacheError> {
        self.conn.commit()
    }

    pub fn rollback(&mut self) -> Result<(), StmtCacheError> {
        self.conn.rollback()
    }

    pub fn close(&mut self) -> Result<(), StmtCacheError> {
        self.conn.close()
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }
}

/// Statement-caching adapter.
///
/// Keeps two LRU caches of prepared handles: one cleared at every
/// transaction boundary, one living for the whole connection. A query's
/// [`StatementReusePolicy`] selects which of them (if any) may serve it.
/// Reuse is best-effort; a miss at any time is normal and simply prepares a
/// fresh handle.
pub struct CachingConnectionAdapter<C: DriverConnection> {
    conn: C,
    dialect: TransactionDialect,
    executor: StatementExecutor,
    key_builder: SqlAndParamCountKeyBuilder,
    per_transaction: LruStatementCache<C::Handle>,
    per_connection: LruStatementCache<C::Handle>,
}

impl<C: DriverConnection> core::fmt::Debug for CachingConnectionAdapter<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachingConnectionAdapter")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl<C: DriverConnection> CachingConnectionAdapter<C> {
    /// Capacities are the caller-supplied configuration surface; either one
    /// below 1 is an [`StmtCacheError::InvalidConfiguration`].
    pub fn new(
        conn: C,
        dialect: TransactionDialect,
        per_transaction_capacity: usize,
        per_connection_capacity: usize,
    ) -> Result<Self, StmtCacheError> {
        Ok(Self {
            conn,
            dialect,
            executor: StatementExecutor,
            key_builder: SqlAndParamCountKeyBuilder,
            per_transaction: LruStatementCache::new(per_transaction_capacity)?,
            per_connection: LruStatementCache::new(per_connection_capacity)?,
        })
    }

    pub fn mysql(
        conn: C,
        per_transaction_capacity: usize,
        per_connection_capacity: usize,
    ) -> Result<Self, StmtCacheError> {
        Self::new(
            conn,
            TransactionDialect::Mysql,
            per_transaction_capacity,
            per_connection_capacity,
        )
    }

    pub fn postgres(
        conn: C,
        per_transaction_capacity: usize,
        per_connection_capacity: usize,
    ) -> Result<Self, StmtCacheError> {
        Self::new(
            conn,
            TransactionDialect::Postgres,
            per_transaction_capacity,
            per_connection_capacity,
        )
    }

    /// Fails with [`StmtCacheError::IllegalState`] before any statement is
    /// sent if a transaction is already active. A new transaction must never
    /// observe another transaction's cached handles, so the per-transaction
    /// cache is cleared up front.
    pub fn begin_transaction_with_options(&mut self, opts: TxOptions) -> Result<(), StmtCacheError> {
        ensure_no_active_transaction(&self.conn)?;
        self.per_transaction.clear();
        begin_with_options(&mut self.conn, self.dialect, opts)
    }

    pub fn execute_query(&mut self, query: &Query) -> Result<u64, StmtCacheError> {
        // Fast path: an unparameterized statement gains nothing from
        // caching, skip prepare/binder/lookup entirely.
        if query.params.is_empty() {
            return self.conn.execute_direct(&query.sql);
        }

        let cache = match query.reuse_policy {
            StatementReusePolicy::None => None,
            StatementReusePolicy::PerTransaction => Some(&self.per_transaction),
            StatementReusePolicy::PerConnection => Some(&self.per_connection),
        };

        let Some(cache) = cache else {
            let handle = self.conn.prepare(&query.sql)?;
            return self
                .executor
                .execute(&mut self.conn, &handle, &query.params, &query.types);
        };

        let key = self.key_builder.build(query);
        let handle = match cache.get(&key) {
            Some(handle) => handle,
            None => {
                let handle = self.conn.prepare(&query.sql)?;
                cache.set(&key, handle.clone());
                handle
            }
        };

        self.executor
            .execute(&mut self.conn, &handle, &query.params, &query.types)
    }

    /// The per-transaction cache is cleared even when the underlying commit
    /// fails; no handle may survive a failed transaction boundary.
    pub fn commit(&mut self) -> Result<(), StmtCacheError> {
        let result = self.conn.commit();
        self.per_transaction.clear();
        result
    }

    pub fn rollback(&mut self) -> Result<(), StmtCacheError> {
        let result = self.conn.rollback();
        self.per_transaction.clear();
        result
    }

    /// Caches are cleared before the connection closes so no stale handle
    /// reference is retained if closing fails.
    pub fn close(&mut self) -> Result<(), StmtCacheError> {
        self.per_transaction.clear();
        self.per_connection.clear();
        self.conn.close()
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn per_transaction_cache_len(&self) -> usize {
        self.per_transaction.len()
    }

    pub fn per_connection_cache_len(&self) -> usize {
        self.per_connection.len()
    }
}
