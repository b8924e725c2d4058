//! Bundled reference backend over rusqlite.
//!
//! The prepared-statement handle is a capability token naming an entry in
//! rusqlite's own prepared-statement cache: `prepare` admits the SQL via
//! `prepare_cached`, and `execute_prepared` re-acquires the driver-held
//! compiled statement by the same SQL. The compiled resource stays owned by
//! the driver; forgetting the token is all the LRU caches ever do with it.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use rusqlite::types::Value;

use crate::connection::{BindSlot, Binding, DriverConnection};
use crate::errors::StmtCacheError;
use crate::value::{BindingType, SqlValue};

impl From<rusqlite::Error> for StmtCacheError {
    fn from(err: rusqlite::Error) -> Self {
        StmtCacheError::driver(err.to_string())
    }
}

/// Token for a statement admitted to the driver's prepared-statement cache.
#[derive(Debug, Clone)]
pub struct SqliteHandle {
    sql: Arc<str>,
}

pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StmtCacheError> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StmtCacheError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn raw(&self) -> &Connection {
        &self.conn
    }
}

/// Converts a resolved value to the concrete SQLite value for its binding
/// type. SQLite has no distinct boolean or LOB storage class, so booleans
/// bind as 0/1 integers and large objects as blobs.
fn to_sqlite_value(value: &SqlValue, ty: BindingType) -> Result<Value, StmtCacheError> {
    if matches!(value, SqlValue::Null) || ty == BindingType::Null {
        return Ok(Value::Null);
    }
    let out = match ty {
        BindingType::Integer => match value {
            SqlValue::Integer(i) => Value::Integer(*i),
            SqlValue::Bool(b) => Value::Integer(*b as i64),
            SqlValue::Real(r) => Value::Integer(*r as i64),
            SqlValue::Text(s) => Value::Integer(s.parse::<i64>().map_err(|_| {
                StmtCacheError::invalid_parameter(format!("cannot bind {s:?} as integer"))
            })?),
            other => {
                return Err(StmtCacheError::invalid_parameter(format!(
                    "cannot bind {other:?} as integer"
                )));
            }
        },
        BindingType::Boolean => match value {
            SqlValue::Bool(b) => Value::Integer(*b as i64),
            SqlValue::Integer(i) => Value::Integer((*i != 0) as i64),
            other => {
                return Err(StmtCacheError::invalid_parameter(format!(
                    "cannot bind {other:?} as boolean"
                )));
            }
        },
        BindingType::LargeObject => match value {
            SqlValue::Bytes(b) => Value::Blob(b.clone()),
            SqlValue::Text(s) => Value::Blob(s.clone().into_bytes()),
            other => {
                return Err(StmtCacheError::invalid_parameter(format!(
                    "cannot bind {other:?} as large object"
                )));
            }
        },
        BindingType::Text => match value {
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Integer(i) => Value::Integer(*i),
            SqlValue::Real(r) => Value::Real(*r),
            SqlValue::Bool(b) => Value::Integer(*b as i64),
            SqlValue::Bytes(b) => Value::Blob(b.clone()),
            other => {
                return Err(StmtCacheError::invalid_parameter(format!(
                    "cannot bind {other:?} as text"
                )));
            }
        },
        // Null is handled before the match.
        BindingType::Null => Value::Null,
    };
    Ok(out)
}

impl DriverConnection for SqliteConnection {
    type Handle = SqliteHandle;

    fn prepare(&mut self, sql: &str) -> Result<Self::Handle, StmtCacheError> {
        // Compiles the statement into the driver cache; errors surface here
        // rather than at first execution.
        self.conn.prepare_cached(sql)?;
        Ok(SqliteHandle {
            sql: Arc::from(sql),
        })
    }

    fn execute_direct(&mut self, sql: &str) -> Result<u64, StmtCacheError> {
        Ok(self.conn.execute(sql, [])? as u64)
    }

    fn execute_prepared(
        &mut self,
        handle: &Self::Handle,
        bindings: &[Binding],
    ) -> Result<u64, StmtCacheError> {
        let mut stmt = self.conn.prepare_cached(&handle.sql)?;
        for binding in bindings {
            let position = match &binding.slot {
                BindSlot::Position(p) => *p,
                BindSlot::Name(name) => stmt.parameter_index(name)?.ok_or_else(|| {
                    StmtCacheError::driver(format!("no such named parameter: {name}"))
                })?,
            };
            let value = to_sqlite_value(&binding.value, binding.ty)?;
            stmt.raw_bind_parameter(position, value)?;
        }
        Ok(stmt.raw_execute()? as u64)
    }

    fn begin_transaction(&mut self) -> Result<(), StmtCacheError> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StmtCacheError> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StmtCacheError> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StmtCacheError> {
        // rusqlite closes on drop; flush the driver statement cache so
        // nothing keeps the database file pinned.
        self.conn.flush_prepared_statement_cache();
        Ok(())
    }

    fn is_transaction_active(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn convert_abstract_type(
        &self,
        type_name: &str,
        value: &SqlValue,
    ) -> Result<(SqlValue, BindingType), StmtCacheError> {
        match type_name {
            "boolean" => {
                let flag = match value {
                    SqlValue::Bool(b) => *b,
                    SqlValue::Integer(i) => *i != 0,
                    SqlValue::Null => return Ok((SqlValue::Null, BindingType::Null)),
                    other => {
                        return Err(StmtCacheError::invalid_parameter(format!(
                            "cannot convert {other:?} to boolean"
                        )));
                    }
                };
                Ok((SqlValue::Integer(flag as i64), BindingType::Boolean))
            }
            "integer" => {
                let n = match value {
                    SqlValue::Integer(i) => *i,
                    SqlValue::Bool(b) => *b as i64,
                    SqlValue::Text(s) => s.parse::<i64>().map_err(|_| {
                        StmtCacheError::invalid_parameter(format!(
                            "cannot convert {s:?} to integer"
                        ))
                    })?,
                    SqlValue::Null => return Ok((SqlValue::Null, BindingType::Null)),
                    other => {
                        return Err(StmtCacheError::invalid_parameter(format!(
                            "cannot convert {other:?} to integer"
                        )));
                    }
                };
                Ok((SqlValue::Integer(n), BindingType::Integer))
            }
            "text" | "string" => {
                let s = match value {
                    SqlValue::Text(s) => s.clone(),
                    SqlValue::Integer(i) => i.to_string(),
                    SqlValue::Real(r) => r.to_string(),
                    SqlValue::Bool(b) => b.to_string(),
                    SqlValue::Null => return Ok((SqlValue::Null, BindingType::Null)),
                    other => {
                        return Err(StmtCacheError::invalid_parameter(format!(
                            "cannot convert {other:?} to text"
                        )));
                    }
                };
                Ok((SqlValue::Text(s), BindingType::Text))
            }
            "blob" | "binary" => {
                let bytes = match value {
                    SqlValue::Bytes(b) => b.clone(),
                    SqlValue::Text(s) => s.clone().into_bytes(),
                    SqlValue::Null => return Ok((SqlValue::Null, BindingType::Null)),
                    other => {
                        return Err(StmtCacheError::invalid_parameter(format!(
                            "cannot convert {other:?} to blob"
                        )));
                    }
                };
                Ok((SqlValue::Bytes(bytes), BindingType::LargeObject))
            }
            "json" => match value {
                SqlValue::Text(s) => {
                    serde_json::from_str::<serde_json::Value>(s).map_err(|e| {
                        StmtCacheError::invalid_parameter(format!("invalid json parameter: {e}"))
                    })?;
                    Ok((SqlValue::Text(s.clone()), BindingType::Text))
                }
                SqlValue::Null => Ok((SqlValue::Null, BindingType::Null)),
                other => Err(StmtCacheError::invalid_parameter(format!(
                    "cannot convert {other:?} to json"
                ))),
            },
            other => Err(StmtCacheError::invalid_parameter(format!(
                "unknown abstract type: {other}"
            ))),
        }
    }
}
