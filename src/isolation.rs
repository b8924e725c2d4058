use serde::{Deserialize, Serialize};

/// Dialect-neutral transaction isolation level. Each adapter dialect maps it
/// to the SQL it actually sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

/// Options accompanying a transaction start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    pub isolation_level: Option<IsolationLevel>,
}

impl TxOptions {
    pub fn with_isolation(level: IsolationLevel) -> Self {
        Self {
            isolation_level: Some(level),
        }
    }
}

/// How a dialect applies a requested isolation level around BEGIN.
///
/// `Mysql`: `SET TRANSACTION ISOLATION LEVEL ...` is only legal outside a
/// transaction and affects the next transaction alone, so it is issued
/// before BEGIN. `Postgres`: the same statement is scoped to the open
/// transaction, so BEGIN comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDialect {
    Mysql,
    Postgres,
}

impl TransactionDialect {
    pub(crate) fn isolation_sql(level: IsolationLevel) -> String {
        format!("SET TRANSACTION ISOLATION LEVEL {}", level.sql_keyword())
    }
}
