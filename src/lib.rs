//! Best-effort reuse of prepared statements across a connection's lifetime.
//!
//! A [`CachingConnectionAdapter`] wraps one database connection and keeps
//! two fixed-capacity LRU caches of prepared-statement handles: one scoped
//! to the current transaction, one to the whole connection. Each query picks
//! a cache (or none) via its [`StatementReusePolicy`]; correctness never
//! depends on a cache hit, eviction and miss are normal control flow.
//! Drivers plug in through the [`DriverConnection`] trait; a SQLite backend
//! ships behind the default `sqlite-backend` feature.

pub mod adapter;
pub mod binder;
pub mod cache;
pub mod cache_key;
pub mod connection;
pub mod errors;
pub mod executor;
pub mod isolation;
pub mod query;
#[cfg(feature = "sqlite-backend")]
pub mod sqlite;
pub mod value;

pub use crate::adapter::{CachingConnectionAdapter, ConnectionAdapter};
pub use crate::cache::LruStatementCache;
pub use crate::cache_key::SqlAndParamCountKeyBuilder;
pub use crate::connection::{BindSlot, Binding, DriverConnection};
pub use crate::errors::StmtCacheError;
pub use crate::executor::StatementExecutor;
pub use crate::isolation::{IsolationLevel, TransactionDialect, TxOptions};
pub use crate::query::{ParamKey, Params, Query, StatementReusePolicy, TypeHints};
#[cfg(feature = "sqlite-backend")]
pub use crate::sqlite::{SqliteConnection, SqliteHandle};
pub use crate::value::{BindingType, SqlValue, TypeDescriptor};
