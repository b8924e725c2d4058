//! Driver boundary. The crate never talks to a database directly; everything
//! goes through [`DriverConnection`], implemented by the bundled SQLite
//! backend (behind the `sqlite-backend` feature) and by test doubles.

use crate::errors::StmtCacheError;
use crate::value::{BindingType, SqlValue};

/// Where a resolved value is bound on the prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub enum BindSlot {
    /// 1-based position.
    Position(usize),
    /// Placeholder name, passed to the driver verbatim (callers match the
    /// naming convention the prepared handle expects).
    Name(String),
}

/// One fully resolved parameter binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub slot: BindSlot,
    pub value: SqlValue,
    pub ty: BindingType,
}

/// Narrow boundary to the underlying database connection.
///
/// `Handle` is an opaque capability token for a driver-held prepared
/// statement. The caches store clones of it and only ever forget them;
/// disposal of the underlying resource is the driver's concern once the last
/// clone is dropped.
///
/// Implementations must not retry or reconnect: any failure is surfaced as
/// [`StmtCacheError::Driver`] and propagates unchanged.
pub trait DriverConnection {
    type Handle: Clone;

    /// Prepare `sql`, returning a reusable handle.
    fn prepare(&mut self, sql: &str) -> Result<Self::Handle, StmtCacheError>;

    /// Execute `sql` directly, without preparing a reusable handle.
    fn execute_direct(&mut self, sql: &str) -> Result<u64, StmtCacheError>;

    /// Bind every entry of `bindings` on the prepared handle, execute it and
    /// return the affected-row count.
    fn execute_prepared(
        &mut self,
        handle: &Self::Handle,
        bindings: &[Binding],
    ) -> Result<u64, StmtCacheError>;

    fn begin_transaction(&mut self) -> Result<(), StmtCacheError>;

    fn commit(&mut self) -> Result<(), StmtCacheError>;

    fn rollback(&mut self) -> Result<(), StmtCacheError>;

    fn close(&mut self) -> Result<(), StmtCacheError>;

    fn is_transaction_active(&self) -> bool;

    /// Platform-aware conversion for named abstract types: yields the
    /// converted value and the type's declared binding kind. Unknown names
    /// are an [`StmtCacheError::InvalidParameter`].
    fn convert_abstract_type(
        &self,
        type_name: &str,
        value: &SqlValue,
    ) -> Result<(SqlValue, BindingType), StmtCacheError>;
}
