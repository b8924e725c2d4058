//! Executes an already-prepared statement with explicit parameter binding.
//!
//! Exists so adapters can reuse prepared handles (per transaction or per
//! connection) while still supplying per-parameter type descriptors. The
//! executor resolves every parameter through the binder, hands the complete
//! binding list to the driver in one call, and never retries or reconnects.

use crate::binder::resolve_binding;
use crate::connection::{BindSlot, Binding, DriverConnection};
use crate::errors::StmtCacheError;
use crate::query::{ParamKey, Params, TypeHints};

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementExecutor;

impl StatementExecutor {
    /// Binds `params` (with `types` resolved per parameter) on `handle`,
    /// executes it and returns the affected-row count.
    ///
    /// The first parameter key decides the addressing mode for the whole
    /// call: an integer index means positional, a name means named. Mixing
    /// key kinds within one collection is not supported.
    ///
    /// Positional parameters are bound to sequential 1-based positions in
    /// iteration order, independent of their original (possibly sparse)
    /// index keys. Named parameters are bound under their name verbatim; the
    /// caller is responsible for matching the placeholder convention the
    /// prepared handle expects. A parameter with no type descriptor at its
    /// original key binds as text with the raw value unconverted.
    pub fn execute<C: DriverConnection>(
        &self,
        conn: &mut C,
        handle: &C::Handle,
        params: &Params,
        types: &TypeHints,
    ) -> Result<u64, StmtCacheError> {
        let positional = params.first_key_is_index();
        let mut bindings = Vec::with_capacity(params.len());

        for (position, (key, value)) in params.iter().enumerate() {
            // resolve_binding with an absent descriptor yields the raw value
            // with text binding, and rejects composites in both cases.
            let (value, binding_type) = resolve_binding(&*conn, value, types.get(key))?;

            let slot = if positional {
                BindSlot::Position(position + 1)
            } else {
                match key {
                    ParamKey::Name(name) => BindSlot::Name(name.clone()),
                    // Mixed addressing is unsupported; an index key in named
                    // mode binds under its decimal spelling.
                    ParamKey::Index(i) => BindSlot::Name(i.to_string()),
                }
            };

            bindings.push(Binding {
                slot,
                value,
                ty: binding_type,
            });
        }

        conn.execute_prepared(handle, &bindings)
    }
}
