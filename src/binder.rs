//! Type-descriptor resolution for parameter binding.
//!
//! Turns a raw value plus an optional [`TypeDescriptor`] into the value the
//! driver should bind and the normalized [`BindingType`] to bind it with.

use crate::connection::DriverConnection;
use crate::errors::StmtCacheError;
use crate::value::{BindingType, SqlValue, TypeDescriptor};

// Legacy small-integer tags carried over from older driver APIs.
const LEGACY_NULL: i64 = 0;
const LEGACY_INTEGER: i64 = 1;
const LEGACY_LARGE_OBJECT: i64 = 3;
const LEGACY_BOOLEAN: i64 = 5;

/// Resolves `(value, descriptor)` to `(bound value, binding type)`.
///
/// Composite values are rejected before any descriptor handling: parameter
/// expansion is not supported, every bound parameter must be scalar or null.
/// A named abstract type invokes the connection's platform-aware converter
/// exactly once; its failure propagates unchanged.
pub fn resolve_binding<C: DriverConnection + ?Sized>(
    conn: &C,
    value: &SqlValue,
    descriptor: Option<&TypeDescriptor>,
) -> Result<(SqlValue, BindingType), StmtCacheError> {
    if value.is_composite() {
        return Err(StmtCacheError::invalid_parameter(
            "array parameter values are not supported (no parameter expansion)",
        ));
    }

    match descriptor {
        None => Ok((value.clone(), BindingType::Text)),
        Some(TypeDescriptor::LegacyTag(tag)) => {
            let binding_type = match *tag {
                LEGACY_NULL => BindingType::Null,
                LEGACY_INTEGER => BindingType::Integer,
                LEGACY_LARGE_OBJECT => BindingType::LargeObject,
                LEGACY_BOOLEAN => BindingType::Boolean,
                _ => BindingType::Text,
            };
            Ok((value.clone(), binding_type))
        }
        Some(TypeDescriptor::Abstract(name)) => conn.convert_abstract_type(name, value),
        Some(TypeDescriptor::Binding(binding_type)) => Ok((value.clone(), *binding_type)),
    }
}
