use std::hash::{Hash, Hasher};

use crate::query::Query;

/// Derives a statement cache key from a query's SQL text and parameter
/// count.
///
/// Deliberately insensitive to parameter values, named-parameter ordering
/// and type hints: two statements that share SQL text and parameter count
/// collide, which is acceptable for a best-effort performance cache. The
/// hash is stable within a process, which is the only scope a
/// per-connection key needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlAndParamCountKeyBuilder;

impl SqlAndParamCountKeyBuilder {
    pub fn build(&self, query: &Query) -> String {
        let mut hasher = ahash::AHasher::default();
        query.sql.hash(&mut hasher);
        format!("{:016x}|p:{}", hasher.finish(), query.params.len())
    }
}
