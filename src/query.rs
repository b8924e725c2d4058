use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{SqlValue, TypeDescriptor};

/// Which statement cache (if any) may service a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementReusePolicy {
    #[default]
    None,
    PerTransaction,
    PerConnection,
}

/// Address of a single parameter: positional index or placeholder name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKey {
    Index(usize),
    Name(String),
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Index(i) => write!(f, "{i}"),
            ParamKey::Name(n) => f.write_str(n),
        }
    }
}

/// Insertion-ordered parameter collection.
///
/// Keys may be sparse (`{0, 5}` is valid); the executor binds positional
/// parameters in iteration order, not by their numeric key. Positional and
/// named keys must not be mixed within one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    entries: Vec<(ParamKey, SqlValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values keyed 0..n in order.
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SqlValue>,
    {
        Self {
            entries: values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (ParamKey::Index(i), v.into()))
                .collect(),
        }
    }

    pub fn named<I, N>(values: I) -> Self
    where
        I: IntoIterator<Item = (N, SqlValue)>,
        N: Into<String>,
    {
        Self {
            entries: values
                .into_iter()
                .map(|(n, v)| (ParamKey::Name(n.into()), v))
                .collect(),
        }
    }

    pub fn push_indexed(&mut self, index: usize, value: SqlValue) {
        self.entries.push((ParamKey::Index(index), value));
    }

    pub fn push_named<N: Into<String>>(&mut self, name: N, value: SqlValue) {
        self.entries.push((ParamKey::Name(name.into()), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ParamKey, SqlValue)> {
        self.entries.iter()
    }

    /// Addressing mode for the whole collection is decided by the first key.
    pub fn first_key_is_index(&self) -> bool {
        matches!(self.entries.first(), Some((ParamKey::Index(_), _)))
    }
}

/// Per-parameter type descriptors, addressed by the same key space as
/// [`Params`]. A key with no entry here defaults to text binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeHints {
    entries: Vec<(ParamKey, TypeDescriptor)>,
}

impl TypeHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        Self {
            entries: descriptors
                .into_iter()
                .enumerate()
                .map(|(i, d)| (ParamKey::Index(i), d))
                .collect(),
        }
    }

    pub fn push_indexed(&mut self, index: usize, descriptor: TypeDescriptor) {
        self.entries.push((ParamKey::Index(index), descriptor));
    }

    pub fn push_named<N: Into<String>>(&mut self, name: N, descriptor: TypeDescriptor) {
        self.entries.push((ParamKey::Name(name.into()), descriptor));
    }

    pub fn get(&self, key: &ParamKey) -> Option<&TypeDescriptor> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One executable statement: SQL text, parameters, type hints and the reuse
/// policy deciding which cache scope (if any) may serve a prepared handle.
///
/// Built per call site and discarded after execution. When both `params` and
/// `types` are non-empty they must share one key space: all positional or
/// all named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub sql: String,
    pub params: Params,
    pub types: TypeHints,
    pub reuse_policy: StatementReusePolicy,
}

impl Query {
    pub fn new<S: Into<String>>(sql: S) -> Self {
        Self {
            sql: sql.into(),
            params: Params::new(),
            types: TypeHints::new(),
            reuse_policy: StatementReusePolicy::None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_types(mut self, types: TypeHints) -> Self {
        self.types = types;
        self
    }

    pub fn with_policy(mut self, policy: StatementReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }
}
