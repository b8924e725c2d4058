#![allow(dead_code)]

use std::cell::Cell;

use stmtcache::{Binding, BindingType, DriverConnection, SqlValue, StmtCacheError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Prepare(String),
    ExecuteDirect(String),
    ExecutePrepared {
        handle_id: usize,
        bindings: Vec<Binding>,
    },
    Begin,
    Commit,
    Rollback,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockHandle {
    pub id: usize,
    pub sql: String,
}

/// Driver double that records every call and can be scripted to fail at
/// transaction boundaries.
pub struct MockConnection {
    pub calls: Vec<Call>,
    pub tx_active: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
    pub affected_rows: u64,
    pub convert_calls: Cell<usize>,
    next_handle: usize,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            tx_active: false,
            fail_commit: false,
            fail_rollback: false,
            affected_rows: 1,
            convert_calls: Cell::new(0),
            next_handle: 0,
        }
    }

    pub fn prepare_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Prepare(_)))
            .count()
    }

    pub fn last_prepared_bindings(&self) -> Option<&[Binding]> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::ExecutePrepared { bindings, .. } => Some(bindings.as_slice()),
            _ => None,
        })
    }

    pub fn direct_sql(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ExecuteDirect(sql) => Some(sql.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DriverConnection for MockConnection {
    type Handle = MockHandle;

    fn prepare(&mut self, sql: &str) -> Result<Self::Handle, StmtCacheError> {
        self.calls.push(Call::Prepare(sql.to_string()));
        let id = self.next_handle;
        self.next_handle += 1;
        Ok(MockHandle {
            id,
            sql: sql.to_string(),
        })
    }

    fn execute_direct(&mut self, sql: &str) -> Result<u64, StmtCacheError> {
        self.calls.push(Call::ExecuteDirect(sql.to_string()));
        Ok(self.affected_rows)
    }

    fn execute_prepared(
        &mut self,
        handle: &Self::Handle,
        bindings: &[Binding],
    ) -> Result<u64, StmtCacheError> {
        self.calls.push(Call::ExecutePrepared {
            handle_id: handle.id,
            bindings: bindings.to_vec(),
        });
        Ok(self.affected_rows)
    }

    fn begin_transaction(&mut self) -> Result<(), StmtCacheError> {
        self.calls.push(Call::Begin);
        self.tx_active = true;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StmtCacheError> {
        self.calls.push(Call::Commit);
        self.tx_active = false;
        if self.fail_commit {
            return Err(StmtCacheError::driver("commit failed"));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StmtCacheError> {
        self.calls.push(Call::Rollback);
        self.tx_active = false;
        if self.fail_rollback {
            return Err(StmtCacheError::driver("rollback failed"));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), StmtCacheError> {
        self.calls.push(Call::Close);
        Ok(())
    }

    fn is_transaction_active(&self) -> bool {
        self.tx_active
    }

    fn convert_abstract_type(
        &self,
        type_name: &str,
        value: &SqlValue,
    ) -> Result<(SqlValue, BindingType), StmtCacheError> {
        self.convert_calls.set(self.convert_calls.get() + 1);
        match type_name {
            "boolean" => {
                let flag = match value {
                    SqlValue::Bool(b) => *b,
                    SqlValue::Integer(i) => *i != 0,
                    other => {
                        return Err(StmtCacheError::invalid_parameter(format!(
                            "cannot convert {other:?} to boolean"
                        )));
                    }
                };
                Ok((SqlValue::Integer(flag as i64), BindingType::Boolean))
            }
            "upper" => match value {
                SqlValue::Text(s) => Ok((SqlValue::Text(s.to_uppercase()), BindingType::Text)),
                other => Err(StmtCacheError::invalid_parameter(format!(
                    "cannot convert {other:?} to upper"
                ))),
            },
            other => Err(StmtCacheError::invalid_parameter(format!(
                "unknown abstract type: {other}"
            ))),
        }
    }
}
