use thiserror::Error;

#[derive(Debug, Error)]
pub enum StmtCacheError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("illegal state: {0}")]
    IllegalState(String),
    #[error("driver failure: {0}")]
    Driver(String),
}

impl StmtCacheError {
    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        StmtCacheError::InvalidConfiguration(msg.into())
    }

    pub fn invalid_parameter<T: Into<String>>(msg: T) -> Self {
        StmtCacheError::InvalidParameter(msg.into())
    }

    pub fn illegal_state<T: Into<String>>(msg: T) -> Self {
        StmtCacheError::IllegalState(msg.into())
    }

    pub fn driver<T: Into<String>>(msg: T) -> Self {
        StmtCacheError::Driver(msg.into())
    }
}
