//! Runtime errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The driver task has exited; no further commands can be delivered
    #[error("Clock driver stopped")]
    DriverStopped,

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
