use crate::models::pool::PoolStatus;
use thiserror::Error;

/// Everything that can go wrong while reading a pool's health.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("could not launch zpool: {0}")]
    LaunchFailure(String),

    #[error("unrecognized health keyword {keyword:?} for pool {pool}")]
    UnrecognizedHealthKeyword { pool: String, keyword: String },

    #[error("could not parse capacity {raw:?} for pool {pool}")]
    CapacityParse { pool: String, raw: String },

    /// The overall state was not a known keyword. `partial` is still filled
    /// in, with `faulted_devices` forced to 1.
    #[error("unrecognized state {state:?} in zpool status for {}", .partial.name())]
    StatusParse { state: String, partial: Box<PoolStatus> },

    #[error("no such pool: {0}")]
    PoolNotFound(String),
}

impl PoolError {
    pub fn label(&self) -> &'static str {
        match self {
            PoolError::LaunchFailure(_)                 => "launch-failure",
            PoolError::UnrecognizedHealthKeyword { .. } => "unrecognized-health",
            PoolError::CapacityParse { .. }             => "capacity-parse",
            PoolError::StatusParse { .. }               => "status-parse",
            PoolError::PoolNotFound(_)                  => "pool-not-found",
        }
    }
}

pub type Result<T> = std::result::Result<T, PoolError>;

/// A pool whose status could not be read.
#[derive(Debug)]
pub struct PoolFailure {
    pub pool:  String,
    pub error: PoolError,
}

impl PoolFailure {
    /// The half-read status a [`PoolError::StatusParse`] carries, if any.
    pub fn partial(&self) -> Option<&PoolStatus> {
        match &self.error {
            PoolError::StatusParse { partial, .. } => Some(partial.as_ref()),
            _ => None,
        }
    }
}
