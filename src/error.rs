use thiserror::Error;

use crate::sim::JobId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid job {id}: {reason}")]
    InvalidJob { id: JobId, reason: String },

    #[error("job id {0} appears more than once in the workload")]
    DuplicateJob(JobId),

    #[error("workload contains no jobs")]
    EmptyWorkload,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed job record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("malformed job file: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
