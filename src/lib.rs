pub mod config;
pub mod core;
pub mod error;
pub mod metrics;
pub mod scheduler;
pub mod sim;

pub use config::SimConfig;
pub use crate::core::SchedCoreEvent;
pub use error::{Result, SimError};
pub use metrics::{JobReport, RunReport, RunSummary};
pub use scheduler::{LotteryScheduler, Scheduler, StrideScheduler};
pub use sim::{Job, JobDescriptor, JobId, Sim, SimRun};
