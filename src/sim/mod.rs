pub mod driver;
pub mod job;
pub mod workload;

pub use driver::{Dispatch, Sim, SimRun};
pub use job::{Job, JobDescriptor, JobId, JobLabel, Tickets};
pub use workload::{WorkloadParams, generate_jobs, load_jobs_csv};
