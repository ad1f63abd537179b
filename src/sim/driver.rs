use serde::Serialize;
use tracing::{info, warn};

use super::job::{Job, JobDescriptor, JobId};
use crate::{
    config::SimConfig,
    core::{SchedCoreEvent, driver::SchedCore, state::KernelCtx, state::Ticks},
    error::{Result, SimError},
    metrics::{self, RunReport},
    scheduler::Scheduler,
};

/// One entry of a run's dispatch trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub job: JobId,
    pub start: Ticks,
    pub slice: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimRun {
    pub report: RunReport,
    pub dispatches: Vec<Dispatch>,
}

impl SimRun {
    /// Job ids in the order they were dispatched.
    pub fn order(&self) -> Vec<JobId> {
        self.dispatches.iter().map(|d| d.job).collect()
    }
}

/// Runs any number of policies, one after the other, over a single workload.
/// Every run starts from the workload's pristine state.
pub struct Sim {
    ctx: KernelCtx,
    config: SimConfig,
}

impl Sim {
    pub fn new(jobs: Vec<JobDescriptor>, config: SimConfig) -> Result<Self> {
        let jobs = jobs
            .into_iter()
            .map(Job::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::from_jobs(jobs, config)
    }

    pub fn from_jobs(jobs: Vec<Job>, config: SimConfig) -> Result<Self> {
        config.validate()?;
        if jobs.is_empty() {
            return Err(SimError::EmptyWorkload);
        }
        let ctx = KernelCtx::new(jobs, config.stride_constant)?;
        Ok(Self { ctx, config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.ctx.tasks.iter().map(|t| &t.job)
    }

    /// State left behind by the most recent run.
    pub fn ctx(&self) -> &KernelCtx {
        &self.ctx
    }

    pub fn run<S: Scheduler>(&mut self, scheduler: &mut S) -> SimRun {
        let name = scheduler.name();
        info!(
            algorithm = name,
            jobs = self.ctx.tasks.len(),
            horizon = self.config.horizon,
            quantum = self.config.quantum,
            "starting run"
        );

        self.ctx.reset();
        scheduler.reset();

        let mut core = SchedCore::new(&mut self.ctx, scheduler, &self.config);
        let dispatches = core
            .run()
            .into_iter()
            .filter_map(|event| match event {
                SchedCoreEvent::Dispatched { job, start, slice } => Some(Dispatch { job, start, slice }),
                _ => None,
            })
            .collect();

        let report = metrics::aggregate(&self.ctx, name);
        let summary = &report.summary;
        if summary.completed_jobs < summary.total_jobs {
            warn!(
                algorithm = name,
                completed = summary.completed_jobs,
                total = summary.total_jobs,
                horizon = self.config.horizon,
                "run ended at the horizon with unfinished jobs"
            );
        }
        info!(
            algorithm = name,
            elapsed = summary.elapsed,
            dispatches = summary.total_allotments,
            idle = summary.idle_steps,
            "run finished"
        );

        SimRun { report, dispatches }
    }
}
