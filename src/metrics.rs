//! Allocation accuracy and timing statistics for a finished run.
//!
//! Everything here reads the task table; nothing mutates it. Values that do
//! not exist for a job (a turnaround for a job that never completed, a share
//! when nothing was dispatched) are `None` rather than a sentinel.

use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::state::{KernelCtx, Task, Ticks};
use crate::sim::{JobId, Tickets};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub id: JobId,
    pub tickets: Tickets,
    pub stride: f64,
    pub final_pass: f64,
    pub arrival_time: Ticks,
    pub length: Ticks,
    pub remaining: Ticks,
    pub allotments: u64,
    /// Entitled share of the CPU, over every job in the workload.
    pub expected_share_pct: f64,
    /// Share of the dispatches this job actually received.
    pub actual_share_pct: Option<f64>,
    pub first_dispatch: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub turnaround_time: Option<Ticks>,
    pub response_time: Option<Ticks>,
}

impl JobReport {
    pub fn completed(&self) -> bool {
        self.completion_time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_jobs: usize,
    pub completed_jobs: usize,
    pub total_allotments: u64,
    pub idle_steps: u64,
    /// Simulated time at which the run stopped.
    pub elapsed: Ticks,
    pub average_turnaround: Option<f64>,
    pub average_response: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub algorithm: String,
    pub jobs: Vec<JobReport>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn job(&self, id: JobId) -> Option<&JobReport> {
        self.jobs.iter().find(|j| j.id == id)
    }
}

pub fn expected_share_pct(tickets: Tickets, total_tickets: u64) -> f64 {
    if total_tickets == 0 {
        return 0.0;
    }
    f64::from(tickets) / total_tickets as f64 * 100.0
}

pub fn actual_share_pct(allotments: u64, total_allotments: u64) -> Option<f64> {
    (total_allotments > 0).then(|| allotments as f64 / total_allotments as f64 * 100.0)
}

fn job_report(task: &Task, total_tickets: u64, total_allotments: u64) -> JobReport {
    let arrival = task.job.arrival_time;
    JobReport {
        id: task.job.id,
        tickets: task.tickets(),
        stride: task.stride,
        final_pass: task.pass.value(),
        arrival_time: arrival,
        length: task.job.length,
        remaining: task.remaining,
        allotments: task.allotments,
        expected_share_pct: expected_share_pct(task.tickets(), total_tickets),
        actual_share_pct: actual_share_pct(task.allotments, total_allotments),
        first_dispatch: task.first_dispatch,
        completion_time: task.completion_time,
        turnaround_time: task.completion_time.map(|c| c - arrival),
        response_time: task.first_dispatch.map(|f| f - arrival),
    }
}

fn mean(values: impl Iterator<Item = Ticks>) -> Option<f64> {
    let mean: Mean = values.map(|v| v as f64).collect();
    (mean.len() > 0).then(|| mean.estimate())
}

pub fn aggregate(ctx: &KernelCtx, algorithm: &str) -> RunReport {
    let total_tickets = ctx.total_tickets();
    let total_allotments = ctx.total_allotments();

    let jobs: Vec<JobReport> = ctx
        .tasks
        .iter()
        .map(|task| job_report(task, total_tickets, total_allotments))
        .collect();

    let completed = || jobs.iter().filter(|j| j.completed());
    let summary = RunSummary {
        total_jobs: jobs.len(),
        completed_jobs: completed().count(),
        total_allotments,
        idle_steps: ctx.idle_steps,
        elapsed: ctx.now,
        average_turnaround: mean(completed().filter_map(|j| j.turnaround_time)),
        average_response: mean(completed().filter_map(|j| j.response_time)),
    };

    RunReport {
        algorithm: algorithm.to_string(),
        jobs,
        summary,
    }
}
