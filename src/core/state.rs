use rustc_hash::FxHashMap;
use serde::Serialize;

use super::pass::{Pass, stride_of};
use crate::error::{Result, SimError};
use crate::sim::{Job, JobId, Tickets};

// Index into Task Vec
pub type TaskId = usize;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskState {
    NotArrived,
    Ready,
    Completed,
}

/// Runtime state of one job during a run.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub job: Job,
    pub state: TaskState,
    pub remaining: Ticks,
    pub stride: f64,
    pub pass: Pass,
    pub allotments: u64,
    pub first_dispatch: Option<Ticks>,
    /// Dispatch time of the slice that used up the last of the job's length.
    pub completion_time: Option<Ticks>,
}

impl Task {
    pub fn new(id: TaskId, job: Job, stride_constant: f64) -> Self {
        Self {
            id,
            stride: stride_of(job.tickets, stride_constant),
            remaining: job.length,
            job,
            state: TaskState::NotArrived,
            pass: Pass::ZERO,
            allotments: 0,
            first_dispatch: None,
            completion_time: None,
        }
    }

    /// Back to the state the job was in before any run touched it.
    pub fn reset(&mut self, stride_constant: f64) {
        self.state = TaskState::NotArrived;
        self.remaining = self.job.length;
        self.stride = stride_of(self.job.tickets, stride_constant);
        self.pass = Pass::ZERO;
        self.allotments = 0;
        self.first_dispatch = None;
        self.completion_time = None;
    }

    pub fn tickets(&self) -> Tickets {
        self.job.tickets
    }

    pub fn has_work(&self) -> bool {
        self.remaining > 0
    }
}

/// What a single dispatch did to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: Ticks,
    pub consumed: Ticks,
    pub completed: bool,
}

/// Owns every task of the workload for the duration of a run.
#[derive(Debug)]
pub struct KernelCtx {
    pub now: Ticks,
    pub tasks: Vec<Task>,
    pub idle_steps: u64,
    job_to_task: FxHashMap<JobId, TaskId>,
    stride_constant: f64,
}

impl KernelCtx {
    pub fn new(jobs: Vec<Job>, stride_constant: f64) -> Result<Self> {
        let mut job_to_task = FxHashMap::default();
        let mut tasks = Vec::with_capacity(jobs.len());

        for job in jobs {
            let id = tasks.len();
            if job_to_task.insert(job.id, id).is_some() {
                return Err(SimError::DuplicateJob(job.id));
            }
            tasks.push(Task::new(id, job, stride_constant));
        }

        Ok(Self {
            now: 0,
            tasks,
            idle_steps: 0,
            job_to_task,
            stride_constant,
        })
    }

    /// Clear everything a previous run left behind. Job descriptors stay.
    pub fn reset(&mut self) {
        self.now = 0;
        self.idle_steps = 0;
        let k = self.stride_constant;
        for task in &mut self.tasks {
            task.reset(k);
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn task_for_job(&self, job: JobId) -> Option<&Task> {
        self.job_to_task.get(&job).map(|&id| &self.tasks[id])
    }

    pub fn job_id(&self, task_id: TaskId) -> JobId {
        self.tasks[task_id].job.id
    }

    pub fn has_unfinished_work(&self) -> bool {
        self.tasks.iter().any(Task::has_work)
    }

    pub fn total_tickets(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.tickets())).sum()
    }

    pub fn total_allotments(&self) -> u64 {
        self.tasks.iter().map(|t| t.allotments).sum()
    }

    pub fn mark_ready(&mut self, task_id: TaskId) {
        let task = self.task_mut(task_id);
        debug_assert_eq!(
            task.state,
            TaskState::NotArrived,
            "Task {task_id} admitted twice"
        );
        debug_assert!(task.has_work(), "Task {task_id} admitted without work");
        task.state = TaskState::Ready;
    }

    /// Run `task_id` for one quantum starting at `now`.
    pub fn run_slice(&mut self, task_id: TaskId, quantum: Ticks) -> Slice {
        let start = self.now;
        let task = self.task_mut(task_id);
        debug_assert_eq!(
            task.state,
            TaskState::Ready,
            "Task {task_id} dispatched while not ready"
        );

        task.first_dispatch.get_or_insert(start);
        task.allotments += 1;
        let consumed = quantum.min(task.remaining);
        task.remaining -= consumed;

        let completed = task.remaining == 0;
        if completed {
            task.state = TaskState::Completed;
            task.completion_time = Some(start);
        }

        Slice {
            start,
            consumed,
            completed,
        }
    }

    pub fn record_idle(&mut self) {
        self.idle_steps += 1;
    }
}
