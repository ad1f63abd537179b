use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;

use super::{Admission, KernelCtx, Scheduler, TaskId};
use crate::core::pass::{Pass, advance_pass};
use crate::sim::JobId;

/// Queue priority: lowest pass first, ties to the lowest job id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StrideKey {
    pass: Pass,
    job: JobId,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop StrideKey's Ord
impl PartialOrd for StrideKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrideKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .pass
            .cmp(&self.pass)
            .then_with(|| other.job.cmp(&self.job))
    }
}

/// Deterministically runs the ready job with the smallest pass, then advances
/// that job's pass by its stride.
#[derive(Debug)]
pub struct StrideScheduler {
    ready: KeyedPriorityQueue<TaskId, StrideKey>,
}

impl Default for StrideScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl StrideScheduler {
    pub fn new() -> Self {
        Self {
            ready: KeyedPriorityQueue::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    fn push(&mut self, ctx: &KernelCtx, task: TaskId) {
        let key = StrideKey {
            pass: ctx.task(task).pass,
            job: ctx.job_id(task),
        };
        let prev = self.ready.push(task, key);
        debug_assert!(prev.is_none(), "Task {task} already queued");
    }
}

impl Scheduler for StrideScheduler {
    fn name(&self) -> &'static str {
        "stride"
    }

    fn admission(&self) -> Admission {
        Admission::ArrivedBy
    }

    fn reset(&mut self) {
        self.ready = KeyedPriorityQueue::new();
    }

    fn enqueue(&mut self, ctx: &KernelCtx, task: TaskId) {
        self.push(ctx, task);
    }

    fn pick_next(&mut self, _ctx: &KernelCtx) -> Option<TaskId> {
        self.ready.pop().map(|(task, _)| task)
    }

    // Progress the task's pass and put it back while it still has work
    fn stopping(&mut self, ctx: &mut KernelCtx, task: TaskId, runnable: bool) {
        advance_pass(ctx.task_mut(task));
        if runnable {
            self.push(ctx, task);
        }
    }
}
