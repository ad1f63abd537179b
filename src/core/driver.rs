use tracing::debug;

use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{KernelCtx, TaskId, TaskState, Ticks},
};
use crate::{config::SimConfig, scheduler::Scheduler};

/// Drives one run: borrows the workload and the policy exclusively until the
/// run is over.
pub struct SchedCore<'a, S: Scheduler> {
    pub ctx: &'a mut KernelCtx,
    pub scheduler: &'a mut S,
    quantum: Ticks,
    horizon: Ticks,
    observer: Observer,
}

impl<'a, S: Scheduler> SchedCore<'a, S> {
    pub fn new(ctx: &'a mut KernelCtx, scheduler: &'a mut S, config: &SimConfig) -> Self {
        let observer = Observer::new(ctx, config.quantum, config.horizon);
        Self {
            ctx,
            scheduler,
            quantum: config.quantum,
            horizon: config.horizon,
            observer,
        }
    }

    /// No further slice fits before the horizon, or nothing anywhere has work left.
    pub fn is_finished(&self) -> bool {
        self.ctx
            .now
            .checked_add(self.quantum)
            .is_none_or(|end| end > self.horizon)
            || !self.ctx.has_unfinished_work()
    }

    /// Admit arrivals, dispatch at most one task for one quantum, advance time.
    pub fn step(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();
        self.handle_arrivals(&mut events);

        match self.scheduler.pick_next(self.ctx) {
            Some(task) => self.dispatch(task, &mut events),
            None => {
                self.ctx.record_idle();
                events.push(SchedCoreEvent::Idle { at: self.ctx.now });
            }
        }

        self.ctx.advance_time(self.quantum);
        self.observer.observe(self.ctx);
        events
    }

    /// Step until finished, returning every event in order.
    pub fn run(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();
        while !self.is_finished() {
            events.extend(self.step());
        }
        events
    }

    fn handle_arrivals(&mut self, events: &mut Vec<SchedCoreEvent>) {
        let now = self.ctx.now;
        let admission = self.scheduler.admission();

        for task in 0..self.ctx.tasks.len() {
            let t = self.ctx.task(task);
            if t.state != TaskState::NotArrived || !admission.admits(t.job.arrival_time, now, self.quantum) {
                continue;
            }

            self.ctx.mark_ready(task);
            self.scheduler.enqueue(self.ctx, task);

            let job = self.ctx.job_id(task);
            debug!(job, at = now, "admitted");
            events.push(SchedCoreEvent::Admitted { job, at: now });
        }
    }

    fn dispatch(&mut self, task: TaskId, events: &mut Vec<SchedCoreEvent>) {
        let slice = self.ctx.run_slice(task, self.quantum);
        let job = self.ctx.job_id(task);

        debug!(
            job,
            start = slice.start,
            consumed = slice.consumed,
            remaining = self.ctx.task(task).remaining,
            "dispatched"
        );
        events.push(SchedCoreEvent::Dispatched {
            job,
            start: slice.start,
            slice: slice.consumed,
        });

        self.scheduler.stopping(self.ctx, task, !slice.completed);

        if slice.completed {
            let at = slice.start;
            debug!(job, at, "completed");
            events.push(SchedCoreEvent::Completed { job, at });
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
