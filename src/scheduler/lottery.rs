use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use super::{Admission, KernelCtx, Scheduler, TaskId};

/// Source of winning ticket numbers.
pub trait TicketDraw {
    /// A ticket number in `[0, total)`. `total` is never zero.
    fn draw(&mut self, total: u64) -> u64;
}

impl<R: Rng + ?Sized> TicketDraw for R {
    fn draw(&mut self, total: u64) -> u64 {
        self.random_range(0..total)
    }
}

/// Replays a fixed sequence of draws, each reduced modulo the ticket total.
/// Once the script runs out it keeps returning 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    draws: VecDeque<u64>,
}

impl ScriptedDraws {
    pub fn new(draws: impl IntoIterator<Item = u64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

impl TicketDraw for ScriptedDraws {
    fn draw(&mut self, total: u64) -> u64 {
        self.draws.pop_front().unwrap_or(0) % total
    }
}

/// Each quantum, holds a drawing among the ready jobs; a job's chance of
/// winning is its share of the ready tickets.
pub struct LotteryScheduler<D: TicketDraw = StdRng> {
    draw: D,
    // Admission order; the drawing walks it front to back
    ready: Vec<TaskId>,
}

impl LotteryScheduler<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<D: TicketDraw> LotteryScheduler<D> {
    pub fn new(draw: D) -> Self {
        Self {
            draw,
            ready: Vec::new(),
        }
    }

    pub fn ready(&self) -> &[TaskId] {
        &self.ready
    }
}

impl<D: TicketDraw> Scheduler for LotteryScheduler<D> {
    fn name(&self) -> &'static str {
        "lottery"
    }

    fn admission(&self) -> Admission {
        Admission::ExactArrival
    }

    fn reset(&mut self) {
        self.ready.clear();
    }

    fn enqueue(&mut self, _ctx: &KernelCtx, task: TaskId) {
        debug_assert!(!self.ready.contains(&task), "Task {task} enqueued twice");
        self.ready.push(task);
    }

    fn pick_next(&mut self, ctx: &KernelCtx) -> Option<TaskId> {
        let total: u64 = self
            .ready
            .iter()
            .map(|&task| u64::from(ctx.task(task).tickets()))
            .sum();
        if total == 0 {
            return None;
        }

        let winning = self.draw.draw(total);
        let mut sum = 0;
        let winner = self.ready.iter().copied().find(|&task| {
            sum += u64::from(ctx.task(task).tickets());
            winning < sum
        });

        trace!(total, winning, ?winner, "lottery drawing");
        winner
    }

    fn stopping(&mut self, _ctx: &mut KernelCtx, task: TaskId, runnable: bool) {
        if !runnable {
            self.ready.retain(|&t| t != task);
        }
    }
}
