pub mod lottery;
pub mod stride;

use crate::core::{
    Ticks,
    state::{KernelCtx, TaskId},
};
pub use lottery::{LotteryScheduler, ScriptedDraws, TicketDraw};
pub use stride::StrideScheduler;

/// When a job that has not been admitted yet joins the ready set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admitted at the one step whose quantum window `(now - quantum, now]`
    /// contains the arrival time. With a quantum of 1 this is `arrival == now`.
    ExactArrival,
    /// Admitted at any step with `arrival <= now`.
    ArrivedBy,
}

impl Admission {
    pub fn admits(self, arrival: Ticks, now: Ticks, quantum: Ticks) -> bool {
        match self {
            Admission::ExactArrival => arrival <= now && arrival.saturating_add(quantum) > now,
            Admission::ArrivedBy => arrival <= now,
        }
    }
}

/// A dispatch policy. The driver owns time, admission bookkeeping and slice
/// accounting; the policy owns its ready queue and decides who runs.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    fn admission(&self) -> Admission;

    /// Drop any queue state left from a previous run.
    fn reset(&mut self);

    /// `task` has just become ready.
    fn enqueue(&mut self, ctx: &KernelCtx, task: TaskId);

    /// Choose the task to run for the next quantum, or `None` to idle.
    fn pick_next(&mut self, ctx: &KernelCtx) -> Option<TaskId>;

    /// `task` finished its slice. `runnable` is false once it has no work left.
    fn stopping(&mut self, ctx: &mut KernelCtx, task: TaskId, runnable: bool);
}
