use super::pass::Pass;
use super::state::{KernelCtx, TaskState, Ticks};

/// Checks the task-state invariants after every step.
#[derive(Debug)]
pub struct Observer {
    step: u64,
    quantum: Ticks,
    horizon: Ticks,
    last_pass: Vec<Pass>,
    first_dispatch: Vec<Option<Ticks>>,
}

impl Observer {
    pub fn new(core: &KernelCtx, quantum: Ticks, horizon: Ticks) -> Self {
        Self {
            step: 0,
            quantum,
            horizon,
            last_pass: core.tasks.iter().map(|t| t.pass).collect(),
            first_dispatch: core.tasks.iter().map(|t| t.first_dispatch).collect(),
        }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, core: &KernelCtx) {
        self.step += 1;

        debug_assert_eq!(
            core.now,
            self.step.saturating_mul(self.quantum),
            "Clock drifted from step count at step {}",
            self.step
        );
        debug_assert!(
            core.now <= self.horizon,
            "Step {} ended at {} past horizon {}",
            self.step,
            core.now,
            self.horizon
        );
        debug_assert!(
            core.total_allotments().saturating_mul(self.quantum) <= core.now,
            "More CPU time handed out than has elapsed"
        );

        for task in &core.tasks {
            let id = task.id;
            debug_assert!(
                task.remaining <= task.job.length,
                "Task {id} remaining {} exceeds length {}",
                task.remaining,
                task.job.length
            );
            debug_assert_eq!(
                task.remaining,
                task.job
                    .length
                    .saturating_sub(task.allotments.saturating_mul(self.quantum)),
                "Task {id} remaining time out of step with its allotments"
            );
            debug_assert!(
                task.pass >= self.last_pass[id],
                "Task {id} pass went backwards"
            );
            if let Some(first) = self.first_dispatch[id] {
                debug_assert_eq!(
                    task.first_dispatch,
                    Some(first),
                    "Task {id} first dispatch changed"
                );
            }
            debug_assert_eq!(
                task.completion_time.is_some(),
                task.state == TaskState::Completed,
                "Task {id} completion time disagrees with state {:?}",
                task.state
            );
            debug_assert_eq!(
                task.state == TaskState::Completed,
                task.remaining == 0,
                "Task {id} completed state disagrees with remaining {}",
                task.remaining
            );
            if task.state == TaskState::NotArrived {
                debug_assert!(
                    task.allotments == 0,
                    "Task {id} ran before it was admitted"
                );
            }

            self.last_pass[id] = task.pass;
            self.first_dispatch[id] = task.first_dispatch;
        }
    }
}
