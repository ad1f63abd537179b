use crate::core::Ticks;
use crate::sim::JobId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedCoreEvent {
    Admitted {
        job: JobId,
        at: Ticks,
    },
    Dispatched {
        job: JobId,
        start: Ticks,
        // Time actually consumed; shorter than the quantum on a job's last slice
        slice: Ticks,
    },
    Completed {
        job: JobId,
        at: Ticks,
    },
    // Ready set empty, time advanced without a dispatch
    Idle {
        at: Ticks,
    },
}
