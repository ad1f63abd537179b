pub mod driver;
pub mod event;
pub mod observer;
pub mod pass;
pub mod state;

pub use driver::SchedCore;
pub use event::SchedCoreEvent;
pub use pass::{DEFAULT_STRIDE_CONSTANT, Pass, advance_pass, stride_of};
pub use state::{KernelCtx, Slice, Task, TaskId, TaskState, Ticks};
