//! Ticket and pass arithmetic shared by the proportional-share policies.
//!
//! A job's stride is inversely proportional to its tickets. Every time the
//! stride policy dispatches a job, the job's pass advances by its stride, so
//! jobs holding more tickets accumulate pass more slowly and are picked more
//! often.

use std::cmp::Ordering;

use serde::Serialize;

use super::state::Task;
use crate::sim::Tickets;

pub const DEFAULT_STRIDE_CONSTANT: f64 = 10_000.0;

/// Accumulated virtual time of a job under stride scheduling.
///
/// Totally ordered through `f64::total_cmp`; passes are always finite and
/// non-negative so this matches numeric order.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Pass(pub f64);

impl Pass {
    pub const ZERO: Pass = Pass(0.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Pass {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pass {}

impl PartialOrd for Pass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// `k / tickets`. Callers guarantee `tickets > 0`; job validation rejects
/// anything else.
pub fn stride_of(tickets: Tickets, k: f64) -> f64 {
    debug_assert!(tickets > 0, "stride of a job without tickets");
    k / f64::from(tickets)
}

pub fn advance_pass(task: &mut Task) {
    task.pass = Pass(task.pass.0 + task.stride);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Task;
    use crate::sim::Job;

    fn task(tickets: Tickets) -> Task {
        let job = Job {
            id: 0,
            arrival_time: 0,
            length: 10,
            tickets,
        };
        Task::new(0, job, DEFAULT_STRIDE_CONSTANT)
    }

    #[test]
    fn stride_is_inverse_to_tickets() {
        assert!((stride_of(75, 10_000.0) - 133.333_333).abs() < 1e-3);
        assert_eq!(stride_of(25, 10_000.0), 400.0);
        assert_eq!(stride_of(100, 10_000.0), 100.0);
        assert!(stride_of(100, 10_000.0) < stride_of(50, 10_000.0));
    }

    #[test]
    fn constant_only_rescales() {
        let small = stride_of(30, 1.0) / stride_of(70, 1.0);
        let large = stride_of(30, 1e6) / stride_of(70, 1e6);
        assert!((small - large).abs() < 1e-9);
    }

    #[test]
    fn advance_adds_one_stride() {
        let mut t = task(25);
        assert_eq!(t.pass, Pass::ZERO);
        advance_pass(&mut t);
        assert_eq!(t.pass, Pass(400.0));
        advance_pass(&mut t);
        assert_eq!(t.pass, Pass(800.0));
    }

    #[test]
    fn pass_orders_numerically() {
        assert!(Pass(1.5) < Pass(2.0));
        assert!(Pass::ZERO < Pass(133.3));
        assert_eq!(Pass(400.0).max(Pass(133.3)), Pass(400.0));
    }
}
