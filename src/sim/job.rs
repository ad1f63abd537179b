use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::state::Ticks;
use crate::error::SimError;

pub type JobId = u32;
pub type Tickets = u32;

/// A job exactly as a generator or input file handed it over. Nothing about it
/// has been checked yet; convert it with `Job::try_from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub id: JobId,
    pub arrival_time: i64,
    pub length: i64,
    pub tickets: i64,
}

/// Validated, immutable description of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub length: Ticks,
    pub tickets: Tickets,
}

impl TryFrom<JobDescriptor> for Job {
    type Error = SimError;

    fn try_from(desc: JobDescriptor) -> Result<Self, Self::Error> {
        let invalid = |reason: String| SimError::InvalidJob {
            id: desc.id,
            reason,
        };

        if desc.tickets <= 0 {
            return Err(invalid(format!("tickets must be positive, got {}", desc.tickets)));
        }
        let tickets = Tickets::try_from(desc.tickets)
            .map_err(|_| invalid(format!("tickets {} out of range", desc.tickets)))?;
        if desc.arrival_time < 0 {
            return Err(invalid(format!(
                "arrival time must be non-negative, got {}",
                desc.arrival_time
            )));
        }
        if desc.length < 0 {
            return Err(invalid(format!("length must be non-negative, got {}", desc.length)));
        }
        // A job that needs no CPU time can never be dispatched, so it could never be
        // marked complete either.
        if desc.length == 0 {
            return Err(invalid("length must be at least one time unit".to_string()));
        }

        Ok(Job {
            id: desc.id,
            arrival_time: desc.arrival_time as Ticks,
            length: desc.length as Ticks,
            tickets,
        })
    }
}

/// Spreadsheet-style name for a job id: 0 -> A, 25 -> Z, 26 -> AA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobLabel(pub JobId);

impl fmt::Display for JobLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n = u64::from(self.0) + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = ((n - 1) % 26) as u8;
            letters.push(char::from(b'A' + rem));
            n = (n - 1) / 26;
        }
        letters.iter().rev().try_for_each(|c| write!(f, "{c}"))
    }
}
