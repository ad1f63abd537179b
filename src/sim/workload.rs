//! Synthetic and file-based job lists.
//!
//! Neither is part of the simulated machine: they only produce
//! `JobDescriptor`s, which `Sim::new` validates like any other input.

use std::ops::Range;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use rand::Rng;

use super::job::{JobDescriptor, JobId};
use crate::error::{Result, SimError};

/// Ranges to draw random jobs from. All ranges are half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadParams {
    pub count: usize,
    /// Rounded down to a multiple of 10.
    pub length: Range<i64>,
    /// Rounded down to a multiple of 10.
    pub arrival: Range<i64>,
    pub tickets: Range<i64>,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            count: 27,
            length: 50..80,
            arrival: 0..50,
            tickets: 10..100,
        }
    }
}

impl WorkloadParams {
    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, range: &Range<i64>, min: i64| {
            if range.start < min || range.start > range.end {
                return Err(SimError::InvalidConfig(format!(
                    "{name} range {}..{} must start at or above {min} and not be reversed",
                    range.start, range.end
                )));
            }
            Ok(())
        };
        check("length", &self.length, 10)?;
        check("arrival", &self.arrival, 0)?;
        check("tickets", &self.tickets, 1)
    }
}

// Uniform in [range.start, range.end), or range.start if that is empty
fn draw(rng: &mut impl Rng, range: Range<i64>) -> i64 {
    if range.is_empty() {
        range.start
    } else {
        rng.random_range(range)
    }
}

fn draw_tens(rng: &mut impl Rng, range: &Range<i64>) -> i64 {
    10 * draw(rng, range.start / 10..range.end / 10)
}

/// Random jobs with ids assigned in generation order.
pub fn generate_jobs(params: &WorkloadParams, rng: &mut impl Rng) -> Result<Vec<JobDescriptor>> {
    params.validate()?;

    let jobs = (0..params.count)
        .map(|i| JobDescriptor {
            id: i as JobId,
            length: draw_tens(rng, &params.length),
            arrival_time: draw_tens(rng, &params.arrival),
            tickets: draw(rng, params.tickets.clone()),
        })
        .collect();
    Ok(jobs)
}

fn field(record: &StringRecord, index: usize, line: u64) -> Result<i64> {
    let raw = record.get(index).unwrap_or_default();
    raw.parse().map_err(|_| SimError::MalformedRecord {
        line,
        reason: format!("column {} is not an integer: {raw:?}", index + 1),
    })
}

/// Read jobs from a headerless CSV file.
///
/// Rows are `arrival,length,tickets`, in which case ids are assigned by row
/// order, or `id,arrival,length,tickets`.
pub fn load_jobs_csv(path: impl AsRef<Path>) -> Result<Vec<JobDescriptor>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_path(path)?;

    let mut jobs = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(row as u64 + 1, |p| p.line());

        let (id, offset) = match record.len() {
            3 => (row as JobId, 0),
            4 => {
                let id = field(&record, 0, line)?;
                let id = JobId::try_from(id).map_err(|_| SimError::MalformedRecord {
                    line,
                    reason: format!("job id {id} out of range"),
                })?;
                (id, 1)
            }
            n => {
                return Err(SimError::MalformedRecord {
                    line,
                    reason: format!("expected 3 or 4 columns, found {n}"),
                });
            }
        };

        jobs.push(JobDescriptor {
            id,
            arrival_time: field(&record, offset, line)?,
            length: field(&record, offset + 1, line)?,
            tickets: field(&record, offset + 2, line)?,
        });
    }

    Ok(jobs)
}
