use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use propshare_sim::{
    LotteryScheduler, RunReport, Sim, SimConfig, SimRun, StrideScheduler,
    core::DEFAULT_STRIDE_CONSTANT,
    sim::{Job, JobDescriptor, JobLabel, WorkloadParams, generate_jobs, load_jobs_csv},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Lottery,
    Stride,
    Both,
}

/// Compare lottery and stride scheduling on one synthetic workload.
#[derive(Debug, Parser)]
#[command(name = "propshare-sim", version)]
struct Cli {
    /// Total simulated time units
    #[arg(long, default_value_t = 1000)]
    horizon: u64,

    /// Time units consumed per dispatch
    #[arg(short, long, default_value_t = 1)]
    quantum: u64,

    /// Stride numerator; stride = K / tickets
    #[arg(short = 'k', long, default_value_t = DEFAULT_STRIDE_CONSTANT)]
    stride_constant: f64,

    #[arg(short, long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,

    /// Seed for workload generation and lottery draws (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Read jobs from a headerless CSV of `[id,]arrival,length,tickets` rows
    #[arg(short = 'f', long, value_name = "PATH")]
    jobs_file: Option<PathBuf>,

    /// Number of generated jobs
    #[arg(short = 'n', long, default_value_t = 27)]
    count: usize,

    #[arg(long, default_value_t = 50)]
    min_length: i64,

    #[arg(long, default_value_t = 80)]
    max_length: i64,

    #[arg(long, default_value_t = 0)]
    min_arrival: i64,

    #[arg(long, default_value_t = 50)]
    max_arrival: i64,

    #[arg(long, default_value_t = 10)]
    min_tickets: i64,

    #[arg(long, default_value_t = 100)]
    max_tickets: i64,

    /// Print machine-readable JSON instead of the text report
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            horizon: self.horizon,
            quantum: self.quantum,
            stride_constant: self.stride_constant,
        }
    }

    fn workload(&self) -> WorkloadParams {
        WorkloadParams {
            count: self.count,
            length: self.min_length..self.max_length,
            arrival: self.min_arrival..self.max_arrival,
            tickets: self.min_tickets..self.max_tickets,
        }
    }
}

#[derive(Serialize)]
struct Output<'a> {
    seed: u64,
    config: &'a SimConfig,
    jobs: Vec<&'a Job>,
    runs: &'a [SimRun],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let jobs: Vec<JobDescriptor> = match &cli.jobs_file {
        Some(path) => load_jobs_csv(path).with_context(|| format!("reading jobs from {}", path.display()))?,
        None => generate_jobs(&cli.workload(), &mut rng).context("generating workload")?,
    };
    let mut sim = Sim::new(jobs, cli.config()).context("invalid workload")?;

    if !cli.json {
        println!("Initial Job List:");
        for job in sim.jobs() {
            print_job(job, sim.ctx().task_for_job(job.id).map_or(0.0, |t| t.stride));
        }
    }

    let mut runs = Vec::new();
    if matches!(cli.algorithm, Algorithm::Lottery | Algorithm::Both) {
        let mut lottery = LotteryScheduler::new(StdRng::seed_from_u64(seed.wrapping_add(1)));
        let run = sim.run(&mut lottery);
        if !cli.json {
            println!("\n=== Lottery Scheduler Results ===");
            print_report(&run.report, false);
        }
        runs.push(run);
    }
    if matches!(cli.algorithm, Algorithm::Stride | Algorithm::Both) {
        if !cli.json {
            write_stride_table(&mut io::stdout().lock(), &sim)?;
        }
        let mut stride = StrideScheduler::new();
        let run = sim.run(&mut stride);
        if !cli.json {
            println!("\n=== Stride Scheduler Results ===");
            print_report(&run.report, true);
        }
        runs.push(run);
    }

    if cli.json {
        let output = Output {
            seed,
            config: sim.config(),
            jobs: sim.jobs().collect(),
            runs: &runs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn print_job(job: &Job, stride: f64) {
    println!(
        "Process: {} Arrival Time: {} Job Length: {} Tickets: {} Stride: {:.2}",
        JobLabel(job.id),
        job.arrival_time,
        job.length,
        job.tickets,
        stride
    );
}

fn write_stride_table(out: &mut impl Write, sim: &Sim) -> io::Result<()> {
    writeln!(out, "\n=== Stride Values ===")?;
    for task in &sim.ctx().tasks {
        writeln!(out, "Process {}:", JobLabel(task.job.id))?;
        writeln!(out, "  Tickets: {}", task.tickets())?;
        writeln!(out, "  Stride Value: {:.2}\n", task.stride)?;
    }
    Ok(())
}

fn print_report(report: &RunReport, show_pass: bool) {
    println!("\nDetailed Results for {} Scheduling:", report.algorithm);
    println!("===================================================");

    for job in &report.jobs {
        println!("Process {}:", JobLabel(job.id));
        println!("  Tickets: {}", job.tickets);
        if show_pass {
            println!("  Stride Value: {:.2}", job.stride);
            println!("  Final Pass Value: {:.2}", job.final_pass);
        }
        println!("  Expected CPU %: {:.2}%", job.expected_share_pct);
        match job.actual_share_pct {
            Some(pct) => println!("  Actual CPU %: {pct:.2}%"),
            None => println!("  Actual CPU %: n/a"),
        }
        println!("  Total Executions: {}", job.allotments);
        println!("  Arrival Time: {}", job.arrival_time);

        match (job.completion_time, job.turnaround_time, job.response_time) {
            (Some(completion), Some(turnaround), Some(response)) => {
                println!("  Completion Time: {completion}");
                println!("  Turnaround Time: {turnaround}");
                println!("  Response Time: {response}");
            }
            _ => println!("  Process did not complete within simulation time"),
        }
        println!();
    }

    let summary = &report.summary;
    println!("Overall Statistics:");
    if let (Some(turnaround), Some(response)) = (summary.average_turnaround, summary.average_response) {
        println!("  Average Turnaround Time: {turnaround:.2}");
        println!("  Average Response Time: {response:.2}");
    }
    println!("  Completed Jobs: {}/{}", summary.completed_jobs, summary.total_jobs);
    println!("  Idle Steps: {}", summary.idle_steps);
    println!("  Elapsed: {}", summary.elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn command_line_arguments() {
        let cli = Cli::try_parse_from([
            "propshare-sim",
            "--horizon",
            "100",
            "-q",
            "10",
            "-a",
            "stride",
            "--seed",
            "3",
            "--min-tickets",
            "1",
        ])
        .unwrap();

        assert_eq!(cli.algorithm, Algorithm::Stride);
        assert_eq!(cli.seed, Some(3));
        let config = cli.config();
        assert_eq!(config.horizon, 100);
        assert_eq!(config.quantum, 10);
        assert_eq!(config.stride_constant, DEFAULT_STRIDE_CONSTANT);
        assert_eq!(cli.workload().tickets, 1..100);
        assert!(cli.jobs_file.is_none());
    }

    #[test]
    fn stride_table_lists_every_job() {
        let jobs = vec![
            JobDescriptor { id: 0, arrival_time: 0, length: 20, tickets: 75 },
            JobDescriptor { id: 1, arrival_time: 5, length: 20, tickets: 25 },
        ];
        let sim = Sim::new(jobs, SimConfig::default()).unwrap();

        let mut out = Vec::new();
        write_stride_table(&mut out, &sim).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n=== Stride Values ===\n\
             Process A:\n  Tickets: 75\n  Stride Value: 133.33\n\n\
             Process B:\n  Tickets: 25\n  Stride Value: 400.00\n\n"
        );
    }

    #[test]
    fn defaults_match_workload_defaults() {
        let cli = Cli::try_parse_from(["propshare-sim"]).unwrap();
        assert_eq!(cli.workload(), WorkloadParams::default());
        assert_eq!(cli.config(), SimConfig::default());
        assert_eq!(cli.algorithm, Algorithm::Both);
    }
}
