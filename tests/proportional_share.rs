//! End-to-end runs of both policies over small hand-built workloads.

use propshare_sim::{
    JobDescriptor, LotteryScheduler, Sim, SimConfig, StrideScheduler,
    core::Ticks,
    scheduler::ScriptedDraws,
    sim::Dispatch,
};

fn desc(id: u32, arrival_time: i64, length: i64, tickets: i64) -> JobDescriptor {
    JobDescriptor {
        id,
        arrival_time,
        length,
        tickets,
    }
}

fn config(horizon: Ticks, quantum: Ticks) -> SimConfig {
    SimConfig {
        horizon,
        quantum,
        ..SimConfig::default()
    }
}

const A: u32 = 0;
const B: u32 = 1;

#[test]
fn test_stride_two_jobs_three_to_one() {
    let jobs = vec![desc(A, 0, 20, 75), desc(B, 0, 20, 25)];
    let mut sim = Sim::new(jobs, config(100, 10)).unwrap();
    let run = sim.run(&mut StrideScheduler::new());

    let a = run.report.job(A).unwrap();
    let b = run.report.job(B).unwrap();
    assert!((a.stride - 133.333_333).abs() < 1e-3);
    assert_eq!(b.stride, 400.0);

    // Tie at pass 0 goes to A, then B's untouched pass wins once
    assert_eq!(
        run.dispatches,
        vec![
            Dispatch { job: A, start: 0, slice: 10 },
            Dispatch { job: B, start: 10, slice: 10 },
            Dispatch { job: A, start: 20, slice: 10 },
            Dispatch { job: B, start: 30, slice: 10 },
        ]
    );

    assert_eq!(a.allotments, 2);
    assert_eq!(b.allotments, 2);
    assert_eq!(a.completion_time, Some(20));
    assert_eq!(b.completion_time, Some(30));
    assert_eq!(a.turnaround_time, Some(20));
    assert_eq!(b.turnaround_time, Some(30));
    assert_eq!(a.response_time, Some(0));
    assert_eq!(b.response_time, Some(10));
    assert_eq!(a.expected_share_pct, 75.0);
    assert_eq!(a.actual_share_pct, Some(50.0));

    assert_eq!(run.report.summary.completed_jobs, 2);
    assert_eq!(run.report.summary.average_turnaround, Some(25.0));
    assert_eq!(run.report.summary.average_response, Some(5.0));
    assert_eq!(run.report.summary.elapsed, 40);
}

#[test]
fn test_completion_recorded_at_final_dispatch() {
    let jobs = vec![desc(A, 0, 1, 10), desc(B, 0, 25, 10)];
    let mut sim = Sim::new(jobs, config(100, 10)).unwrap();

    let mut lottery = LotteryScheduler::new(ScriptedDraws::new([0]));
    let mut stride = StrideScheduler::new();
    for run in [sim.run(&mut lottery), sim.run(&mut stride)] {
        // A finishes inside its first slice, dispatched at 0
        let a = run.report.job(A).unwrap();
        assert_eq!(a.first_dispatch, Some(0));
        assert_eq!(a.completion_time, Some(0));
        assert_eq!(a.turnaround_time, Some(0));
        assert_eq!(a.response_time, Some(0));

        // B's third and last slice starts at 30
        let b = run.report.job(B).unwrap();
        assert_eq!(b.allotments, 3);
        assert_eq!(b.completion_time, Some(30));
        assert_eq!(b.turnaround_time, Some(30));
        assert_eq!(run.report.summary.elapsed, 40);
    }
}

#[test]
fn test_stride_favours_more_tickets_under_contention() {
    let jobs = vec![desc(A, 0, 1_000, 75), desc(B, 0, 1_000, 25)];
    let mut sim = Sim::new(jobs, config(400, 1)).unwrap();
    let run = sim.run(&mut StrideScheduler::new());

    let a = run.report.job(A).unwrap();
    let b = run.report.job(B).unwrap();
    assert!(a.allotments > b.allotments);
    assert_eq!(a.allotments + b.allotments, 400);
    assert!((a.actual_share_pct.unwrap() - 75.0).abs() <= 0.5);
}

#[test]
fn test_lottery_scripted_draws() {
    // Ready tickets total 100 while both jobs run: A holds [0, 75), B [75, 100)
    let jobs = vec![desc(A, 0, 2, 75), desc(B, 0, 2, 25)];
    let mut sim = Sim::new(jobs, config(100, 1)).unwrap();
    let mut lottery = LotteryScheduler::new(ScriptedDraws::new([80, 74, 99, 0]));
    let run = sim.run(&mut lottery);

    assert_eq!(run.order(), vec![B, A, B, A]);
    assert_eq!(run.report.job(B).unwrap().completion_time, Some(2));
    assert_eq!(run.report.job(A).unwrap().completion_time, Some(3));
}

#[test]
fn test_lottery_converges_to_ticket_ratio() {
    for seed in 0..5 {
        let jobs = vec![desc(A, 0, 1_000_000, 75), desc(B, 0, 1_000_000, 25)];
        let mut sim = Sim::new(jobs, config(100_000, 1)).unwrap();
        let run = sim.run(&mut LotteryScheduler::from_seed(seed));

        let a = run.report.job(A).unwrap().actual_share_pct.unwrap();
        let b = run.report.job(B).unwrap().actual_share_pct.unwrap();
        assert!((a - 75.0).abs() < 1.0, "seed {seed}: A got {a:.2}%");
        assert!((b - 25.0).abs() < 1.0, "seed {seed}: B got {b:.2}%");
    }
}

#[test]
fn test_job_arriving_after_horizon_never_runs() {
    let jobs = vec![desc(A, 0, 10, 10), desc(B, 500, 10, 90)];
    let mut sim = Sim::new(jobs, config(100, 1)).unwrap();

    let mut lottery = LotteryScheduler::from_seed(1);
    let mut stride = StrideScheduler::new();
    for run in [sim.run(&mut lottery), sim.run(&mut stride)] {
        let late = run.report.job(B).unwrap();
        assert_eq!(late.allotments, 0);
        assert!(!late.completed());
        assert_eq!(late.response_time, None);
        assert_eq!(late.actual_share_pct, Some(0.0));
        assert_eq!(late.expected_share_pct, 90.0);
        assert_eq!(run.report.summary.completed_jobs, 1);
        assert_eq!(run.report.summary.elapsed, 100);
    }
}

#[test]
fn test_run_to_completion_when_quantum_covers_length() {
    let jobs = vec![desc(A, 0, 30, 10), desc(B, 0, 30, 90)];
    let mut sim = Sim::new(jobs, config(1_000, 30)).unwrap();
    let run = sim.run(&mut StrideScheduler::new());

    // Each job runs exactly once, start to finish
    assert_eq!(run.order(), vec![A, B]);
    assert!(run.report.jobs.iter().all(|j| j.allotments == 1));
}

#[test]
fn test_stride_constant_does_not_change_order() {
    let jobs = || vec![desc(0, 0, 40, 40), desc(1, 0, 40, 10), desc(2, 5, 40, 20)];
    let small = Sim::new(jobs(), SimConfig { stride_constant: 400.0, ..config(200, 1) })
        .unwrap()
        .run(&mut StrideScheduler::new());
    let large = Sim::new(jobs(), SimConfig { stride_constant: 40_000.0, ..config(200, 1) })
        .unwrap()
        .run(&mut StrideScheduler::new());

    assert_eq!(small.dispatches, large.dispatches);
    assert_eq!(small.report.summary, large.report.summary);
}

#[test]
fn test_lottery_then_stride_on_identical_workload() {
    let jobs = vec![desc(0, 0, 50, 30), desc(1, 10, 60, 60), desc(2, 20, 50, 10)];
    let mut sim = Sim::new(jobs.clone(), SimConfig::default()).unwrap();

    let _ = sim.run(&mut LotteryScheduler::from_seed(11));
    let after_lottery = sim.run(&mut StrideScheduler::new());
    let fresh = Sim::new(jobs, SimConfig::default())
        .unwrap()
        .run(&mut StrideScheduler::new());

    assert_eq!(after_lottery, fresh);
}
