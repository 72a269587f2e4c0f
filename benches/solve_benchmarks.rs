//! Performance benchmarks for the Shift Rostering Engine.
//!
//! This benchmark suite tracks the solve pipeline across instance sizes:
//! model compilation, the bounded search, and schedule reconstruction.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use roster_engine::models::{
    CoverageCalendar, Employee, FairnessPolicy, SchedulingProblem, ShiftRequest, ShiftSet,
};
use roster_engine::solver::{SolveOptions, solve_schedule};

/// Builds a rostering instance with alternating Day/Night preferences and
/// coverage floors matching the per-day candidate pool on both working
/// shifts.
fn build_problem(num_employees: usize, weeks: usize) -> SchedulingProblem {
    let num_days = weeks * 7;
    let demand = (num_employees / 2).max(1) as i64;
    let employees: Vec<Employee> = (0..num_employees)
        .map(|index| Employee {
            id: format!("emp_{:03}", index + 1),
            company: "acme_care".to_string(),
        })
        .collect();

    let mut requests = Vec::new();
    for employee in 0..num_employees {
        for day in 0..num_days {
            requests.push(ShiftRequest {
                employee,
                shift: 1 + (employee + day) % 2,
                day,
                weight: -1,
            });
        }
    }

    SchedulingProblem {
        employees,
        shift_types: ShiftSet::new(vec![
            "Off".to_string(),
            "Day".to_string(),
            "Night".to_string(),
        ]),
        num_days,
        requests,
        fixed_assignments: Vec::new(),
        run_length_rules: Vec::new(),
        weekly_sum_rules: Vec::new(),
        transition_penalties: Vec::new(),
        coverage: Some(CoverageCalendar {
            start_weekday: 0,
            demands: vec![vec![0, demand, demand]; 7],
            shortage_cost: 9,
            excess_costs: Vec::new(),
        }),
        fairness: Some(FairnessPolicy { shift: 1, cost: 2 }),
    }
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    for &(num_employees, weeks) in &[(2usize, 1usize), (4, 1), (4, 2)] {
        let problem = build_problem(num_employees, weeks);
        let options = SolveOptions::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_employees}emp_{weeks}wk")),
            &problem,
            |bencher, problem| {
                bencher.iter(|| solve_schedule(black_box(problem), None, &options).unwrap())
            },
        );
    }
    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let problem = build_problem(4, 2);
    c.bench_function("validate", |bencher| {
        bencher.iter(|| black_box(&problem).validate().unwrap())
    });
}

criterion_group!(benches, bench_solve, bench_validation);
criterion_main!(benches);
