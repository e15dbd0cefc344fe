//! End-to-end tests over several adaptive steps.

use std::sync::{Arc, Mutex};
use std::thread;

use shadowcat_test::{
    constraint_table, item_pool, item_pool_mask, passage_pool, passage_pool_mask, step_snapshots,
};

use crate::prelude::*;

fn config() -> TestAssemblyConfig {
    let options = AssemblyOptions::new()
        .with_id("grade7")
        .with_passage_pool(PassagePool::new(passage_pool(), passage_pool_mask()))
        .with_constraint_table(constraint_table());
    TestAssemblyConfig::new(3, item_pool_mask(), item_pool(), options).unwrap()
}

/// Picks the most informative items that have not been administered yet,
/// keeping administered items in the shadow test.
struct KeepAdministered;

impl ShadowTestSolver for KeepAdministered {
    fn solve(&mut self, input: &SolveInput) -> Result<RawSolverResult, SolveError> {
        let mut chosen: Vec<_> = input.items.iter().filter(|i| i.administered).collect();
        let mut fresh: Vec<_> = input
            .items
            .iter()
            .filter(|i| !i.administered && i.eligible && i.eligible_hard)
            .collect();
        fresh.sort_by(|a, b| b.information.total_cmp(&a.information));
        chosen.extend(fresh);
        chosen.truncate(input.test_length);
        chosen.sort_by_key(|i| i.row);

        Ok(RawSolverResult {
            item_ids: chosen.iter().map(|i| i.id.clone()).collect(),
            item_rows: chosen.iter().map(|i| i.row).collect(),
            objective: chosen.iter().map(|i| i.information).sum(),
            status_code: Some(if chosen.len() == input.test_length { 2 } else { 6 }),
            ..RawSolverResult::default()
        })
    }
}

#[test]
fn test_shadow_tests_across_steps() {
    let config = config();
    let mut solver = KeepAdministered;
    let mut administered = Vec::new();

    for _ in 0..config.test_length() {
        let snapshots = step_snapshots(&administered);
        let outcome = solve_step(&mut solver, &config, config.constraints(), &snapshots).unwrap();
        assert_eq!(outcome.status(), SolverStatus::Optimal);
        assert_eq!(outcome.item_rows().len(), config.test_length());
        for row in &administered {
            assert!(outcome.item_rows().contains(row));
        }

        let next = outcome
            .item_rows()
            .iter()
            .copied()
            .find(|row| !administered.contains(row))
            .unwrap();
        administered.push(next);
    }

    assert_eq!(administered, vec![0, 1, 2]);
}

#[test]
fn test_shared_solver_serialized_by_caller() {
    let config = Arc::new(config());
    let solver = Arc::new(Mutex::new(
        crate::ScriptedSolver::new()
            .with_result(RawSolverResult::with_status(2))
            .with_result(RawSolverResult::with_status(4)),
    ));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let config = Arc::clone(&config);
            let solver = Arc::clone(&solver);
            thread::spawn(move || {
                let mut guard = solver.lock().unwrap();
                solve_step(&mut *guard, &config, config.constraints(), &step_snapshots(&[]))
                    .unwrap()
                    .status()
            })
        })
        .collect();

    let mut statuses: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    statuses.sort_by_key(|s| s.code());
    assert_eq!(statuses, vec![SolverStatus::Optimal, SolverStatus::Unfinished]);
    assert_eq!(solver.lock().unwrap().calls(), 2);
}
