//! Solver capability and the per-step driver.

use std::time::Instant;

use tracing::{info, warn};

use shadowcat_config::TestAssemblyConfig;
use shadowcat_core::{Constraint, ShadowCatError, SolverOutcome, StepSnapshots};

use crate::error::SolveError;
use crate::wire::{RawSolverResult, SolveInput};

/// An optimizer that assembles one shadow test per call.
///
/// Implementations usually wrap a single compiled model that lives for the
/// whole process and is not reentrant. `solve` takes `&mut self`, so callers
/// running several examinee simulations concurrently must serialize access
/// themselves, for example behind a `Mutex`. Nothing in this crate locks.
///
/// A solve has no timeout here. An optimizer that stops early reports
/// status code 4 (unfinished) and the caller decides whether to retry.
pub trait ShadowTestSolver {
    /// Solves one step.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Solver`] when the optimizer cannot produce a
    /// result at all. Infeasibility is a status, not an error.
    fn solve(&mut self, input: &SolveInput) -> Result<RawSolverResult, SolveError>;
}

impl<T: ShadowTestSolver + ?Sized> ShadowTestSolver for &mut T {
    fn solve(&mut self, input: &SolveInput) -> Result<RawSolverResult, SolveError> {
        (**self).solve(input)
    }
}

impl<T: ShadowTestSolver + ?Sized> ShadowTestSolver for Box<T> {
    fn solve(&mut self, input: &SolveInput) -> Result<RawSolverResult, SolveError> {
        (**self).solve(input)
    }
}

/// Runs one adaptive step against a solver.
///
/// Builds the input, calls the solver exactly once and decodes its result.
/// Selected rows are checked against the configured pools. There are no
/// retries.
///
/// # Errors
///
/// Propagates input, solver and decode failures. A selected row outside its
/// pool is reported as [`SolveError::Decode`].
pub fn solve_step<S: ShadowTestSolver + ?Sized>(
    solver: &mut S,
    config: &TestAssemblyConfig,
    constraints: &[Constraint],
    snapshots: &StepSnapshots,
) -> Result<SolverOutcome, SolveError> {
    let input = SolveInput::from_step(config, constraints, snapshots)?;

    info!(
        event = "solve_start",
        id = %config.id(),
        test_length = config.test_length(),
        item_count = input.items.len(),
        passage_count = input.passages.len(),
        constraint_count = input.constraints.len(),
        eligible_count = snapshots.eligible_item_count(),
        administered_count = snapshots.administered_count(),
    );

    let start = Instant::now();
    let raw = solver.solve(&input).inspect_err(|e| {
        warn!(event = "solve_failed", id = %config.id(), error = %e);
    })?;
    let outcome = raw.decode()?;
    check_selection(config, &outcome)?;
    let duration_ms = start.elapsed().as_millis() as u64;

    let status = outcome.status();
    if status.has_solution() {
        info!(
            event = "solve_end",
            id = %config.id(),
            status = status.as_str(),
            objective = outcome.objective(),
            selected_count = outcome.item_rows().len(),
            duration_ms,
        );
    } else {
        warn!(
            event = "solve_end",
            id = %config.id(),
            status = status.as_str(),
            objective = outcome.objective(),
            selected_count = outcome.item_rows().len(),
            duration_ms,
        );
    }

    Ok(outcome)
}

fn check_selection(config: &TestAssemblyConfig, outcome: &SolverOutcome) -> Result<(), SolveError> {
    if let Some(row) = outcome
        .item_rows()
        .iter()
        .find(|&&row| row >= config.items().len())
    {
        return Err(SolveError::Decode(ShadowCatError::InvalidConfiguration(
            format!("selected item row {row} is outside the item pool"),
        )));
    }
    let passage_rows = outcome
        .passage_rows()
        .iter()
        .chain(outcome.passage_order().unwrap_or(&[]));
    for row in passage_rows {
        if *row >= config.passages().len() {
            return Err(SolveError::Decode(ShadowCatError::InvalidConfiguration(
                format!("selected passage row {row} is outside the passage pool"),
            )));
        }
    }
    Ok(())
}
