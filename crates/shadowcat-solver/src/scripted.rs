//! A solver that replays queued results.

use std::collections::VecDeque;

use crate::error::SolveError;
use crate::solver::ShadowTestSolver;
use crate::wire::{RawSolverResult, SolveInput};

/// Returns queued results in order and records every input it receives.
///
/// Once the script runs out every call fails with [`SolveError::Solver`].
///
/// # Example
///
/// ```
/// use shadowcat_solver::{RawSolverResult, ScriptedSolver};
///
/// let solver = ScriptedSolver::new()
///     .with_result(RawSolverResult::with_status(2))
///     .with_failure("license expired");
///
/// assert_eq!(solver.remaining(), 2);
/// assert!(solver.inputs().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedSolver {
    script: VecDeque<Result<RawSolverResult, String>>,
    inputs: Vec<SolveInput>,
}

impl ScriptedSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a result.
    pub fn with_result(mut self, result: RawSolverResult) -> Self {
        self.script.push_back(Ok(result));
        self
    }

    /// Queues a solver failure.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.script.push_back(Err(message.into()));
        self
    }

    pub fn push_result(&mut self, result: RawSolverResult) {
        self.script.push_back(Ok(result));
    }

    /// Inputs received so far, oldest first.
    pub fn inputs(&self) -> &[SolveInput] {
        &self.inputs
    }

    pub fn calls(&self) -> usize {
        self.inputs.len()
    }

    /// Queued entries not yet replayed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ShadowTestSolver for ScriptedSolver {
    fn solve(&mut self, input: &SolveInput) -> Result<RawSolverResult, SolveError> {
        self.inputs.push(input.clone());
        match self.script.pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(SolveError::Solver(message)),
            None => Err(SolveError::Solver(format!(
                "script exhausted after {} calls",
                self.inputs.len() - 1
            ))),
        }
    }
}
