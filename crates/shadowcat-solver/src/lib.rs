//! Optimizer boundary for shadowcat.
//!
//! At every adaptive step the driver hands the current item and passage
//! snapshots to [`solve_step`], which flattens them into a versioned
//! [`SolveInput`], calls a [`ShadowTestSolver`] once and decodes the
//! [`RawSolverResult`] into a [`shadowcat_core::SolverOutcome`].
//!
//! ```
//! use shadowcat_config::{AssemblyOptions, TestAssemblyConfig};
//! use shadowcat_core::{ItemSnapshot, SolverStatus, StepSnapshots, Table};
//! use shadowcat_solver::{solve_step, RawSolverResult, ScriptedSolver};
//!
//! let pool = Table::from_strs(&["Item ID", "B-Param"], &[&["I1", "0.2"], &["I2", "-0.4"]]).unwrap();
//! let config = TestAssemblyConfig::new(1, vec![false, true], pool, AssemblyOptions::default()).unwrap();
//! let snapshots = StepSnapshots::new(
//!     vec![
//!         ItemSnapshot::new("I1", 0, 0.9, true, true, false, false),
//!         ItemSnapshot::new("I2", 1, 0.6, true, true, false, false),
//!     ],
//!     Vec::new(),
//! );
//!
//! let mut solver = ScriptedSolver::new().with_result(RawSolverResult {
//!     item_ids: vec!["I1".to_string()],
//!     item_rows: vec![0],
//!     objective: 0.9,
//!     status_code: Some(2),
//!     ..RawSolverResult::default()
//! });
//!
//! let outcome = solve_step(&mut solver, &config, config.constraints(), &snapshots).unwrap();
//! assert_eq!(outcome.status(), SolverStatus::Optimal);
//! assert_eq!(solver.inputs()[0].items.len(), 2);
//! ```

pub mod error;
pub mod scripted;
pub mod solver;
pub mod wire;


pub use error::SolveError;
pub use scripted::ScriptedSolver;
pub use solver::{solve_step, ShadowTestSolver};
pub use wire::{
    RawSolverResult, SolveInput, WireConstraint, WireItem, WirePassage, WIRE_VERSION,
};
