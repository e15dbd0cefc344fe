//! shadowcat - Shadow-Test Assembly for CAT
//!
//! Load a test design once, then hand each adaptive step to an optimizer.
//!
//! # Example
//!
//! ```rust
//! use shadowcat::prelude::*;
//!
//! let filter = FilterSpec::parse("B-Param|Format", "Bounds|Set", "-1|1#MC").unwrap();
//! assert_eq!(filter.len(), 2);
//!
//! assert_eq!(SolverStatus::from_code(6).unwrap(), SolverStatus::Infeasible);
//! ```

#[cfg(test)]
mod tests;

// Tabular model and constraints
pub use shadowcat_core::{
    parse_constraint, parse_constraint_table, parse_constraint_table_with, parse_constraint_with,
    parse_entity, Constraint, ConstraintColumns, ConstraintLevel, EncodedFilter, FilterLogic,
    FilterSpec, Item, ItemPoolColumns, Passage, ShadowCatError, Table, TabularEntity, UNBOUNDED,
    UNBOUNDED_TOKEN,
};

// Step state and outcomes
pub use shadowcat_core::{
    ItemSnapshot, PassageSnapshot, SolverOutcome, SolverOutcomeBuilder, SolverStatus,
    StepSnapshots,
};

// Configuration
pub use shadowcat_config::{AssemblyOptions, ConfigError, PassagePool, TestAssemblyConfig};

// Optimizer boundary
pub use shadowcat_solver::{
    solve_step, RawSolverResult, ScriptedSolver, ShadowTestSolver, SolveError, SolveInput,
    WireConstraint, WireItem, WirePassage, WIRE_VERSION,
};

/// Console output, available with the `console` feature.
#[cfg(feature = "console")]
pub use shadowcat_console as console;

pub mod prelude {
    pub use super::{
        AssemblyOptions, Constraint, ConstraintLevel, FilterSpec, ItemSnapshot, PassagePool,
        PassageSnapshot, StepSnapshots, Table, TestAssemblyConfig,
    };
    pub use super::{solve_step, RawSolverResult, ShadowTestSolver, SolveError, SolveInput};
    pub use super::{SolverOutcome, SolverStatus};
}
