//! shadowcat core - constraint model and solver contract for shadow-test CAT
//!
//! This crate provides the data exchanged between an adaptive-testing engine
//! and the external optimizer that assembles each shadow test:
//! - Tabular entity model for item and passage pools
//! - Constraint specification parsing and the filter grammar
//! - Per-step item and passage snapshots
//! - Solver outcome decoding and the status code taxonomy

pub mod constraint;
pub mod entity;
pub mod error;
pub mod outcome;
pub mod snapshot;
pub mod table;

#[cfg(test)]
mod outcome_tests;

pub use constraint::{
    parse_constraint, parse_constraint_table, parse_constraint_table_with, parse_constraint_with,
    Constraint, ConstraintColumns, ConstraintLevel, EncodedFilter, FilterLogic, FilterSpec,
    UNBOUNDED, UNBOUNDED_TOKEN,
};
pub use entity::{parse_entity, Item, ItemPoolColumns, Passage, TabularEntity};
pub use error::{Result, ShadowCatError};
pub use outcome::{SolverOutcome, SolverOutcomeBuilder, SolverStatus};
pub use snapshot::{ItemSnapshot, PassageSnapshot, StepSnapshots};
pub use table::Table;
