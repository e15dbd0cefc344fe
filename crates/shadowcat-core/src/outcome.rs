//! Solver outcome and status taxonomy.
//!
//! The optimizer reports its termination condition as an integer code. The
//! code table is defined by the optimizer, so [`SolverStatus::from_code`]
//! accepts exactly those codes and nothing else.

use std::collections::BTreeMap;
use std::fmt;

use crate::constraint::Constraint;
use crate::error::{Result, ShadowCatError};

/// Termination condition of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Search stopped before proving optimality; the incumbent may be usable.
    Unfinished,
    /// No feasible solution under the current constraints.
    Infeasible,
    /// Objective unbounded. Indicates a modeling defect.
    Unbounded,
    /// Any other solver condition.
    Other,
}

impl SolverStatus {
    /// Decodes a wire status code.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::UnknownSolverStatus`] for any code outside
    /// `{2, 4, 6, 8, 10}`.
    ///
    /// # Example
    ///
    /// ```
    /// use shadowcat_core::SolverStatus;
    ///
    /// assert_eq!(SolverStatus::from_code(2).unwrap(), SolverStatus::Optimal);
    /// assert!(SolverStatus::from_code(99).is_err());
    /// ```
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            2 => Ok(Self::Optimal),
            4 => Ok(Self::Unfinished),
            6 => Ok(Self::Infeasible),
            8 => Ok(Self::Unbounded),
            10 => Ok(Self::Other),
            _ => Err(ShadowCatError::UnknownSolverStatus(code)),
        }
    }

    /// Wire code of this status.
    pub fn code(self) -> i32 {
        match self {
            Self::Optimal => 2,
            Self::Unfinished => 4,
            Self::Infeasible => 6,
            Self::Unbounded => 8,
            Self::Other => 10,
        }
    }

    /// Whether the solve produced a selection worth using.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Unfinished)
    }

    pub fn is_optimal(self) -> bool {
        self == Self::Optimal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Unfinished => "UNFINISHED",
            Self::Infeasible => "INFEASIBLE",
            Self::Unbounded => "UNBOUNDED",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed result of one solve.
///
/// Position *i* of the id and row sequences refers to the same item (or
/// passage).
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    item_ids: Vec<String>,
    item_rows: Vec<usize>,
    passage_ids: Vec<String>,
    passage_rows: Vec<usize>,
    passage_order: Option<Vec<usize>>,
    objective: f64,
    status: SolverStatus,
    constraint_activities: BTreeMap<usize, f64>,
}

impl SolverOutcome {
    /// Starts an accumulator with every field at its default.
    pub fn builder() -> SolverOutcomeBuilder {
        SolverOutcomeBuilder::new()
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn item_rows(&self) -> &[usize] {
        &self.item_rows
    }

    pub fn passage_ids(&self) -> &[String] {
        &self.passage_ids
    }

    pub fn passage_rows(&self) -> &[usize] {
        &self.passage_rows
    }

    /// Passage row indices in administration order, when sequencing matters.
    pub fn passage_order(&self) -> Option<&[usize]> {
        self.passage_order.as_deref()
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// Selected items as `(id, row)` pairs.
    pub fn selected_items(&self) -> impl Iterator<Item = (&str, usize)> {
        self.item_ids
            .iter()
            .map(String::as_str)
            .zip(self.item_rows.iter().copied())
    }

    /// Selected passages as `(id, row)` pairs.
    pub fn selected_passages(&self) -> impl Iterator<Item = (&str, usize)> {
        self.passage_ids
            .iter()
            .map(String::as_str)
            .zip(self.passage_rows.iter().copied())
    }

    /// Activity per constraint row index, as reported by the optimizer.
    pub fn constraint_activities(&self) -> &BTreeMap<usize, f64> {
        &self.constraint_activities
    }

    /// Records reported activities on the matching constraints.
    ///
    /// Returns the number of constraints updated.
    pub fn apply_activities(&self, constraints: &mut [Constraint]) -> usize {
        let mut updated = 0;
        for constraint in constraints.iter_mut() {
            if let Some(&activity) = self.constraint_activities.get(&constraint.row_index()) {
                constraint.record_activity(activity);
                updated += 1;
            }
        }
        updated
    }
}

/// Single-writer accumulator for a [`SolverOutcome`].
///
/// Each setter replaces its field. Unset sequences finalize empty, the
/// objective as `0.0`, and the status as [`SolverStatus::Other`] only if no
/// status code was ever supplied.
///
/// # Example
///
/// ```
/// use shadowcat_core::{SolverOutcome, SolverStatus};
///
/// let outcome = SolverOutcome::builder()
///     .item_ids(vec!["I7".to_string()])
///     .item_rows(vec![6])
///     .objective(3.25)
///     .status_code(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(outcome.status(), SolverStatus::Optimal);
/// assert_eq!(outcome.selected_items().collect::<Vec<_>>(), vec![("I7", 6)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverOutcomeBuilder {
    item_ids: Vec<String>,
    item_rows: Vec<usize>,
    passage_ids: Vec<String>,
    passage_rows: Vec<usize>,
    passage_order: Option<Vec<usize>>,
    objective: f64,
    status: Option<SolverStatus>,
    constraint_activities: BTreeMap<usize, f64>,
}

impl SolverOutcomeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_ids(mut self, ids: Vec<String>) -> Self {
        self.item_ids = ids;
        self
    }

    pub fn item_rows(mut self, rows: Vec<usize>) -> Self {
        self.item_rows = rows;
        self
    }

    pub fn passage_ids(mut self, ids: Vec<String>) -> Self {
        self.passage_ids = ids;
        self
    }

    pub fn passage_rows(mut self, rows: Vec<usize>) -> Self {
        self.passage_rows = rows;
        self
    }

    pub fn passage_order(mut self, order: Vec<usize>) -> Self {
        self.passage_order = Some(order);
        self
    }

    pub fn objective(mut self, objective: f64) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the status from its wire code.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::UnknownSolverStatus`] for an unknown code.
    pub fn status_code(mut self, code: i32) -> Result<Self> {
        self.status = Some(SolverStatus::from_code(code)?);
        Ok(self)
    }

    pub fn constraint_activities(
        mut self,
        activities: impl IntoIterator<Item = (usize, f64)>,
    ) -> Self {
        self.constraint_activities = activities.into_iter().collect();
        self
    }

    /// Finalizes the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::InvalidConfiguration`] if an id sequence and
    /// its row sequence differ in length.
    pub fn build(self) -> Result<SolverOutcome> {
        if self.item_ids.len() != self.item_rows.len() {
            return Err(ShadowCatError::invalid(format!(
                "{} selected item ids but {} item rows",
                self.item_ids.len(),
                self.item_rows.len()
            )));
        }
        if self.passage_ids.len() != self.passage_rows.len() {
            return Err(ShadowCatError::invalid(format!(
                "{} selected passage ids but {} passage rows",
                self.passage_ids.len(),
                self.passage_rows.len()
            )));
        }
        Ok(SolverOutcome {
            item_ids: self.item_ids,
            item_rows: self.item_rows,
            passage_ids: self.passage_ids,
            passage_rows: self.passage_rows,
            passage_order: self.passage_order,
            objective: self.objective,
            status: self.status.unwrap_or(SolverStatus::Other),
            constraint_activities: self.constraint_activities,
        })
    }
}
