//! Constraint specifications.
//!
//! One row of a constraint table describes a content constraint: a calculated
//! attribute summed over the selected items (or passages) that pass a filter,
//! bounded below and above. See [`filter`] for the filter grammar.

pub mod filter;

#[cfg(test)]
mod tests;

use std::fmt;

use tracing::{debug, info};

pub use filter::{EncodedFilter, FilterLogic, FilterSpec};

use crate::entity::TabularEntity;
use crate::error::{Result, ShadowCatError};
use crate::table::{column_position, parse_number, Table};

/// Cell text meaning "no bound" in CalLB/CalUB.
pub const UNBOUNDED_TOKEN: &str = "Null";

/// Finite surrogate for an absent bound, so numeric formulations never deal
/// with infinities.
pub const UNBOUNDED: f64 = 1_000_000.0;

/// Column names of a constraint table.
///
/// Call sites whose headers differ inject their own names instead of
/// duplicating the constraint type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintColumns {
    pub id: String,
    pub description: String,
    pub constraint_type: String,
    pub level: String,
    pub cal_attr: String,
    pub cal_lb: String,
    pub cal_ub: String,
    pub filter_attr: String,
    pub filter_logic: String,
    pub filter_data: String,
    /// Optional column; constraints are loaded when it is absent.
    pub is_loaded: String,
}

impl Default for ConstraintColumns {
    fn default() -> Self {
        Self {
            id: "Id".to_string(),
            description: "Description".to_string(),
            constraint_type: "Type".to_string(),
            level: "Level".to_string(),
            cal_attr: "CalAttr".to_string(),
            cal_lb: "CalLB".to_string(),
            cal_ub: "CalUB".to_string(),
            filter_attr: "FilterAttr".to_string(),
            filter_logic: "FilterLogic".to_string(),
            filter_data: "FilterData".to_string(),
            is_loaded: "IsLoaded".to_string(),
        }
    }
}

impl ConstraintColumns {
    /// Names that must be present in every constraint table header.
    pub fn required(&self) -> [&str; 10] {
        [
            self.id.as_str(),
            self.description.as_str(),
            self.constraint_type.as_str(),
            self.level.as_str(),
            self.cal_attr.as_str(),
            self.cal_lb.as_str(),
            self.cal_ub.as_str(),
            self.filter_attr.as_str(),
            self.filter_logic.as_str(),
            self.filter_data.as_str(),
        ]
    }
}

/// Whether a constraint counts items or passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConstraintLevel {
    Item,
    Passage,
}

impl ConstraintLevel {
    /// Parses `item` or `passage` in any letter case.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("item") {
            Ok(Self::Item)
        } else if text.eq_ignore_ascii_case("passage") {
            Ok(Self::Passage)
        } else {
            Err(ShadowCatError::invalid(format!(
                "constraint level must be item or passage, got {text:?}"
            )))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Passage => "passage",
        }
    }
}

impl fmt::Display for ConstraintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed content constraint.
///
/// Everything except the activity is fixed at parse time. The activity is
/// recorded after a solve and tells how binding the constraint was.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    id: String,
    description: String,
    constraint_type: String,
    level: ConstraintLevel,
    cal_attr: String,
    cal_lb: f64,
    cal_ub: f64,
    filter: FilterSpec,
    row_index: usize,
    loaded: bool,
    activity: Option<f64>,
}

impl Constraint {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Free-text type tag.
    pub fn constraint_type(&self) -> &str {
        &self.constraint_type
    }

    pub fn level(&self) -> ConstraintLevel {
        self.level
    }

    /// Name of the attribute summed over filtered entities.
    pub fn cal_attr(&self) -> &str {
        &self.cal_attr
    }

    /// Lower bound, `-UNBOUNDED` when the cell was `Null`.
    pub fn cal_lb(&self) -> f64 {
        self.cal_lb
    }

    /// Upper bound, `UNBOUNDED` when the cell was `Null`.
    pub fn cal_ub(&self) -> f64 {
        self.cal_ub
    }

    pub fn is_lower_bounded(&self) -> bool {
        self.cal_lb > -UNBOUNDED
    }

    pub fn is_upper_bounded(&self) -> bool {
        self.cal_ub < UNBOUNDED
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Position of the source row in the constraint table.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether an item or passage counts towards this constraint.
    pub fn matches(&self, entity: &TabularEntity) -> bool {
        self.filter.matches(entity)
    }

    /// Activity recorded by the last solve, if any.
    pub fn activity(&self) -> Option<f64> {
        self.activity
    }

    pub fn record_activity(&mut self, activity: f64) {
        self.activity = Some(activity);
    }
}

/// Parses one constraint row using the default column names.
///
/// # Errors
///
/// - [`ShadowCatError::ColumnNotFound`] if a required column is missing.
/// - [`ShadowCatError::NumericField`] for malformed CalLB/CalUB or bounds data.
/// - [`ShadowCatError::FilterArityMismatch`] / [`ShadowCatError::UnknownFilterLogic`]
///   for malformed filters.
/// - [`ShadowCatError::InvalidConfiguration`] if CalLB exceeds CalUB.
///
/// # Example
///
/// ```
/// use shadowcat_core::{parse_constraint, ConstraintLevel, UNBOUNDED};
///
/// let columns = [
///     "Id", "Description", "Type", "Level", "CalAttr", "CalLB", "CalUB",
///     "FilterAttr", "FilterLogic", "FilterData",
/// ];
/// let row = [
///     "C1", "Two to four algebra items", "Content", "Item", "", "2", "Null",
///     "Strand", "Set", "Algebra",
/// ];
///
/// let constraint = parse_constraint(&columns, &row, 0).unwrap();
/// assert_eq!(constraint.level(), ConstraintLevel::Item);
/// assert_eq!(constraint.cal_lb(), 2.0);
/// assert_eq!(constraint.cal_ub(), UNBOUNDED);
/// ```
pub fn parse_constraint<C: AsRef<str>, V: AsRef<str>>(
    column_names: &[C],
    row_values: &[V],
    row_index: usize,
) -> Result<Constraint> {
    parse_constraint_with(&ConstraintColumns::default(), column_names, row_values, row_index)
}

/// Parses one constraint row using caller-supplied column names.
pub fn parse_constraint_with<C: AsRef<str>, V: AsRef<str>>(
    columns: &ConstraintColumns,
    column_names: &[C],
    row_values: &[V],
    row_index: usize,
) -> Result<Constraint> {
    if column_names.len() != row_values.len() {
        return Err(ShadowCatError::invalid(format!(
            "constraint row {row_index} has {} cells but the header has {} columns",
            row_values.len(),
            column_names.len()
        )));
    }
    for name in columns.required() {
        column_position(column_names, name)?;
    }
    let cell = |name: &str| lookup(column_names, row_values, name);

    let cal_lb = parse_bound(&columns.cal_lb, cell(&columns.cal_lb)?, -UNBOUNDED)?;
    let cal_ub = parse_bound(&columns.cal_ub, cell(&columns.cal_ub)?, UNBOUNDED)?;
    if cal_lb > cal_ub {
        return Err(ShadowCatError::invalid(format!(
            "constraint row {row_index}: {} {cal_lb} exceeds {} {cal_ub}",
            columns.cal_lb, columns.cal_ub
        )));
    }
    let filter = FilterSpec::parse(
        cell(&columns.filter_attr)?,
        cell(&columns.filter_logic)?,
        cell(&columns.filter_data)?,
    )?;
    let loaded = match column_position(column_names, &columns.is_loaded) {
        Ok(i) => parse_loaded(row_values[i].as_ref()),
        Err(_) => true,
    };

    let constraint = Constraint {
        id: cell(&columns.id)?.trim().to_string(),
        description: cell(&columns.description)?.to_string(),
        constraint_type: cell(&columns.constraint_type)?.trim().to_string(),
        level: ConstraintLevel::parse(cell(&columns.level)?)?,
        cal_attr: cell(&columns.cal_attr)?.trim().to_string(),
        cal_lb,
        cal_ub,
        filter,
        row_index,
        loaded,
        activity: None,
    };

    debug!(
        event = "constraint_parsed",
        id = %constraint.id,
        row = row_index,
        level = %constraint.level,
        filters = constraint.filter.len(),
        loaded,
    );
    Ok(constraint)
}

/// Parses every loaded row of a constraint table, in row order.
pub fn parse_constraint_table(table: &Table) -> Result<Vec<Constraint>> {
    parse_constraint_table_with(&ConstraintColumns::default(), table)
}

/// Parses every loaded row of a constraint table with caller-supplied column names.
///
/// Rows whose `IsLoaded` cell says otherwise are skipped; the first failing
/// row aborts the whole table.
pub fn parse_constraint_table_with(
    columns: &ConstraintColumns,
    table: &Table,
) -> Result<Vec<Constraint>> {
    let mut constraints = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for (row_index, row) in table.rows().iter().enumerate() {
        let constraint = parse_constraint_with(columns, table.columns(), row, row_index)?;
        if constraint.is_loaded() {
            constraints.push(constraint);
        } else {
            debug!(event = "constraint_skipped", id = %constraint.id, row = row_index);
            skipped += 1;
        }
    }

    info!(
        event = "constraints_loaded",
        constraint_count = constraints.len(),
        skipped,
    );
    Ok(constraints)
}

fn lookup<'v, C: AsRef<str>, V: AsRef<str>>(
    column_names: &[C],
    row_values: &'v [V],
    name: &str,
) -> Result<&'v str> {
    column_position(column_names, name).map(|i| row_values[i].as_ref())
}

fn parse_bound(column: &str, text: &str, unbounded: f64) -> Result<f64> {
    if text.trim() == UNBOUNDED_TOKEN {
        Ok(unbounded)
    } else {
        parse_number(column, text)
    }
}

fn parse_loaded(text: &str) -> bool {
    let text = text.trim();
    !(text.eq_ignore_ascii_case("false") || text == "0" || text.eq_ignore_ascii_case("no"))
}
