//! Versioned wire format between the step driver and the optimizer.
//!
//! [`SolveInput::from_step`] is the only place domain values are flattened
//! into solver terms, and [`RawSolverResult::decode`] is the only place solver
//! output becomes a typed [`SolverOutcome`]. Both sides carry
//! [`WIRE_VERSION`] so an adapter built against a different layout fails
//! loudly instead of misreading fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shadowcat_config::TestAssemblyConfig;
use shadowcat_core::{Constraint, ConstraintLevel, ShadowCatError, SolverOutcome, StepSnapshots};

use crate::error::SolveError;

/// Layout version of [`SolveInput`] and [`RawSolverResult`].
pub const WIRE_VERSION: u32 = 1;

/// One candidate item as the optimizer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireItem {
    pub id: String,
    pub row: usize,
    /// Row of the owning passage, `None` for discrete items.
    pub passage_row: Option<usize>,
    pub information: f64,
    pub eligible: bool,
    pub eligible_hard: bool,
    pub administered: bool,
    pub selected: bool,
}

/// One candidate passage as the optimizer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePassage {
    pub id: String,
    pub row: usize,
    pub eligible: bool,
}

/// A constraint reduced to a linear row over item or passage rows.
///
/// `coefficients[i]` applies to `member_rows[i]`. Counting constraints use
/// `1.0`; constraints with a calculation attribute use that attribute's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireConstraint {
    pub id: String,
    pub row: usize,
    pub level: ConstraintLevel,
    pub lower: f64,
    pub upper: f64,
    pub member_rows: Vec<usize>,
    pub coefficients: Vec<f64>,
}

/// Everything the optimizer needs for one adaptive step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveInput {
    pub wire_version: u32,
    pub test_id: String,
    pub test_length: usize,
    pub num_passage_lb: usize,
    pub num_passage_ub: usize,
    pub num_item_per_passage_lb: usize,
    pub num_item_per_passage_ub: usize,
    pub length_priority: f64,
    pub eligibility_priority: f64,
    pub enable_enemy_item_constraint: bool,
    pub items: Vec<WireItem>,
    pub passages: Vec<WirePassage>,
    pub constraints: Vec<WireConstraint>,
}

impl SolveInput {
    /// Flattens one step's state into a solve input.
    ///
    /// Snapshots are the candidate set: every snapshot must name the item or
    /// passage found at its row in the configuration. Constraint membership
    /// is evaluated against the configured pools.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Input`] when a snapshot row is out of range or
    /// its id disagrees with the pool, or when a calculation attribute is not
    /// numeric on a member entity.
    pub fn from_step(
        config: &TestAssemblyConfig,
        constraints: &[Constraint],
        snapshots: &StepSnapshots,
    ) -> Result<Self, SolveError> {
        let items = snapshots
            .items()
            .iter()
            .map(|snapshot| {
                let item = config.items().get(snapshot.row_index());
                check_snapshot("item", snapshot.id(), snapshot.row_index(), item.map(|i| i.id()))?;
                Ok(WireItem {
                    id: snapshot.id().to_string(),
                    row: snapshot.row_index(),
                    passage_row: config.passage_row_of_item(snapshot.row_index()),
                    information: snapshot.information(),
                    eligible: snapshot.eligible(),
                    eligible_hard: snapshot.eligible_hard(),
                    administered: snapshot.administered(),
                    selected: snapshot.selected(),
                })
            })
            .collect::<Result<Vec<_>, SolveError>>()?;

        let passages = snapshots
            .passages()
            .iter()
            .map(|snapshot| {
                let passage = config.passages().get(snapshot.row_index());
                check_snapshot(
                    "passage",
                    snapshot.id(),
                    snapshot.row_index(),
                    passage.map(|p| p.id()),
                )?;
                Ok(WirePassage {
                    id: snapshot.id().to_string(),
                    row: snapshot.row_index(),
                    eligible: snapshot.eligible(),
                })
            })
            .collect::<Result<Vec<_>, SolveError>>()?;

        let constraints = constraints
            .iter()
            .map(|constraint| wire_constraint(config, constraint))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            wire_version: WIRE_VERSION,
            test_id: config.id().to_string(),
            test_length: config.test_length(),
            num_passage_lb: config.num_passage_lb(),
            num_passage_ub: config.num_passage_ub(),
            num_item_per_passage_lb: config.num_item_per_passage_lb(),
            num_item_per_passage_ub: config.num_item_per_passage_ub(),
            length_priority: config.length_priority(),
            eligibility_priority: config.eligibility_priority(),
            enable_enemy_item_constraint: config.enable_enemy_item_constraint(),
            items,
            passages,
            constraints,
        })
    }

    pub fn to_json(&self) -> Result<String, SolveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, SolveError> {
        Ok(serde_json::from_str(s)?)
    }
}

fn check_snapshot(
    what: &str,
    id: &str,
    row: usize,
    configured: Option<&str>,
) -> Result<(), SolveError> {
    match configured {
        Some(expected) if expected == id => Ok(()),
        Some(expected) => Err(SolveError::Input(ShadowCatError::InvalidConfiguration(
            format!("{what} snapshot {id} at row {row} does not match pool {what} {expected}"),
        ))),
        None => Err(SolveError::Input(ShadowCatError::InvalidConfiguration(
            format!("{what} snapshot {id} refers to row {row} outside the pool"),
        ))),
    }
}

fn wire_constraint(
    config: &TestAssemblyConfig,
    constraint: &Constraint,
) -> Result<WireConstraint, SolveError> {
    let members: Vec<_> = match constraint.level() {
        ConstraintLevel::Item => config
            .items()
            .iter()
            .map(|item| item.entity())
            .filter(|entity| constraint.matches(entity))
            .collect(),
        ConstraintLevel::Passage => config
            .passages()
            .iter()
            .map(|passage| passage.entity())
            .filter(|entity| constraint.matches(entity))
            .collect(),
    };

    let cal_attr = constraint.cal_attr();
    let coefficients = members
        .iter()
        .map(|entity| {
            if cal_attr.is_empty() {
                return Ok(1.0);
            }
            entity.numeric(cal_attr).ok_or_else(|| {
                SolveError::Input(ShadowCatError::ColumnNotFound {
                    column: cal_attr.to_string(),
                })
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WireConstraint {
        id: constraint.id().to_string(),
        row: constraint.row_index(),
        level: constraint.level(),
        lower: constraint.cal_lb(),
        upper: constraint.cal_ub(),
        member_rows: members.iter().map(|entity| entity.row_index()).collect(),
        coefficients,
    })
}

/// Raw optimizer output for one step.
///
/// Everything but `wire_version` may be omitted on the wire. A missing
/// `status_code` decodes as [`shadowcat_core::SolverStatus::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSolverResult {
    pub wire_version: u32,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub item_rows: Vec<usize>,
    #[serde(default)]
    pub passage_ids: Vec<String>,
    #[serde(default)]
    pub passage_rows: Vec<usize>,
    #[serde(default)]
    pub passage_order: Option<Vec<usize>>,
    #[serde(default)]
    pub objective: f64,
    #[serde(default)]
    pub status_code: Option<i32>,
    /// Activity per constraint row.
    #[serde(default)]
    pub constraint_activities: BTreeMap<usize, f64>,
}

impl Default for RawSolverResult {
    fn default() -> Self {
        Self {
            wire_version: WIRE_VERSION,
            item_ids: Vec::new(),
            item_rows: Vec::new(),
            passage_ids: Vec::new(),
            passage_rows: Vec::new(),
            passage_order: None,
            objective: 0.0,
            status_code: None,
            constraint_activities: BTreeMap::new(),
        }
    }
}

impl RawSolverResult {
    /// An empty result carrying only a status code.
    pub fn with_status(code: i32) -> Self {
        Self {
            status_code: Some(code),
            ..Self::default()
        }
    }

    /// Decodes into a typed outcome.
    ///
    /// # Errors
    ///
    /// - [`SolveError::WireVersion`] if the layout version differs.
    /// - [`SolveError::Decode`] for an unknown status code or id and row
    ///   sequences of different lengths.
    pub fn decode(self) -> Result<SolverOutcome, SolveError> {
        if self.wire_version != WIRE_VERSION {
            return Err(SolveError::WireVersion {
                expected: WIRE_VERSION,
                found: self.wire_version,
            });
        }

        let mut builder = SolverOutcome::builder()
            .item_ids(self.item_ids)
            .item_rows(self.item_rows)
            .passage_ids(self.passage_ids)
            .passage_rows(self.passage_rows)
            .objective(self.objective)
            .constraint_activities(self.constraint_activities);
        if let Some(order) = self.passage_order {
            builder = builder.passage_order(order);
        }
        if let Some(code) = self.status_code {
            builder = builder.status_code(code)?;
        }
        Ok(builder.build()?)
    }

    pub fn to_json(&self) -> Result<String, SolveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, SolveError> {
        Ok(serde_json::from_str(s)?)
    }
}
