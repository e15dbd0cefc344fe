//! Tabular entity model.
//!
//! Every row of an item or passage pool is split into named numeric and named
//! categorical attributes, driven by a column-type mask aligned positionally
//! with the header. [`Item`] and [`Passage`] wrap the resulting
//! [`TabularEntity`] with the identifiers the solver boundary needs.

use std::ops::Deref;

use tracing::trace;

use crate::error::{Result, ShadowCatError};
use crate::table::{parse_number, Table};

/// Well-known item pool column names.
pub struct ItemPoolColumns;

impl ItemPoolColumns {
    pub const ITEM_ID: &'static str = "Item ID";
    pub const PASSAGE_ID: &'static str = "Passage ID";
    pub const A_PARAM: &'static str = "A-Param";
    pub const B_PARAM: &'static str = "B-Param";
    pub const C_PARAM: &'static str = "C-Param";
    pub const A_PARAM_SE: &'static str = "A-Param-SE";
    pub const B_PARAM_SE: &'static str = "B-Param-SE";
    pub const C_PARAM_SE: &'static str = "C-Param-SE";
    pub const D_CONSTANT: &'static str = "D-Constant";

    /// All well-known names in canonical order.
    pub const ALL: [&'static str; 9] = [
        Self::ITEM_ID,
        Self::PASSAGE_ID,
        Self::A_PARAM,
        Self::B_PARAM,
        Self::C_PARAM,
        Self::A_PARAM_SE,
        Self::B_PARAM_SE,
        Self::C_PARAM_SE,
        Self::D_CONSTANT,
    ];
}

/// One row of a content table, partitioned into numeric and categorical
/// attributes.
///
/// The numeric and categorical name lists together cover every column of the
/// source header exactly once, each in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularEntity {
    id: String,
    row_index: usize,
    numeric_names: Vec<String>,
    numeric_values: Vec<f64>,
    categorical_names: Vec<String>,
    categorical_values: Vec<String>,
}

impl TabularEntity {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position of the source row in its table.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn numeric_names(&self) -> &[String] {
        &self.numeric_names
    }

    pub fn numeric_values(&self) -> &[f64] {
        &self.numeric_values
    }

    pub fn categorical_names(&self) -> &[String] {
        &self.categorical_names
    }

    pub fn categorical_values(&self) -> &[String] {
        &self.categorical_values
    }

    /// Value of a numeric attribute, if the entity has one by that name.
    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.numeric_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.numeric_values[i])
    }

    /// Value of a categorical attribute, if the entity has one by that name.
    pub fn categorical(&self, name: &str) -> Option<&str> {
        self.categorical_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.categorical_values[i].as_str())
    }

    /// Iterates over `(name, value)` numeric pairs in source order.
    pub fn numeric_attributes(&self) -> impl Iterator<Item = (&str, f64)> {
        self.numeric_names
            .iter()
            .map(String::as_str)
            .zip(self.numeric_values.iter().copied())
    }

    /// Iterates over `(name, value)` categorical pairs in source order.
    pub fn categorical_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categorical_names
            .iter()
            .map(String::as_str)
            .zip(self.categorical_values.iter().map(String::as_str))
    }
}

/// Splits one row into numeric and categorical attributes.
///
/// `row_values`, `column_names` and `is_numeric_mask` must be the same length.
/// Cells whose mask bit is set are parsed as `f64`; the rest are kept as text.
/// The identifier and every text cell are trimmed, matching how filter set
/// elements and passage references are read.
///
/// # Errors
///
/// - [`ShadowCatError::InvalidConfiguration`] if the three slices differ in length.
/// - [`ShadowCatError::NumericField`] if a numeric cell is malformed.
///
/// # Example
///
/// ```
/// use shadowcat_core::parse_entity;
///
/// let entity = parse_entity(
///     "I1",
///     &["I1", "0.8", "MC"],
///     &["Item ID", "A-Param", "Format"],
///     &[false, true, false],
///     3,
/// ).unwrap();
///
/// assert_eq!(entity.numeric("A-Param"), Some(0.8));
/// assert_eq!(entity.categorical("Format"), Some("MC"));
/// assert_eq!(entity.categorical_names(), &["Item ID", "Format"]);
/// ```
pub fn parse_entity<V: AsRef<str>, C: AsRef<str>>(
    identifier: impl Into<String>,
    row_values: &[V],
    column_names: &[C],
    is_numeric_mask: &[bool],
    row_index: usize,
) -> Result<TabularEntity> {
    if row_values.len() != column_names.len() || column_names.len() != is_numeric_mask.len() {
        return Err(ShadowCatError::invalid(format!(
            "row {row_index}: {} values, {} column names, {} mask entries",
            row_values.len(),
            column_names.len(),
            is_numeric_mask.len()
        )));
    }

    let mut entity = TabularEntity {
        id: identifier.into().trim().to_string(),
        row_index,
        numeric_names: Vec::new(),
        numeric_values: Vec::new(),
        categorical_names: Vec::new(),
        categorical_values: Vec::new(),
    };

    for ((value, name), &numeric) in row_values.iter().zip(column_names).zip(is_numeric_mask) {
        let (value, name) = (value.as_ref(), name.as_ref());
        if numeric {
            entity.numeric_values.push(parse_number(name, value)?);
            entity.numeric_names.push(name.to_string());
        } else {
            entity.categorical_values.push(value.trim().to_string());
            entity.categorical_names.push(name.to_string());
        }
    }

    trace!(
        event = "entity_parsed",
        id = %entity.id,
        row = row_index,
        numeric = entity.numeric_names.len(),
        categorical = entity.categorical_names.len(),
    );
    Ok(entity)
}

fn row_of(table: &Table, row_index: usize) -> Result<&[String]> {
    table
        .row(row_index)
        .ok_or_else(|| ShadowCatError::invalid(format!("row {row_index} is out of range")))
}

fn cell(row: &[String], column: usize) -> Result<&str> {
    row.get(column).map(String::as_str).ok_or_else(|| {
        ShadowCatError::invalid(format!(
            "column index {column} is out of range for a {}-column table",
            row.len()
        ))
    })
}

fn parse_row(
    table: &Table,
    row_index: usize,
    mask: &[bool],
    id_column: usize,
) -> Result<TabularEntity> {
    let row = row_of(table, row_index)?;
    parse_entity(cell(row, id_column)?, row, table.columns(), mask, row_index)
}

/// An item of the item pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    entity: TabularEntity,
    passage_id: Option<String>,
}

impl Item {
    /// Builds the item at `row_index` of an item pool.
    ///
    /// `passage_id_column` is `None` for discrete-item pools. A blank passage
    /// cell means the item stands alone.
    pub fn from_row(
        table: &Table,
        row_index: usize,
        mask: &[bool],
        item_id_column: usize,
        passage_id_column: Option<usize>,
    ) -> Result<Self> {
        let entity = parse_row(table, row_index, mask, item_id_column)?;
        let passage_id = match passage_id_column {
            Some(column) => {
                let text = cell(row_of(table, row_index)?, column)?.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            None => None,
        };
        Ok(Self { entity, passage_id })
    }

    /// Identifier of the passage this item belongs to.
    pub fn passage_id(&self) -> Option<&str> {
        self.passage_id.as_deref()
    }

    pub fn entity(&self) -> &TabularEntity {
        &self.entity
    }
}

impl Deref for Item {
    type Target = TabularEntity;

    fn deref(&self) -> &TabularEntity {
        &self.entity
    }
}

/// A passage of the passage pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    entity: TabularEntity,
}

impl Passage {
    /// Builds the passage at `row_index` of a passage pool.
    pub fn from_row(
        table: &Table,
        row_index: usize,
        mask: &[bool],
        id_column: usize,
    ) -> Result<Self> {
        Ok(Self {
            entity: parse_row(table, row_index, mask, id_column)?,
        })
    }

    pub fn entity(&self) -> &TabularEntity {
        &self.entity
    }
}

impl Deref for Passage {
    type Target = TabularEntity;

    fn deref(&self) -> &TabularEntity {
        &self.entity
    }
}
