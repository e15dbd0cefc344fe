//! Test assembly configuration for shadowcat.
//!
//! A [`TestAssemblyConfig`] gathers everything the optimizer needs about one
//! test design: the item pool and its column semantics, the optional passage
//! pool and constraint table, length and grouping bounds, and the penalty
//! weights used when soft constraints must be relaxed. It is built once by a
//! single validating factory and is immutable afterwards.
//!
//! Optional settings live in [`AssemblyOptions`], which can also be loaded
//! from TOML or YAML so test designs can be tuned without code changes.
//!
//! # Examples
//!
//! Defaults apply to everything not set explicitly:
//!
//! ```
//! use shadowcat_config::{AssemblyOptions, TestAssemblyConfig};
//! use shadowcat_core::Table;
//!
//! let pool = Table::from_strs(
//!     &["Item ID", "Passage ID", "A-Param"],
//!     &[&["I1", "", "1.0"], &["I2", "", "0.8"]],
//! ).unwrap();
//!
//! let config = TestAssemblyConfig::new(
//!     20,
//!     vec![false, false, true],
//!     pool,
//!     AssemblyOptions::default(),
//! ).unwrap();
//!
//! assert_eq!(config.num_passage_ub(), 100);
//! assert!(config.enable_enemy_item_constraint());
//! ```
//!
//! Options from TOML:
//!
//! ```
//! use shadowcat_config::AssemblyOptions;
//!
//! let options = AssemblyOptions::from_toml_str(r#"
//!     id = "grade7-math"
//!     length_priority = 25.0
//!     enable_enemy_item_constraint = false
//! "#).unwrap();
//!
//! assert_eq!(options.id, "grade7-math");
//! assert_eq!(options.num_item_per_passage_ub, 100);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use shadowcat_core::{
    parse_constraint_table, Constraint, ConstraintLevel, Item, ItemPoolColumns, Passage,
    ShadowCatError, Table,
};


/// Default lower bound on the number of passages.
pub const DEFAULT_NUM_PASSAGE_LB: usize = 0;
/// Default upper bound on the number of passages.
pub const DEFAULT_NUM_PASSAGE_UB: usize = 100;
/// Default lower bound on items per passage.
pub const DEFAULT_NUM_ITEM_PER_PASSAGE_LB: usize = 0;
/// Default upper bound on items per passage.
pub const DEFAULT_NUM_ITEM_PER_PASSAGE_UB: usize = 100;
/// Default position of the item identifier in the item pool.
pub const DEFAULT_ITEM_ID_COLUMN_INDEX: usize = 0;
/// Default position of the passage identifier in the item pool.
pub const DEFAULT_PASSAGE_ID_COLUMN_INDEX_IN_ITEM_POOL: usize = 1;
/// Default position of the passage identifier in the passage pool.
pub const DEFAULT_PASSAGE_ID_COLUMN_INDEX_IN_PASSAGE_POOL: usize = 0;
/// Default penalty weight of the test length constraint.
pub const DEFAULT_LENGTH_PRIORITY: f64 = 10.0;
/// Default penalty weight of the eligibility constraint.
pub const DEFAULT_ELIGIBILITY_PRIORITY: f64 = 0.0;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Model(#[from] ShadowCatError),
}

/// A passage pool table together with its numeric column mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassagePool {
    pub table: Table,
    pub numeric_mask: Vec<bool>,
}

impl PassagePool {
    pub fn new(table: Table, numeric_mask: Vec<bool>) -> Self {
        Self {
            table,
            numeric_mask,
        }
    }
}

/// Optional settings of a test assembly configuration.
///
/// Every field has a documented default. The tables are set
/// programmatically and are never read from configuration files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AssemblyOptions {
    /// Identifier of the test design.
    pub id: String,

    /// Lower bound on the number of passages in a test.
    pub num_passage_lb: usize,

    /// Upper bound on the number of passages in a test.
    pub num_passage_ub: usize,

    /// Lower bound on items selected from one passage.
    pub num_item_per_passage_lb: usize,

    /// Upper bound on items selected from one passage.
    pub num_item_per_passage_ub: usize,

    /// Position of the item identifier column in the item pool.
    pub item_id_column_index: usize,

    /// Position of the passage identifier column in the item pool.
    pub passage_id_column_index_in_item_pool: usize,

    /// Position of the passage identifier column in the passage pool.
    pub passage_id_column_index_in_passage_pool: usize,

    /// Penalty weight applied when the length constraint is relaxed.
    pub length_priority: f64,

    /// Penalty weight applied when soft eligibility is relaxed.
    pub eligibility_priority: f64,

    /// Whether mutually exclusive items may not be selected together.
    pub enable_enemy_item_constraint: bool,

    #[serde(skip)]
    pub passage_pool: Option<PassagePool>,

    #[serde(skip)]
    pub constraint_table: Option<Table>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            id: String::new(),
            num_passage_lb: DEFAULT_NUM_PASSAGE_LB,
            num_passage_ub: DEFAULT_NUM_PASSAGE_UB,
            num_item_per_passage_lb: DEFAULT_NUM_ITEM_PER_PASSAGE_LB,
            num_item_per_passage_ub: DEFAULT_NUM_ITEM_PER_PASSAGE_UB,
            item_id_column_index: DEFAULT_ITEM_ID_COLUMN_INDEX,
            passage_id_column_index_in_item_pool: DEFAULT_PASSAGE_ID_COLUMN_INDEX_IN_ITEM_POOL,
            passage_id_column_index_in_passage_pool:
                DEFAULT_PASSAGE_ID_COLUMN_INDEX_IN_PASSAGE_POOL,
            length_priority: DEFAULT_LENGTH_PRIORITY,
            eligibility_priority: DEFAULT_ELIGIBILITY_PRIORITY,
            enable_enemy_item_constraint: true,
            passage_pool: None,
            constraint_table: None,
        }
    }
}

impl AssemblyOptions {
    /// Creates options with every default applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads options from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses options from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads options from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses options from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the bounds on the number of passages.
    pub fn with_passage_bounds(mut self, lb: usize, ub: usize) -> Self {
        self.num_passage_lb = lb;
        self.num_passage_ub = ub;
        self
    }

    /// Sets the bounds on items selected from one passage.
    pub fn with_items_per_passage(mut self, lb: usize, ub: usize) -> Self {
        self.num_item_per_passage_lb = lb;
        self.num_item_per_passage_ub = ub;
        self
    }

    pub fn with_item_id_column(mut self, index: usize) -> Self {
        self.item_id_column_index = index;
        self
    }

    /// Sets where the passage identifier sits in the item and passage pools.
    pub fn with_passage_id_columns(mut self, in_item_pool: usize, in_passage_pool: usize) -> Self {
        self.passage_id_column_index_in_item_pool = in_item_pool;
        self.passage_id_column_index_in_passage_pool = in_passage_pool;
        self
    }

    /// Locates the identifier columns by their well-known header names.
    ///
    /// The item id column is found as `Item ID` in `item_pool`. When a passage
    /// pool is already set, `Passage ID` is looked up in both tables;
    /// otherwise the passage columns keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::ColumnNotFound`] if a header lacks a name.
    pub fn with_well_known_columns(mut self, item_pool: &Table) -> Result<Self, ShadowCatError> {
        self.item_id_column_index = item_pool.column_index(ItemPoolColumns::ITEM_ID)?;
        if let Some(pool) = &self.passage_pool {
            self.passage_id_column_index_in_passage_pool =
                pool.table.column_index(ItemPoolColumns::PASSAGE_ID)?;
            self.passage_id_column_index_in_item_pool =
                item_pool.column_index(ItemPoolColumns::PASSAGE_ID)?;
        }
        Ok(self)
    }

    pub fn with_length_priority(mut self, priority: f64) -> Self {
        self.length_priority = priority;
        self
    }

    pub fn with_eligibility_priority(mut self, priority: f64) -> Self {
        self.eligibility_priority = priority;
        self
    }

    pub fn with_enemy_item_constraint(mut self, enabled: bool) -> Self {
        self.enable_enemy_item_constraint = enabled;
        self
    }

    pub fn with_passage_pool(mut self, pool: PassagePool) -> Self {
        self.passage_pool = Some(pool);
        self
    }

    pub fn with_constraint_table(mut self, table: Table) -> Self {
        self.constraint_table = Some(table);
        self
    }

    fn has_passage_settings(&self) -> bool {
        self.num_passage_lb != DEFAULT_NUM_PASSAGE_LB
            || self.num_passage_ub != DEFAULT_NUM_PASSAGE_UB
            || self.num_item_per_passage_lb != DEFAULT_NUM_ITEM_PER_PASSAGE_LB
            || self.num_item_per_passage_ub != DEFAULT_NUM_ITEM_PER_PASSAGE_UB
            || self.passage_id_column_index_in_item_pool
                != DEFAULT_PASSAGE_ID_COLUMN_INDEX_IN_ITEM_POOL
            || self.passage_id_column_index_in_passage_pool
                != DEFAULT_PASSAGE_ID_COLUMN_INDEX_IN_PASSAGE_POOL
    }
}

/// Validated, immutable configuration of one test design.
#[derive(Debug, Clone)]
pub struct TestAssemblyConfig {
    test_length: usize,
    item_pool: Table,
    item_pool_numeric_mask: Vec<bool>,
    options: AssemblyOptions,
    items: Vec<Item>,
    passages: Vec<Passage>,
    item_passage_rows: Vec<Option<usize>>,
    constraints: Vec<Constraint>,
}

impl TestAssemblyConfig {
    /// Builds and validates a configuration.
    ///
    /// Items, passages and constraints are materialized here, so a malformed
    /// row fails construction rather than the first solve.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::InvalidConfiguration`] when
    /// - the test length is zero
    /// - a mask does not match its table's header
    /// - a column index is outside its table
    /// - a lower bound exceeds its upper bound
    /// - passage bounds or columns are set without a passage pool
    /// - an item id repeats or an item names an unknown passage
    /// - a passage-level constraint is given without a passage pool
    ///
    /// and propagates entity and constraint parse errors.
    pub fn new(
        test_length: usize,
        item_pool_numeric_mask: Vec<bool>,
        item_pool: Table,
        options: AssemblyOptions,
    ) -> Result<Self, ShadowCatError> {
        if test_length == 0 {
            return Err(invalid("test length must be at least 1"));
        }
        check_mask("item pool", &item_pool, &item_pool_numeric_mask)?;
        check_column("item id", &item_pool, options.item_id_column_index)?;
        check_bounds(
            "number of passages",
            options.num_passage_lb,
            options.num_passage_ub,
        )?;
        check_bounds(
            "items per passage",
            options.num_item_per_passage_lb,
            options.num_item_per_passage_ub,
        )?;

        let passages = match &options.passage_pool {
            Some(pool) => {
                check_mask("passage pool", &pool.table, &pool.numeric_mask)?;
                check_column(
                    "passage id",
                    &pool.table,
                    options.passage_id_column_index_in_passage_pool,
                )?;
                check_column(
                    "passage id",
                    &item_pool,
                    options.passage_id_column_index_in_item_pool,
                )?;
                (0..pool.table.len())
                    .map(|row| {
                        Passage::from_row(
                            &pool.table,
                            row,
                            &pool.numeric_mask,
                            options.passage_id_column_index_in_passage_pool,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            None if options.has_passage_settings() => {
                return Err(invalid(
                    "passage bounds or passage id columns are set but no passage pool is supplied",
                ));
            }
            None => Vec::new(),
        };

        let passage_column = options
            .passage_pool
            .as_ref()
            .map(|_| options.passage_id_column_index_in_item_pool);
        let items = (0..item_pool.len())
            .map(|row| {
                Item::from_row(
                    &item_pool,
                    row,
                    &item_pool_numeric_mask,
                    options.item_id_column_index,
                    passage_column,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        check_unique("item", items.iter().map(|i| i.id()))?;
        check_unique("passage", passages.iter().map(|p| p.id()))?;

        let passage_rows: HashMap<&str, usize> = passages
            .iter()
            .map(|p| (p.id(), p.row_index()))
            .collect();
        let item_passage_rows = items
            .iter()
            .map(|item| match item.passage_id() {
                Some(pid) => passage_rows.get(pid).copied().map(Some).ok_or_else(|| {
                    invalid(format!(
                        "item {} refers to unknown passage {pid}",
                        item.id()
                    ))
                }),
                None => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let constraints = match &options.constraint_table {
            Some(table) => parse_constraint_table(table)?,
            None => Vec::new(),
        };
        if options.passage_pool.is_none() {
            if let Some(c) = constraints
                .iter()
                .find(|c| c.level() == ConstraintLevel::Passage)
            {
                return Err(invalid(format!(
                    "constraint {} is passage level but no passage pool is supplied",
                    c.id()
                )));
            }
        }

        info!(
            event = "config_built",
            id = %options.id,
            test_length,
            item_count = items.len(),
            passage_count = passages.len(),
            constraint_count = constraints.len(),
        );

        Ok(Self {
            test_length,
            item_pool,
            item_pool_numeric_mask,
            options,
            items,
            passages,
            item_passage_rows,
            constraints,
        })
    }

    pub fn id(&self) -> &str {
        &self.options.id
    }

    pub fn test_length(&self) -> usize {
        self.test_length
    }

    pub fn item_pool(&self) -> &Table {
        &self.item_pool
    }

    pub fn item_pool_numeric_mask(&self) -> &[bool] {
        &self.item_pool_numeric_mask
    }

    pub fn passage_pool(&self) -> Option<&PassagePool> {
        self.options.passage_pool.as_ref()
    }

    pub fn constraint_table(&self) -> Option<&Table> {
        self.options.constraint_table.as_ref()
    }

    pub fn has_passages(&self) -> bool {
        self.options.passage_pool.is_some()
    }

    pub fn num_passage_lb(&self) -> usize {
        self.options.num_passage_lb
    }

    pub fn num_passage_ub(&self) -> usize {
        self.options.num_passage_ub
    }

    pub fn num_item_per_passage_lb(&self) -> usize {
        self.options.num_item_per_passage_lb
    }

    pub fn num_item_per_passage_ub(&self) -> usize {
        self.options.num_item_per_passage_ub
    }

    pub fn item_id_column_index(&self) -> usize {
        self.options.item_id_column_index
    }

    pub fn passage_id_column_index_in_item_pool(&self) -> usize {
        self.options.passage_id_column_index_in_item_pool
    }

    pub fn passage_id_column_index_in_passage_pool(&self) -> usize {
        self.options.passage_id_column_index_in_passage_pool
    }

    pub fn length_priority(&self) -> f64 {
        self.options.length_priority
    }

    pub fn eligibility_priority(&self) -> f64 {
        self.options.eligibility_priority
    }

    pub fn enable_enemy_item_constraint(&self) -> bool {
        self.options.enable_enemy_item_constraint
    }

    /// Items in pool row order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Passages in pool row order; empty without a passage pool.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Row of the passage an item belongs to, by item row.
    pub fn passage_row_of_item(&self, item_row: usize) -> Option<usize> {
        self.item_passage_rows.get(item_row).copied().flatten()
    }

    /// Loaded constraints in table row order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

fn invalid(message: impl Into<String>) -> ShadowCatError {
    ShadowCatError::InvalidConfiguration(message.into())
}

fn check_mask(what: &str, table: &Table, mask: &[bool]) -> Result<(), ShadowCatError> {
    if mask.len() != table.columns().len() {
        return Err(invalid(format!(
            "{what} mask has {} entries but the table has {} columns",
            mask.len(),
            table.columns().len()
        )));
    }
    Ok(())
}

fn check_column(what: &str, table: &Table, index: usize) -> Result<(), ShadowCatError> {
    if index >= table.columns().len() {
        return Err(invalid(format!(
            "{what} column index {index} is outside a {}-column table",
            table.columns().len()
        )));
    }
    Ok(())
}

fn check_bounds(what: &str, lb: usize, ub: usize) -> Result<(), ShadowCatError> {
    if lb > ub {
        return Err(invalid(format!(
            "{what}: lower bound {lb} exceeds upper bound {ub}"
        )));
    }
    Ok(())
}

fn check_unique<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ShadowCatError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(invalid(format!("duplicate {what} id {id}")));
        }
    }
    Ok(())
}
