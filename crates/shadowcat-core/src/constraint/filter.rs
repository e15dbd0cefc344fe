//! Filter predicate grammar.
//!
//! Three cells describe a constraint's filter:
//!
//! - `FilterAttr`: attribute names separated by `|`
//! - `FilterLogic`: one logic token per attribute, separated by `|`
//! - `FilterData`: one dataset per attribute separated by `#`, elements
//!   within a dataset separated by `|`
//!
//! `Bounds` datasets hold exactly two numbers, `Set` datasets hold category
//! values. The three lists are consumed pairwise by position and must agree in
//! length.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::entity::TabularEntity;
use crate::error::{Result, ShadowCatError};
use crate::table::parse_number;

/// Separator between attributes, logics and dataset elements.
pub const LIST_SEPARATOR: char = '|';

/// Separator between per-attribute datasets.
pub const DATASET_SEPARATOR: char = '#';

/// Logic token selecting a closed numeric interval.
pub const BOUNDS_LOGIC: &str = "Bounds";

/// Logic token selecting categorical set membership.
pub const SET_LOGIC: &str = "Set";

/// Kind of predicate applied to one filter attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterLogic {
    /// Numeric attribute within `[lower, upper]`.
    Bounds,
    /// Categorical attribute within a fixed set.
    Set,
}

impl FilterLogic {
    /// Decodes a logic token.
    ///
    /// `Bounds` is accepted in any letter case, `Set` only verbatim.
    pub fn parse(attribute: &str, token: &str) -> Result<Self> {
        if token.eq_ignore_ascii_case(BOUNDS_LOGIC) {
            Ok(Self::Bounds)
        } else if token == SET_LOGIC {
            Ok(Self::Set)
        } else {
            Err(ShadowCatError::UnknownFilterLogic {
                attribute: attribute.to_string(),
                logic: token.to_string(),
            })
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Bounds => BOUNDS_LOGIC,
            Self::Set => SET_LOGIC,
        }
    }
}

/// The three grammar cells of a filter, as they appear in a constraint row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedFilter {
    pub attributes: String,
    pub logics: String,
    pub data: String,
}

/// Parsed filter predicates of one constraint.
///
/// An attribute is either bounds-filtered or set-filtered, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    bounds: BTreeMap<String, [f64; 2]>,
    sets: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSpec {
    /// Creates an empty filter that every entity passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bounds predicate.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::InvalidConfiguration`] if `attribute` is
    /// already filtered or `lower` exceeds `upper`.
    pub fn with_bounds(
        mut self,
        attribute: impl Into<String>,
        lower: f64,
        upper: f64,
    ) -> Result<Self> {
        let attribute = attribute.into();
        self.ensure_unfiltered(&attribute)?;
        if !(lower <= upper) {
            return Err(ShadowCatError::invalid(format!(
                "filter bounds on {attribute}: lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        self.bounds.insert(attribute, [lower, upper]);
        Ok(self)
    }

    /// Adds a set predicate. Values are trimmed, as entity text cells are.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::InvalidConfiguration`] if `attribute` is
    /// already filtered or a value is blank.
    pub fn with_set<I, S>(mut self, attribute: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attribute = attribute.into();
        self.ensure_unfiltered(&attribute)?;
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.into().trim().to_string())
            .collect();
        if values.iter().any(String::is_empty) {
            return Err(ShadowCatError::invalid(format!(
                "set filter on {attribute} has a blank element"
            )));
        }
        self.sets.insert(attribute, values);
        Ok(self)
    }

    fn ensure_unfiltered(&self, attribute: &str) -> Result<()> {
        if self.bounds.contains_key(attribute) || self.sets.contains_key(attribute) {
            return Err(ShadowCatError::invalid(format!(
                "filter attribute {attribute} is listed more than once"
            )));
        }
        Ok(())
    }

    /// Bounds predicates keyed by attribute name.
    pub fn bounds(&self) -> &BTreeMap<String, [f64; 2]> {
        &self.bounds
    }

    /// Set predicates keyed by attribute name.
    pub fn sets(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.sets
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty() && self.sets.is_empty()
    }

    /// Number of filtered attributes.
    pub fn len(&self) -> usize {
        self.bounds.len() + self.sets.len()
    }

    /// Whether an entity satisfies every predicate.
    ///
    /// A bounds attribute must be numeric on the entity and inside the closed
    /// interval; a set attribute must be categorical and a member of the set.
    /// Missing attributes fail the filter.
    pub fn matches(&self, entity: &TabularEntity) -> bool {
        self.bounds.iter().all(|(name, [lower, upper])| {
            entity
                .numeric(name)
                .is_some_and(|v| *lower <= v && v <= *upper)
        }) && self.sets.iter().all(|(name, allowed)| {
            entity
                .categorical(name)
                .is_some_and(|v| allowed.contains(v))
        })
    }

    /// Parses the three grammar cells.
    ///
    /// All three blank means no filter.
    ///
    /// # Errors
    ///
    /// - [`ShadowCatError::FilterArityMismatch`] if the lists differ in length.
    /// - [`ShadowCatError::UnknownFilterLogic`] for a token other than Bounds/Set.
    /// - [`ShadowCatError::NumericField`] if a Bounds dataset is not two numbers.
    /// - [`ShadowCatError::InvalidConfiguration`] if an attribute repeats, a
    ///   Bounds lower value exceeds its upper value, or a Set element is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use shadowcat_core::FilterSpec;
    ///
    /// let filter = FilterSpec::parse("Content|Format", "Bounds|Set", "0|10#MC|TF").unwrap();
    ///
    /// assert_eq!(filter.bounds()["Content"], [0.0, 10.0]);
    /// assert!(filter.sets()["Format"].contains("TF"));
    /// ```
    pub fn parse(attributes: &str, logics: &str, data: &str) -> Result<Self> {
        let attributes = split_list(attributes, LIST_SEPARATOR);
        let logics = split_list(logics, LIST_SEPARATOR);
        // With at least one attribute a blank cell is one empty dataset.
        let datasets: Vec<&str> = if attributes.is_empty() {
            split_list(data, DATASET_SEPARATOR)
        } else {
            data.split(DATASET_SEPARATOR).collect()
        };

        if attributes.len() != logics.len() || logics.len() != datasets.len() {
            return Err(ShadowCatError::FilterArityMismatch {
                attributes: attributes.len(),
                logics: logics.len(),
                datasets: datasets.len(),
            });
        }

        let mut filter = Self::new();
        for ((attribute, logic), dataset) in attributes.into_iter().zip(logics).zip(datasets) {
            let elements = split_list(dataset, LIST_SEPARATOR);
            filter = match FilterLogic::parse(attribute, logic)? {
                FilterLogic::Bounds => {
                    let [lower, upper] = match elements.as_slice() {
                        [lower, upper] => [
                            parse_number("FilterData", lower)?,
                            parse_number("FilterData", upper)?,
                        ],
                        _ => {
                            return Err(ShadowCatError::numeric_field("FilterData", dataset));
                        }
                    };
                    trace!(event = "filter_bounds", attribute, lower, upper);
                    filter.with_bounds(attribute, lower, upper)?
                }
                FilterLogic::Set => {
                    trace!(event = "filter_set", attribute, size = elements.len());
                    filter.with_set(attribute, elements)?
                }
            };
        }
        Ok(filter)
    }

    /// Renders the predicates back into the three grammar cells.
    ///
    /// Attributes are emitted in name order. Parsing the result yields an
    /// equal filter.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::InvalidConfiguration`] if a name or value is
    /// blank or contains a grammar separator.
    pub fn encode(&self) -> Result<EncodedFilter> {
        let mut entries: Vec<(&str, FilterLogic, String)> = Vec::with_capacity(self.len());
        for (name, [lower, upper]) in &self.bounds {
            entries.push((
                name.as_str(),
                FilterLogic::Bounds,
                format!("{lower}{LIST_SEPARATOR}{upper}"),
            ));
        }
        for (name, values) in &self.sets {
            for value in values {
                check_token(value)?;
            }
            let dataset = values
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(&LIST_SEPARATOR.to_string());
            entries.push((name.as_str(), FilterLogic::Set, dataset));
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut encoded = EncodedFilter::default();
        for (i, (name, logic, dataset)) in entries.into_iter().enumerate() {
            check_token(name)?;
            if i > 0 {
                encoded.attributes.push(LIST_SEPARATOR);
                encoded.logics.push(LIST_SEPARATOR);
                encoded.data.push(DATASET_SEPARATOR);
            }
            encoded.attributes.push_str(name);
            encoded.logics.push_str(logic.token());
            encoded.data.push_str(&dataset);
        }
        Ok(encoded)
    }
}

fn check_token(token: &str) -> Result<()> {
    if token.trim().is_empty()
        || token.trim() != token
        || token.contains(LIST_SEPARATOR)
        || token.contains(DATASET_SEPARATOR)
    {
        return Err(ShadowCatError::invalid(format!(
            "{token:?} cannot be written in the filter grammar"
        )));
    }
    Ok(())
}

/// Splits a delimited cell into trimmed tokens; a blank cell has none.
fn split_list(text: &str, separator: char) -> Vec<&str> {
    if text.trim().is_empty() {
        Vec::new()
    } else {
        text.split(separator).map(str::trim).collect()
    }
}
