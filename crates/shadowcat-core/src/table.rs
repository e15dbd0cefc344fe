//! In-memory content tables.
//!
//! A [`Table`] is a header plus rows of raw text cells, the shape every pool
//! and constraint definition arrives in. Reading tables from disk is left to
//! the caller.

use crate::error::{Result, ShadowCatError};

/// Header plus rows of text cells, all rows as wide as the header.
///
/// # Example
///
/// ```
/// use shadowcat_core::Table;
///
/// let table = Table::new(
///     vec!["Item ID".into(), "A-Param".into()],
///     vec![vec!["I1".into(), "1.2".into()]],
/// ).unwrap();
///
/// assert_eq!(table.column_index("A-Param").unwrap(), 1);
/// assert!(table.column_index("B-Param").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table, rejecting any row whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ShadowCatError::invalid(format!(
                "row {index} has {} cells but the header has {} columns",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Convenience constructor from string slices, mostly for fixtures.
    pub fn from_strs(columns: &[&str], rows: &[&[&str]]) -> Result<Self> {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowCatError::ColumnNotFound`] when the header lacks `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        column_position(&self.columns, name)
    }
}

/// Looks up a column by exact name.
pub(crate) fn column_position<S: AsRef<str>>(columns: &[S], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c.as_ref() == name)
        .ok_or_else(|| ShadowCatError::column_not_found(name))
}

/// Parses a floating point cell, trimming surrounding whitespace.
pub(crate) fn parse_number(column: &str, text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ShadowCatError::numeric_field(column, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Table::from_strs(&["A", "B"], &[&["1", "2"], &["3"]]).unwrap_err();
        assert!(matches!(err, ShadowCatError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_column_index_missing() {
        let table = Table::from_strs(&["A"], &[]).unwrap();
        assert_eq!(
            table.column_index("Z"),
            Err(ShadowCatError::ColumnNotFound {
                column: "Z".to_string()
            })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("X", " 2.5 ").unwrap(), 2.5);
        assert!(matches!(
            parse_number("X", "two"),
            Err(ShadowCatError::NumericField { .. })
        ));
    }
}
