//! Item and passage pool fixtures.
//!
//! Eight items: six grouped into three passages, two discrete.
//!
//! | row | item | passage | strand   | format | words |
//! |-----|------|---------|----------|--------|-------|
//! | 0   | I1   | P1      | Algebra  | MC     | 120   |
//! | 1   | I2   | P1      | Algebra  | TF     | 80    |
//! | 2   | I3   | P2      | Geometry | MC     | 150   |
//! | 3   | I4   | P2      | Geometry | MC     | 90    |
//! | 4   | I5   | P3      | Algebra  | CR     | 200   |
//! | 5   | I6   | P3      | Number   | MC     | 60    |
//! | 6   | I7   |         | Number   | TF     | 40    |
//! | 7   | I8   |         | Geometry | CR     | 110   |

use shadowcat_core::Table;

/// Item pool with the well-known columns plus Strand, Format and Words.
pub fn item_pool() -> Table {
    Table::from_strs(
        &[
            "Item ID",
            "Passage ID",
            "A-Param",
            "B-Param",
            "C-Param",
            "A-Param-SE",
            "B-Param-SE",
            "C-Param-SE",
            "D-Constant",
            "Strand",
            "Format",
            "Words",
        ],
        &[
            &["I1", "P1", "1.10", "-1.20", "0.20", "0.05", "0.08", "0.01", "1.7", "Algebra", "MC", "120"],
            &["I2", "P1", "0.85", "-0.40", "0.15", "0.04", "0.07", "0.01", "1.7", "Algebra", "TF", "80"],
            &["I3", "P2", "1.35", "0.10", "0.22", "0.06", "0.09", "0.02", "1.7", "Geometry", "MC", "150"],
            &["I4", "P2", "0.95", "0.55", "0.18", "0.05", "0.08", "0.01", "1.7", "Geometry", "MC", "90"],
            &["I5", "P3", "1.60", "1.05", "0.00", "0.07", "0.10", "0.00", "1.7", "Algebra", "CR", "200"],
            &["I6", "P3", "0.70", "-0.85", "0.25", "0.04", "0.06", "0.02", "1.7", "Number", "MC", "60"],
            &["I7", "", "1.20", "0.30", "0.19", "0.05", "0.07", "0.01", "1.7", "Number", "TF", "40"],
            &["I8", "", "1.05", "1.40", "0.21", "0.06", "0.09", "0.02", "1.7", "Geometry", "CR", "110"],
        ],
    )
    .expect("item pool fixture is well formed")
}

/// Numeric mask aligned with [`item_pool`] columns.
pub fn item_pool_mask() -> Vec<bool> {
    vec![
        false, false, true, true, true, true, true, true, true, false, false, true,
    ]
}

/// Passage pool for passages P1, P2 and P3.
pub fn passage_pool() -> Table {
    Table::from_strs(
        &["Passage ID", "Genre", "Words"],
        &[
            &["P1", "Fiction", "450"],
            &["P2", "Science", "520"],
            &["P3", "Fiction", "380"],
        ],
    )
    .expect("passage pool fixture is well formed")
}

/// Numeric mask aligned with [`passage_pool`] columns.
pub fn passage_pool_mask() -> Vec<bool> {
    vec![false, false, true]
}
