//! Constraint table fixtures.

use shadowcat_core::Table;

/// Four constraints over the fixture pools.
///
/// - `C1`: between 2 and 4 Algebra items
/// - `C2`: at most 3 multiple-choice items whose B-Param lies in [-1, 1]
/// - `C3`: at least one Fiction passage
/// - `C4`: present in the table but not loaded
pub fn constraint_table() -> Table {
    Table::from_strs(
        &[
            "Id",
            "Description",
            "Type",
            "Level",
            "CalAttr",
            "CalLB",
            "CalUB",
            "FilterAttr",
            "FilterLogic",
            "FilterData",
            "IsLoaded",
        ],
        &[
            &["C1", "Algebra items", "Content", "Item", "", "2", "4", "Strand", "Set", "Algebra", "true"],
            &[
                "C2",
                "Mid-difficulty multiple choice",
                "Format",
                "Item",
                "",
                "Null",
                "3",
                "B-Param|Format",
                "Bounds|Set",
                "-1|1#MC",
                "true",
            ],
            &["C3", "Fiction passages", "Genre", "Passage", "", "1", "Null", "Genre", "Set", "Fiction", "true"],
            &["C4", "Retired word count rule", "Length", "Item", "Words", "300", "900", "", "", "", "false"],
        ],
    )
    .expect("constraint table fixture is well formed")
}
