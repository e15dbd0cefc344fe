//! Tests for constraint parsing and the filter grammar.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use super::*;
use crate::entity::parse_entity;

const COLUMNS: [&str; 11] = [
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
];

fn row<'a>(lb: &'a str, ub: &'a str, attr: &'a str, logic: &'a str, data: &'a str) -> [&'a str; 11] {
    [
        "C1",
        "Reading items",
        "Content",
        "Item",
        "Words",
        lb,
        ub,
        attr,
        logic,
        data,
        "true",
    ]
}

#[test]
fn test_null_bounds_map_to_surrogate() {
    let c = parse_constraint(&COLUMNS, &row("Null", "Null", "", "", ""), 0).unwrap();
    assert_eq!(c.cal_lb(), -1_000_000.0);
    assert_eq!(c.cal_ub(), 1_000_000.0);
    assert!(!c.is_lower_bounded());
    assert!(!c.is_upper_bounded());
    assert!(c.filter().is_empty());
}

#[test]
fn test_numeric_bounds() {
    let c = parse_constraint(&COLUMNS, &row(" 2 ", "4.5", "", "", ""), 7).unwrap();
    assert_eq!(c.cal_lb(), 2.0);
    assert_eq!(c.cal_ub(), 4.5);
    assert_eq!(c.row_index(), 7);
    assert_eq!(c.id(), "C1");
    assert_eq!(c.cal_attr(), "Words");
    assert_eq!(c.constraint_type(), "Content");
    assert_eq!(c.level(), ConstraintLevel::Item);
    assert!(c.is_loaded());
    assert_eq!(c.activity(), None);
}

#[test]
fn test_null_sentinel_is_case_sensitive() {
    let err = parse_constraint(&COLUMNS, &row("null", "3", "", "", ""), 0).unwrap_err();
    assert_eq!(
        err,
        ShadowCatError::NumericField {
            column: "CalLB".to_string(),
            value: "null".to_string()
        }
    );
}

#[test]
fn test_malformed_upper_bound() {
    let err = parse_constraint(&COLUMNS, &row("1", "many", "", "", ""), 0).unwrap_err();
    assert!(matches!(err, ShadowCatError::NumericField { ref column, .. } if column == "CalUB"));
}

#[test]
fn test_inverted_cal_bounds_rejected() {
    let err = parse_constraint(&COLUMNS, &row("5", "2", "", "", ""), 3).unwrap_err();
    assert!(matches!(err, ShadowCatError::InvalidConfiguration(ref m) if m.contains("CalLB 5")));

    let open_below = parse_constraint(&COLUMNS, &row("Null", "0", "", "", ""), 0).unwrap();
    assert_eq!(open_below.cal_lb(), -UNBOUNDED);
    let pinned = parse_constraint(&COLUMNS, &row("3", "3", "", "", ""), 0).unwrap();
    assert_eq!((pinned.cal_lb(), pinned.cal_ub()), (3.0, 3.0));
}

#[test]
fn test_missing_column_fails_fast() {
    let columns: Vec<&str> = COLUMNS.iter().copied().filter(|c| *c != "Level").collect();
    let values: Vec<&str> = row("1", "2", "", "", "")
        .iter()
        .copied()
        .filter(|v| *v != "Item")
        .collect();
    let err = parse_constraint(&columns, &values, 0).unwrap_err();
    assert_eq!(
        err,
        ShadowCatError::ColumnNotFound {
            column: "Level".to_string()
        }
    );
}

#[test]
fn test_missing_column_reported_before_bad_numbers() {
    let columns: Vec<&str> = COLUMNS.iter().copied().filter(|c| *c != "Id").collect();
    let values: Vec<&str> = row("oops", "2", "", "", "")[1..].to_vec();
    let err = parse_constraint(&columns, &values, 0).unwrap_err();
    assert!(matches!(err, ShadowCatError::ColumnNotFound { .. }));
}

#[test]
fn test_bounds_and_set_filters() {
    let c = parse_constraint(
        &COLUMNS,
        &row("1", "2", "Content|Format", "Bounds|Set", "0|10#MC|TF"),
        0,
    )
    .unwrap();

    let mut bounds = BTreeMap::new();
    bounds.insert("Content".to_string(), [0.0, 10.0]);
    let mut sets = BTreeMap::new();
    sets.insert(
        "Format".to_string(),
        ["MC", "TF"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
    );
    assert_eq!(c.filter().bounds(), &bounds);
    assert_eq!(c.filter().sets(), &sets);
}

#[test]
fn test_bounds_logic_ignores_case() {
    let filter = FilterSpec::parse("Words", "bOuNdS", "100|250").unwrap();
    assert_eq!(filter.bounds()["Words"], [100.0, 250.0]);
}

#[test]
fn test_set_logic_is_case_sensitive() {
    let err = FilterSpec::parse("Format", "set", "MC").unwrap_err();
    assert_eq!(
        err,
        ShadowCatError::UnknownFilterLogic {
            attribute: "Format".to_string(),
            logic: "set".to_string()
        }
    );
}

#[test]
fn test_unknown_logic_is_rejected() {
    let err = FilterSpec::parse("Format", "Range", "1|2").unwrap_err();
    assert!(matches!(err, ShadowCatError::UnknownFilterLogic { .. }));
}

#[test]
fn test_arity_mismatch_is_not_truncated() {
    let err = FilterSpec::parse("A|B", "Bounds", "1|2").unwrap_err();
    assert_eq!(
        err,
        ShadowCatError::FilterArityMismatch {
            attributes: 2,
            logics: 1,
            datasets: 1
        }
    );
}

#[test]
fn test_arity_mismatch_on_datasets() {
    let err = FilterSpec::parse("A|B", "Bounds|Set", "1|2").unwrap_err();
    assert!(matches!(
        err,
        ShadowCatError::FilterArityMismatch { datasets: 1, .. }
    ));

    let err = FilterSpec::parse("", "", "1|2").unwrap_err();
    assert!(matches!(
        err,
        ShadowCatError::FilterArityMismatch { attributes: 0, .. }
    ));
}

#[test]
fn test_bounds_dataset_needs_two_numbers() {
    let err = FilterSpec::parse("A", "Bounds", "1|2|3").unwrap_err();
    assert!(matches!(err, ShadowCatError::NumericField { ref value, .. } if value == "1|2|3"));

    let err = FilterSpec::parse("A", "Bounds", "1|x").unwrap_err();
    assert!(matches!(err, ShadowCatError::NumericField { ref value, .. } if value == "x"));
}

#[test]
fn test_inverted_filter_bounds_rejected() {
    let err = FilterSpec::parse("A", "Bounds", "3|1").unwrap_err();
    assert!(matches!(err, ShadowCatError::InvalidConfiguration(ref m) if m.contains("on A")));

    let err = FilterSpec::new().with_bounds("A", f64::NAN, 1.0).unwrap_err();
    assert!(matches!(err, ShadowCatError::InvalidConfiguration(_)));

    let point = FilterSpec::parse("A", "Bounds", "2|2").unwrap();
    assert_eq!(point.bounds()["A"], [2.0, 2.0]);
}

#[test]
fn test_blank_set_elements_rejected() {
    for data in ["MC||TF", "MC|", "|MC", "MC| |TF"] {
        let err = FilterSpec::parse("Format", "Set", data).unwrap_err();
        assert!(
            matches!(err, ShadowCatError::InvalidConfiguration(ref m) if m.contains("blank")),
            "{data:?} should be rejected"
        );
    }

    let err = FilterSpec::new().with_set("Format", ["MC", ""]).unwrap_err();
    assert!(matches!(err, ShadowCatError::InvalidConfiguration(_)));

    let padded = FilterSpec::new().with_set("Format", [" MC"]).unwrap();
    assert!(padded.sets()["Format"].contains("MC"));
}

#[test]
fn test_parsed_set_reencodes() {
    let filter = FilterSpec::parse("Format", "Set", " MC | TF ").unwrap();
    let encoded = filter.encode().unwrap();
    assert_eq!(encoded.data, "MC|TF");
}

#[test]
fn test_repeated_attribute_is_rejected() {
    let err = FilterSpec::parse("A|A", "Bounds|Set", "1|2#x").unwrap_err();
    assert!(matches!(err, ShadowCatError::InvalidConfiguration(_)));
}

#[test]
fn test_empty_set_dataset() {
    let filter = FilterSpec::parse("Format", "Set", "").unwrap();
    assert!(filter.sets()["Format"].is_empty());
}

#[test]
fn test_level_parsing() {
    assert_eq!(ConstraintLevel::parse("PASSAGE").unwrap(), ConstraintLevel::Passage);
    assert_eq!(ConstraintLevel::parse(" item ").unwrap(), ConstraintLevel::Item);
    assert!(ConstraintLevel::parse("section").is_err());
}

#[test]
fn test_custom_column_names() {
    let columns = ConstraintColumns {
        id: "Constraint ID".to_string(),
        ..ConstraintColumns::default()
    };
    let mut header = COLUMNS;
    header[0] = "Constraint ID";
    let c = parse_constraint_with(&columns, &header, &row("0", "1", "", "", ""), 2).unwrap();
    assert_eq!(c.id(), "C1");

    let err = parse_constraint(&header, &row("0", "1", "", "", ""), 2).unwrap_err();
    assert!(matches!(err, ShadowCatError::ColumnNotFound { ref column } if column == "Id"));
}

#[test]
fn test_table_skips_unloaded_rows() {
    let table = Table::from_strs(
        &COLUMNS,
        &[
            &["C1", "", "Content", "Item", "", "1", "2", "", "", "", "true"],
            &["C2", "", "Content", "Item", "", "1", "2", "", "", "", "FALSE"],
            &["C3", "", "Content", "Passage", "", "1", "Null", "", "", "", "1"],
        ],
    )
    .unwrap();
    let constraints = parse_constraint_table(&table).unwrap();
    let ids: Vec<&str> = constraints.iter().map(Constraint::id).collect();
    assert_eq!(ids, vec!["C1", "C3"]);
    assert_eq!(constraints[1].row_index(), 2);
}

#[test]
fn test_table_without_is_loaded_column() {
    let table = Table::from_strs(
        &COLUMNS[..10],
        &[&["C1", "", "Content", "Item", "", "1", "2", "", "", ""]],
    )
    .unwrap();
    assert_eq!(parse_constraint_table(&table).unwrap().len(), 1);
}

#[test]
fn test_table_aborts_on_bad_row() {
    let table = Table::from_strs(
        &COLUMNS[..10],
        &[
            &["C1", "", "Content", "Item", "", "1", "2", "", "", ""],
            &["C2", "", "Content", "Item", "", "1", "2", "A", "Bounds", "1"],
        ],
    )
    .unwrap();
    assert!(parse_constraint_table(&table).is_err());
}

#[test]
fn test_matches_entity() {
    let entity = parse_entity(
        "I1",
        &["I1", "7", "MC"],
        &["Item ID", "Content", "Format"],
        &[false, true, false],
        0,
    )
    .unwrap();

    let pass = FilterSpec::parse("Content|Format", "Bounds|Set", "0|10#MC|TF").unwrap();
    assert!(pass.matches(&entity));

    let out_of_bounds = FilterSpec::parse("Content", "Bounds", "8|10").unwrap();
    assert!(!out_of_bounds.matches(&entity));

    let wrong_category = FilterSpec::parse("Format", "Set", "TF").unwrap();
    assert!(!wrong_category.matches(&entity));

    let missing = FilterSpec::parse("Strand", "Set", "Algebra").unwrap();
    assert!(!missing.matches(&entity));

    assert!(FilterSpec::new().matches(&entity));
}

#[test]
fn test_set_matches_padded_cell() {
    let entity = parse_entity(
        " I1 ",
        &[" I1 ", "MC ", " 7 "],
        &["Item ID", "Format", "Content"],
        &[false, false, true],
        0,
    )
    .unwrap();
    assert_eq!(entity.id(), "I1");

    let filter = FilterSpec::parse("Format|Content", "Set|Bounds", "MC#0|10").unwrap();
    assert!(filter.matches(&entity));
    let by_id = FilterSpec::parse("Item ID", "Set", "I1").unwrap();
    assert!(by_id.matches(&entity));
}

#[test]
fn test_record_activity() {
    let mut c = parse_constraint(&COLUMNS, &row("1", "2", "", "", ""), 0).unwrap();
    c.record_activity(0.25);
    assert_eq!(c.activity(), Some(0.25));
}

#[test]
fn test_encode_orders_attributes() {
    let filter = FilterSpec::new()
        .with_set("Format", ["TF", "MC"])
        .unwrap()
        .with_bounds("Content", 0.0, 10.0)
        .unwrap();
    let encoded = filter.encode().unwrap();
    assert_eq!(encoded.attributes, "Content|Format");
    assert_eq!(encoded.logics, "Bounds|Set");
    assert_eq!(encoded.data, "0|10#MC|TF");
}

#[test]
fn test_encode_rejects_separators() {
    let filter = FilterSpec::new().with_set("Format", ["M|C"]).unwrap();
    assert!(filter.encode().is_err());
    let filter = FilterSpec::new().with_bounds("A#B", 0.0, 1.0).unwrap();
    assert!(filter.encode().is_err());
}

fn token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,8}"
}

fn bound() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1_000i32..1_000).prop_map(f64::from),
        -1.0e6f64..1.0e6,
    ]
}

proptest! {
    #[test]
    fn property_encode_then_parse_reproduces_filters(
        bounds in prop::collection::btree_map(token(), (bound(), bound()), 0..4),
        sets in prop::collection::btree_map(token(), prop::collection::btree_set(token(), 0..4), 0..4),
    ) {
        let mut filter = FilterSpec::new();
        for (name, &(a, b)) in &bounds {
            filter = filter.with_bounds(format!("b_{name}"), a.min(b), a.max(b)).unwrap();
        }
        for (name, values) in &sets {
            filter = filter.with_set(format!("s_{name}"), values.iter().cloned()).unwrap();
        }

        let encoded = filter.encode().unwrap();
        let parsed = FilterSpec::parse(&encoded.attributes, &encoded.logics, &encoded.data).unwrap();
        prop_assert_eq!(parsed, filter);
    }

    #[test]
    fn property_attribute_in_at_most_one_mapping(
        names in prop::collection::vec("[a-c]", 1..5),
        logics in prop::collection::vec(prop::bool::ANY, 5),
    ) {
        let logic_tokens: Vec<&str> = names
            .iter()
            .zip(&logics)
            .map(|(_, bounds)| if *bounds { "Bounds" } else { "Set" })
            .collect();
        let data: Vec<&str> = logic_tokens
            .iter()
            .map(|l| if *l == "Bounds" { "1|2" } else { "x|y" })
            .collect();

        if let Ok(filter) = FilterSpec::parse(&names.join("|"), &logic_tokens.join("|"), &data.join("#")) {
            for name in filter.bounds().keys() {
                prop_assert!(!filter.sets().contains_key(name));
            }
        }
    }
}
