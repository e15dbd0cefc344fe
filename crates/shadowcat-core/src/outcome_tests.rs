//! Tests for solver outcome decoding

use super::constraint::parse_constraint;
use super::error::ShadowCatError;
use super::outcome::*;

#[test]
fn test_status_code_table() {
    let table = [
        (2, SolverStatus::Optimal),
        (4, SolverStatus::Unfinished),
        (6, SolverStatus::Infeasible),
        (8, SolverStatus::Unbounded),
        (10, SolverStatus::Other),
    ];
    for (code, status) in table {
        assert_eq!(SolverStatus::from_code(code).unwrap(), status);
        assert_eq!(SolverStatus::from_code(code).unwrap(), status);
        assert_eq!(status.code(), code);
    }
}

#[test]
fn test_unknown_status_codes() {
    for code in [-1, 0, 1, 3, 5, 7, 9, 11, 99] {
        assert_eq!(
            SolverStatus::from_code(code),
            Err(ShadowCatError::UnknownSolverStatus(code))
        );
    }
}

#[test]
fn test_status_helpers() {
    assert!(SolverStatus::Optimal.has_solution());
    assert!(SolverStatus::Unfinished.has_solution());
    assert!(!SolverStatus::Infeasible.has_solution());
    assert!(!SolverStatus::Other.is_optimal());
    assert_eq!(SolverStatus::Unbounded.to_string(), "UNBOUNDED");
}

#[test]
fn test_empty_builder_defaults() {
    let outcome = SolverOutcomeBuilder::new().build().unwrap();
    assert!(outcome.item_ids().is_empty());
    assert!(outcome.item_rows().is_empty());
    assert!(outcome.passage_ids().is_empty());
    assert!(outcome.passage_rows().is_empty());
    assert_eq!(outcome.passage_order(), None);
    assert_eq!(outcome.objective(), 0.0);
    assert_eq!(outcome.status(), SolverStatus::Other);
}

#[test]
fn test_unknown_code_is_not_other() {
    let err = SolverOutcome::builder().status_code(3).unwrap_err();
    assert_eq!(err, ShadowCatError::UnknownSolverStatus(3));
}

#[test]
fn test_setters_replace_fields() {
    let outcome = SolverOutcome::builder()
        .item_ids(vec!["I1".into()])
        .item_ids(vec!["I2".into(), "I3".into()])
        .item_rows(vec![1, 2])
        .passage_ids(vec!["P1".into()])
        .passage_rows(vec![0])
        .passage_order(vec![0])
        .objective(1.0)
        .objective(2.5)
        .status_code(6)
        .unwrap()
        .status_code(4)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(outcome.item_ids(), &["I2", "I3"]);
    assert_eq!(outcome.objective(), 2.5);
    assert_eq!(outcome.status(), SolverStatus::Unfinished);
    assert_eq!(outcome.passage_order(), Some(&[0][..]));
    assert_eq!(
        outcome.selected_passages().collect::<Vec<_>>(),
        vec![("P1", 0)]
    );
}

#[test]
fn test_mismatched_selection_lengths() {
    let err = SolverOutcome::builder()
        .item_ids(vec!["I1".into(), "I2".into()])
        .item_rows(vec![0])
        .build()
        .unwrap_err();
    assert!(matches!(err, ShadowCatError::InvalidConfiguration(_)));
}

#[test]
fn test_apply_activities() {
    let columns = [
        "Id", "Description", "Type", "Level", "CalAttr", "CalLB", "CalUB", "FilterAttr",
        "FilterLogic", "FilterData",
    ];
    let mut constraints = vec![
        parse_constraint(&columns, &["C1", "", "", "item", "", "1", "2", "", "", ""], 0).unwrap(),
        parse_constraint(&columns, &["C2", "", "", "item", "", "1", "2", "", "", ""], 1).unwrap(),
    ];
    let outcome = SolverOutcome::builder()
        .constraint_activities([(1, 0.75), (9, 1.0)])
        .build()
        .unwrap();

    assert_eq!(outcome.apply_activities(&mut constraints), 1);
    assert_eq!(constraints[0].activity(), None);
    assert_eq!(constraints[1].activity(), Some(0.75));
}
