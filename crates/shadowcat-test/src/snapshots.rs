//! Step snapshot fixtures over the fixture pools.

use shadowcat_core::{ItemSnapshot, PassageSnapshot, StepSnapshots};

const ITEM_IDS: [&str; 8] = ["I1", "I2", "I3", "I4", "I5", "I6", "I7", "I8"];
const PASSAGE_IDS: [&str; 3] = ["P1", "P2", "P3"];

/// Snapshots for every fixture item and passage.
///
/// Items at the `administered` rows are flagged as administered and as
/// selected in the previous shadow test. Information decreases with row
/// index so solvers have a deterministic preference.
pub fn step_snapshots(administered: &[usize]) -> StepSnapshots {
    let items = ITEM_IDS
        .iter()
        .enumerate()
        .map(|(row, id)| {
            let given = administered.contains(&row);
            ItemSnapshot::new(*id, row, 1.0 - row as f64 * 0.1, true, true, given, given)
        })
        .collect();
    let passages = PASSAGE_IDS
        .iter()
        .enumerate()
        .map(|(row, id)| PassageSnapshot::new(*id, row, true))
        .collect();
    StepSnapshots::new(items, passages)
}
