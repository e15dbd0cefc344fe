//! Per-step real-time state handed to the optimizer.
//!
//! Snapshots are rebuilt at every adaptive step from the current
//! exposure-control and administration state and dropped after that step's
//! solve.

/// Real-time state of one item at one adaptive step.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSnapshot {
    id: String,
    row_index: usize,
    information: f64,
    eligible: bool,
    eligible_hard: bool,
    administered: bool,
    selected: bool,
}

impl ItemSnapshot {
    /// Creates an item snapshot.
    ///
    /// - `information`: item information at the current ability estimate
    /// - `eligible`: soft eligibility, relaxable when the model is infeasible
    /// - `eligible_hard`: hard eligibility, never relaxed
    /// - `administered`: already given at an earlier step
    /// - `selected`: part of the previous step's shadow test
    pub fn new(
        id: impl Into<String>,
        row_index: usize,
        information: f64,
        eligible: bool,
        eligible_hard: bool,
        administered: bool,
        selected: bool,
    ) -> Self {
        Self {
            id: id.into(),
            row_index,
            information,
            eligible,
            eligible_hard,
            administered,
            selected,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn information(&self) -> f64 {
        self.information
    }

    pub fn eligible(&self) -> bool {
        self.eligible
    }

    pub fn eligible_hard(&self) -> bool {
        self.eligible_hard
    }

    pub fn administered(&self) -> bool {
        self.administered
    }

    pub fn selected(&self) -> bool {
        self.selected
    }
}

/// Real-time state of one passage at one adaptive step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PassageSnapshot {
    id: String,
    row_index: usize,
    eligible: bool,
}

impl PassageSnapshot {
    pub fn new(id: impl Into<String>, row_index: usize, eligible: bool) -> Self {
        Self {
            id: id.into(),
            row_index,
            eligible,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn eligible(&self) -> bool {
        self.eligible
    }
}

/// All snapshots of one adaptive step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepSnapshots {
    items: Vec<ItemSnapshot>,
    passages: Vec<PassageSnapshot>,
}

impl StepSnapshots {
    pub fn new(items: Vec<ItemSnapshot>, passages: Vec<PassageSnapshot>) -> Self {
        Self { items, passages }
    }

    pub fn items(&self) -> &[ItemSnapshot] {
        &self.items
    }

    pub fn passages(&self) -> &[PassageSnapshot] {
        &self.passages
    }

    /// Items eligible under both soft and hard rules.
    pub fn eligible_item_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.eligible && i.eligible_hard)
            .count()
    }

    pub fn administered_count(&self) -> usize {
        self.items.iter().filter(|i| i.administered).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = ItemSnapshot::new("I1", 0, 0.42, true, true, false, false);
        let b = ItemSnapshot::new("I1".to_string(), 0, 0.42, true, true, false, false);
        assert_eq!(a, b);
        assert_ne!(a, ItemSnapshot::new("I1", 0, 0.42, true, true, false, true));
        assert_eq!(PassageSnapshot::new("P1", 3, true), PassageSnapshot::new("P1", 3, true));
    }

    #[test]
    fn test_step_counts() {
        let step = StepSnapshots::new(
            vec![
                ItemSnapshot::new("I1", 0, 0.4, true, true, true, true),
                ItemSnapshot::new("I2", 1, 0.3, false, true, false, false),
                ItemSnapshot::new("I3", 2, 0.2, true, false, false, false),
            ],
            vec![PassageSnapshot::new("P1", 0, true)],
        );
        assert_eq!(step.eligible_item_count(), 1);
        assert_eq!(step.administered_count(), 1);
        assert_eq!(step.passages().len(), 1);
    }
}
