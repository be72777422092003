/// Membership delta between a loaded set of linked account ids and the set a
/// caller wants persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDiff {
    /// In `current` but not in `baseline`, in `current` order, each id once.
    pub added: Vec<i64>,
    /// In `baseline` but not in `current`, in `baseline` order.
    pub removed: Vec<i64>,
    /// In both, in `baseline` order.
    pub unmodified: Vec<i64>,
}

impl LinkDiff {
    pub fn between(baseline: &[i64], current: &[i64]) -> Self {
        let mut added = Vec::new();
        for &id in current {
            if !baseline.contains(&id) && !added.contains(&id) {
                added.push(id);
            }
        }
        let (unmodified, removed) = baseline
            .iter()
            .copied()
            .partition(|id| current.contains(id));
        Self {
            added,
            removed,
            unmodified,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
