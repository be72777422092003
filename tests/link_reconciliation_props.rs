use std::collections::BTreeSet;

use ploutos_core::domain::{LinkDiff, TimePeriod};
use proptest::prelude::*;

fn ids(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..40, 0..max_len)
}

fn set(ids: &[i64]) -> BTreeSet<i64> {
    ids.iter().copied().collect()
}

proptest! {
    #[test]
    fn establishing_links_starts_clean(initial in ids(12)) {
        let mut period = TimePeriod::new("Statement");
        period.establish_initial_linked_accounts(&initial);

        prop_assert!(period.newly_added_accounts().is_empty());
        prop_assert!(period.newly_deleted_accounts().is_empty());
        prop_assert_eq!(set(period.baseline()), set(&initial));
        prop_assert_eq!(set(&period.linked_accounts), set(&initial));
    }

    #[test]
    fn second_establish_is_ignored(
        initial in prop::collection::vec(1i64..40, 1..12),
        later in ids(12),
    ) {
        let mut period = TimePeriod::new("Statement");
        period.establish_initial_linked_accounts(&initial);
        let baseline = period.baseline().to_vec();

        period.establish_initial_linked_accounts(&later);

        prop_assert_eq!(period.baseline(), baseline.as_slice());
        prop_assert_eq!(set(&period.linked_accounts), set(&initial));
    }

    #[test]
    fn edits_partition_into_added_deleted_and_kept(
        initial in ids(12),
        removed in ids(8),
        added in ids(8),
    ) {
        let mut period = TimePeriod::new("Statement");
        period.establish_initial_linked_accounts(&initial);
        period.linked_accounts.retain(|id| !removed.contains(id));
        for id in &added {
            if !period.linked_accounts.contains(id) {
                period.linked_accounts.push(*id);
            }
        }

        let newly_added = set(&period.newly_added_accounts());
        let newly_deleted = set(&period.newly_deleted_accounts());
        let unmodified = set(&period.unmodified_accounts());

        prop_assert_eq!(
            newly_added.union(&unmodified).copied().collect::<BTreeSet<_>>(),
            set(&period.linked_accounts)
        );
        prop_assert_eq!(
            newly_deleted.union(&unmodified).copied().collect::<BTreeSet<_>>(),
            set(period.baseline())
        );
        prop_assert!(newly_added.is_disjoint(&newly_deleted));
    }

    #[test]
    fn diff_against_itself_is_empty(current in ids(16)) {
        prop_assert!(LinkDiff::between(&current, &current).is_empty());
    }
}
