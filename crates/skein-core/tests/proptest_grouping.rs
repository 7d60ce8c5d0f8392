use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use skein_core::{
    Direction, Entry, ItemKey, Placement, SortField, SortSpec, create_parent_lookups,
    entries_into_items, group_sort, prepare_array_for_sort,
};

use generators::*;

fn keys(entries: &[Entry<'_>]) -> Vec<ItemKey> {
    entries.iter().map(Entry::key).collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn lookups_are_idempotent(items in arb_items()) {
        prop_assert_eq!(create_parent_lookups(&items), create_parent_lookups(&items));
    }

    #[test]
    fn every_parent_has_exactly_one_head(items in arb_items()) {
        let lookups = create_parent_lookups(&items);
        let prepared = prepare_array_for_sort(&items, &lookups);

        let mut heads: HashMap<ItemKey, usize> = HashMap::new();
        for entry in prepared.iter().filter(|e| e.placement.is_head()) {
            *heads.entry(entry.key()).or_default() += 1;
        }
        for item in &items {
            if let Some(parent) = item.parent_key() {
                prop_assert_eq!(heads.get(&parent).copied(), Some(1), "parent {}", parent);
            }
        }
    }

    #[test]
    fn synthesized_parents_are_unique_and_not_members(items in arb_items()) {
        let lookups = create_parent_lookups(&items);
        let prepared = prepare_array_for_sort(&items, &lookups);
        let members: HashSet<ItemKey> = items.iter().map(skein_core::Item::key).collect();

        let mut seen = HashSet::new();
        for entry in prepared.iter().filter(|e| e.is_synthesized()) {
            prop_assert!(seen.insert(entry.key()), "synthesized {} twice", entry.key());
            prop_assert!(!members.contains(&entry.key()));
        }
    }

    #[test]
    fn output_length_counts_synthesized_parents(items in arb_items(), spec in arb_spec()) {
        let out = group_sort(&items, &spec).unwrap();
        let synthesized = out.iter().filter(|e| e.is_synthesized()).count();
        prop_assert_eq!(out.len(), items.len() + synthesized);
    }

    #[test]
    fn children_sit_right_behind_their_parent(items in arb_items(), spec in arb_spec()) {
        let out = group_sort(&items, &spec).unwrap();

        let mut current_head: Option<ItemKey> = None;
        for entry in &out {
            match entry.placement {
                Placement::ChildOf(parent) => {
                    prop_assert_eq!(Some(parent), current_head, "child {} misplaced", entry.key());
                    prop_assert_eq!(parent.product_id, entry.key().product_id);
                }
                _ => current_head = Some(entry.key()),
            }
        }
    }

    #[test]
    fn cluster_heads_follow_the_direction(items in arb_items(), spec in arb_spec()) {
        let out = group_sort(&items, &spec).unwrap();
        let heads: Vec<_> = out
            .iter()
            .filter(|e| e.placement.is_head())
            .map(|e| spec.field.value(e.item).unwrap())
            .collect();
        for pair in heads.windows(2) {
            let ordering = spec.direction.apply(pair[0].cmp(&pair[1]));
            prop_assert!(ordering.is_le(), "{} then {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn flipping_direction_reverses_clusters(items in arb_items()) {
        let asc = group_sort(&items, &SortSpec::new(SortField::Number, Direction::Ascending)).unwrap();
        let desc = group_sort(&items, &SortSpec::new(SortField::Number, Direction::Descending)).unwrap();

        let asc_heads: Vec<ItemKey> = asc.iter().filter(|e| e.placement.is_head()).map(Entry::key).collect();
        let mut desc_heads: Vec<ItemKey> = desc.iter().filter(|e| e.placement.is_head()).map(Entry::key).collect();
        desc_heads.reverse();
        prop_assert_eq!(asc_heads, desc_heads);
    }

    #[test]
    fn regrouping_the_output_is_stable(items in arb_items(), spec in arb_spec()) {
        let first = group_sort(&items, &spec).unwrap();
        let owned = entries_into_items(&first);
        let second = group_sort(&owned, &spec).unwrap();
        prop_assert_eq!(keys(&first), keys(&second));
    }
}
