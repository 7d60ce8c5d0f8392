//! Parent lookup indexes built from a flat item collection.
//!
//! Two sets are derived in one scan:
//!
//! - `matched`: every composite key some item names as its parent.
//! - `parents`: the subset of `matched` whose item is itself a member of the
//!   collection, so no stand-in has to be synthesized for it.
//!
//! Placeholder entries left over from an earlier pass never count as
//! members; a demanded parent is rebuilt from the child's embedded copy.

use std::collections::HashSet;

use tracing::debug;

use crate::model::item::{Item, ItemKey};

/// Membership indexes consumed by [`crate::prepare::prepare_array_for_sort`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentLookups {
    /// Keys referenced as a parent whose item is present in the collection.
    pub parents: HashSet<ItemKey>,
    /// Every key referenced as a parent by at least one item.
    pub matched: HashSet<ItemKey>,
}

impl ParentLookups {
    /// True when `key` is a referenced parent already present as a member.
    #[must_use]
    pub fn is_member_parent(&self, key: &ItemKey) -> bool {
        self.parents.contains(key)
    }

    /// True when some item names `key` as its parent.
    #[must_use]
    pub fn is_referenced(&self, key: &ItemKey) -> bool {
        self.matched.contains(key)
    }
}

/// Scan `items` and build the parent lookup sets.
#[must_use]
pub fn create_parent_lookups(items: &[Item]) -> ParentLookups {
    let matched: HashSet<ItemKey> = items.iter().filter_map(Item::parent_key).collect();

    let parents: HashSet<ItemKey> = items
        .iter()
        .filter(|item| !item.placeholder)
        .map(Item::key)
        .filter(|key| matched.contains(key))
        .collect();

    debug!(
        items = items.len(),
        parents = parents.len(),
        matched = matched.len(),
        "built parent lookups"
    );

    ParentLookups { parents, matched }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Product;

    fn item(number: u64, product: u64) -> Item {
        Item::new(number, Product::new(product, format!("p{product}")))
    }

    fn child(number: u64, product: u64, parent: u64) -> Item {
        item(number, product).with_parent(item(parent, product))
    }

    fn keys(pairs: &[(u64, u64)]) -> HashSet<ItemKey> {
        pairs
            .iter()
            .map(|&(product, number)| ItemKey::new(product, number))
            .collect()
    }

    #[test]
    fn empty_input_gives_empty_sets() {
        let lookups = create_parent_lookups(&[]);
        assert!(lookups.parents.is_empty());
        assert!(lookups.matched.is_empty());
    }

    #[test]
    fn records_member_parents_and_all_referenced_parents() {
        let items = vec![
            child(2, 1, 1),
            item(3, 1).with_children_marker(),
            child(3, 2, 4),
            item(4, 2).with_children_marker(),
        ];
        let lookups = create_parent_lookups(&items);

        assert_eq!(lookups.parents, keys(&[(2, 4)]));
        assert_eq!(lookups.matched, keys(&[(1, 1), (2, 4)]));
    }

    #[test]
    fn referenced_member_without_marker_still_counts() {
        let items = vec![item(4, 1), child(3, 1, 4)];
        let lookups = create_parent_lookups(&items);
        assert!(lookups.is_member_parent(&ItemKey::new(1, 4)));
    }

    #[test]
    fn placeholder_members_are_not_parents() {
        let mut stale = item(6, 1);
        stale.placeholder = true;
        let items = vec![child(2, 1, 6), stale];
        let lookups = create_parent_lookups(&items);

        assert!(lookups.parents.is_empty());
        assert!(lookups.is_referenced(&ItemKey::new(1, 6)));
    }

    #[test]
    fn same_number_in_other_product_is_not_a_member() {
        let items = vec![item(5, 14), child(1, 15, 5)];
        let lookups = create_parent_lookups(&items);

        assert!(lookups.parents.is_empty());
        assert_eq!(lookups.matched, keys(&[(15, 5)]));
    }

    #[test]
    fn building_twice_is_idempotent() {
        let items = vec![child(5, 1, 1), child(3, 1, 2), item(2, 1), child(4, 1, 1)];
        assert_eq!(create_parent_lookups(&items), create_parent_lookups(&items));
    }
}
