//! Flat working set for the grouping sort.
//!
//! Every referenced parent ends up as exactly one top-level entry: either the
//! member item itself, or a stand-in borrowed from the first child that embeds
//! it. Bookkeeping lives in [`Placement`] beside each entry so the caller's
//! items are never touched.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::lookup::ParentLookups;
use crate::model::item::{Item, ItemKey};

/// Role of a prepared entry in the cluster structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Top-level item with no parent and no children in the working set.
    Standalone,
    /// Member of the input that some other item names as its parent.
    Parent,
    /// Stand-in for a referenced parent that is not a member of the input.
    SynthesizedParent,
    /// Child threaded behind the parent with this key.
    ChildOf(ItemKey),
}

impl Placement {
    /// True for entries that open a cluster.
    #[must_use]
    pub const fn is_head(self) -> bool {
        !matches!(self, Self::ChildOf(_))
    }

    #[must_use]
    pub const fn parent_key(self) -> Option<ItemKey> {
        match self {
            Self::ChildOf(key) => Some(key),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standalone => "standalone",
            Self::Parent => "parent",
            Self::SynthesizedParent => "synthesized",
            Self::ChildOf(_) => "child",
        }
    }
}

/// A borrowed item plus its placement in the working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<'a> {
    pub item: &'a Item,
    pub placement: Placement,
}

impl<'a> Entry<'a> {
    #[must_use]
    pub const fn new(item: &'a Item, placement: Placement) -> Self {
        Self { item, placement }
    }

    #[must_use]
    pub const fn key(&self) -> ItemKey {
        self.item.key()
    }

    #[must_use]
    pub const fn is_synthesized(&self) -> bool {
        matches!(self.placement, Placement::SynthesizedParent)
    }

    /// Owned copy of the item. Synthesized parents come back flagged as
    /// placeholders so the next pass drops and rebuilds them.
    #[must_use]
    pub fn to_item(&self) -> Item {
        let mut owned = self.item.clone();
        if self.is_synthesized() {
            owned.placeholder = true;
        }
        owned
    }
}

impl AsRef<Item> for Entry<'_> {
    fn as_ref(&self) -> &Item {
        self.item
    }
}

/// Build the flat working set from `items`.
///
/// - Placeholder items from an earlier pass are dropped.
/// - A missing parent is emitted once, just before the first child that
///   references it.
/// - An item that is a member parent is emitted as [`Placement::Parent`]
///   even if it has a parent of its own; nesting is one level deep.
#[must_use]
pub fn prepare_array_for_sort<'a>(items: &'a [Item], lookups: &ParentLookups) -> Vec<Entry<'a>> {
    let mut present: HashSet<ItemKey> = lookups.parents.clone();
    let mut entries = Vec::with_capacity(items.len());
    let mut synthesized = 0_usize;

    for item in items {
        if item.placeholder {
            trace!(key = %item.key(), "dropping placeholder from an earlier pass");
            continue;
        }

        let parent_key = item.parent.as_deref().map(|parent| {
            let key = parent.key();
            if present.insert(key) {
                trace!(key = %key, child = %item.key(), "synthesizing missing parent");
                entries.push(Entry::new(parent, Placement::SynthesizedParent));
                synthesized += 1;
            }
            key
        });

        let placement = if lookups.is_member_parent(&item.key()) {
            Placement::Parent
        } else if let Some(key) = parent_key {
            Placement::ChildOf(key)
        } else {
            Placement::Standalone
        };
        entries.push(Entry::new(item, placement));
    }

    debug!(
        input = items.len(),
        prepared = entries.len(),
        synthesized,
        "prepared working set"
    );
    entries
}
