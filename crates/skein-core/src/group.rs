//! Grouping sort: order parent clusters, thread children behind parents.
//!
//! A cluster is a head entry (standalone item, member parent or synthesized
//! parent) followed by its direct children. Clusters are ranked by the head's
//! sort value in the requested direction, so children inherit their parent's
//! position. Heads with equal values fall back to their composite key in the
//! same direction, which keeps equal-valued clusters from different products
//! apart and the output deterministic.
//!
//! Inside a cluster the parent always comes first, then its children in
//! ascending order of the sort value, then item number. Direction only moves
//! whole clusters.
//!
//! ```text
//! input (desc by number):  4, 2, 3 (parent 1)
//! prepared:                4, 2, 1*, 3          (* synthesized)
//! clusters:                [4] [2] [1* 3]
//! output:                  4, 2, 1*, 3
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::field::{Direction, SortError, SortField, resolve_sort_path, sort_by_field};
use crate::lookup::create_parent_lookups;
use crate::model::item::{Item, ItemKey};
use crate::prepare::{Entry, prepare_array_for_sort};

/// What to sort by and in which direction.
///
/// The default is descending by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: Direction,
}

impl SortSpec {
    #[must_use]
    pub const fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// Build a spec from a user-facing alias; unknown aliases sort by number.
    #[must_use]
    pub fn from_alias(alias: &str, direction: Direction) -> Self {
        Self::new(resolve_sort_path(alias), direction)
    }
}

/// Group and sort `items`.
///
/// The result holds every input item except stale placeholders, plus one
/// synthesized entry per referenced parent missing from the input.
///
/// # Errors
///
/// Returns [`SortError::MissingField`] if any prepared entry lacks the field
/// named by `spec`. Nothing is returned in that case.
pub fn group_sort<'a>(items: &'a [Item], spec: &SortSpec) -> Result<Vec<Entry<'a>>, SortError> {
    let span = debug_span!(
        "group_sort",
        field = %spec.field,
        direction = %spec.direction,
        items = items.len()
    );
    let _guard = span.enter();

    let lookups = create_parent_lookups(items);
    let prepared = prepare_array_for_sort(items, &lookups);
    let total = prepared.len();

    let mut heads: Vec<Entry<'a>> = Vec::new();
    let mut clusters: BTreeMap<ItemKey, Vec<Entry<'a>>> = BTreeMap::new();
    for entry in prepared {
        match entry.placement.parent_key() {
            Some(parent) => clusters.entry(parent).or_default().push(entry),
            None => heads.push(entry),
        }
    }

    // Pre-order by key so the stable value sort breaks ties on the key.
    heads.sort_by(|a, b| spec.direction.apply(a.key().cmp(&b.key())));
    let ranked = sort_by_field(&heads, spec.field, spec.direction)?;

    let mut ordered = Vec::with_capacity(total);
    for head in ranked {
        ordered.push(*head);
        if let Some(children) = clusters.remove(&head.key()) {
            ordered.extend(order_children(children, spec.field)?);
        }
    }

    // Unreachable once preparation has run, but never drop an item.
    for (parent, children) in clusters {
        warn!(parent = %parent, count = children.len(), "children without a head entry");
        ordered.extend(order_children(children, spec.field)?);
    }

    debug!(heads = heads.len(), output = ordered.len(), "grouped and sorted");
    Ok(ordered)
}

/// Convenience wrapper taking the alias and direction directly.
///
/// # Errors
///
/// Same as [`group_sort`].
pub fn group_sort_by<'a>(
    items: &'a [Item],
    alias: &str,
    direction: Direction,
) -> Result<Vec<Entry<'a>>, SortError> {
    group_sort(items, &SortSpec::from_alias(alias, direction))
}

/// Owned copies of a grouped result, synthesized parents flagged as
/// placeholders.
#[must_use]
pub fn entries_into_items(entries: &[Entry<'_>]) -> Vec<Item> {
    entries.iter().map(Entry::to_item).collect()
}

fn order_children(
    mut children: Vec<Entry<'_>>,
    field: SortField,
) -> Result<Vec<Entry<'_>>, SortError> {
    children.sort_by_key(|entry| entry.item.number);
    let ordered = sort_by_field(&children, field, Direction::Ascending)?
        .into_iter()
        .copied()
        .collect();
    Ok(ordered)
}
