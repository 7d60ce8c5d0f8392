//! Edge case tests for skein-core: shared inputs across threads, timestamp
//! sorting with clusters, JSON round trips and boundary values.

use chrono::{TimeZone, Utc};
use skein_core::{
    Direction, Entry, Item, ItemKey, Placement, Product, SortField, SortSpec, entries_into_items,
    group_sort, group_sort_by,
};
use std::thread;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn product(id: u64) -> Product {
    Product::new(id, format!("product {id}"))
}

fn item(number: u64, product_id: u64) -> Item {
    Item::new(number, product(product_id))
}

fn child(number: u64, product_id: u64, parent: Item) -> Item {
    item(number, product_id).with_parent(parent)
}

fn numbers(entries: &[Entry<'_>]) -> Vec<u64> {
    entries.iter().map(|e| e.item.number).collect()
}

fn day(d: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 9, 0, 0).single().expect("valid date")
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn shared_input_sorts_identically_on_many_threads() {
    let items: Vec<Item> = (1..=50)
        .map(|n| {
            if n % 4 == 0 {
                child(n, 1 + n % 2, item(n % 7 + 100, 1 + n % 2))
            } else {
                item(n, 1 + n % 2)
            }
        })
        .collect();
    let expected: Vec<ItemKey> = group_sort(&items, &SortSpec::default())
        .expect("sort")
        .iter()
        .map(Entry::key)
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    group_sort(&items, &SortSpec::default())
                        .expect("sort")
                        .iter()
                        .map(Entry::key)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread"), expected);
        }
    });
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

#[test]
fn clusters_follow_parent_timestamp_and_children_ascend() {
    let parent = item(1, 1).with_created_at(day(10));
    let items = vec![
        item(2, 1).with_created_at(day(5)),
        child(3, 1, parent.clone()).with_created_at(day(20)),
        child(4, 1, parent).with_created_at(day(1)),
        item(5, 1).with_created_at(day(15)),
    ];

    let out = group_sort_by(&items, "created", Direction::Descending).expect("sort");
    assert_eq!(numbers(&out), vec![5, 1, 4, 3, 2]);
    assert_eq!(out[1].placement, Placement::SynthesizedParent);
}

#[test]
fn synthesized_parent_without_timestamp_is_a_shape_error() {
    let items = vec![
        item(2, 1).with_created_at(day(5)),
        child(3, 1, item(1, 1)).with_created_at(day(6)),
    ];
    let err = group_sort_by(&items, "created_at", Direction::Ascending).expect_err("shape error");
    assert!(err.to_string().contains("1:1"), "{err}");
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[test]
fn json_output_feeds_back_without_growing() {
    let items = vec![child(5, 2, item(9, 2)), child(6, 2, item(9, 2)), item(1, 2)];
    let spec = SortSpec::new(SortField::Number, Direction::Ascending);

    let first = entries_into_items(&group_sort(&items, &spec).expect("sort"));
    let json = serde_json::to_string(&first).expect("serialize");
    assert_eq!(json.matches("\"is_non_matching\":true").count(), 1);

    let parsed: Vec<Item> = serde_json::from_str(&json).expect("parse");
    let second = entries_into_items(&group_sort(&parsed, &spec).expect("sort"));
    assert_eq!(second, first);
}

// ---------------------------------------------------------------------------
// Boundary values
// ---------------------------------------------------------------------------

#[test]
fn extreme_numbers_and_products_do_not_collide() {
    let items = vec![
        item(u64::MAX, u64::MAX),
        child(0, u64::MAX, item(7, u64::MAX)),
        item(u64::MAX, 0),
    ];
    let out = group_sort(&items, &SortSpec::default()).expect("sort");
    let keys: Vec<ItemKey> = out.iter().map(Entry::key).collect();
    assert_eq!(
        keys,
        vec![
            ItemKey::new(u64::MAX, u64::MAX),
            ItemKey::new(0, u64::MAX),
            ItemKey::new(u64::MAX, 7),
            ItemKey::new(u64::MAX, 0),
        ]
    );
}

#[test]
fn input_of_only_placeholders_is_empty() {
    let mut stale = item(3, 1);
    stale.placeholder = true;
    let items = [stale];
    let out = group_sort(&items, &SortSpec::default()).expect("sort");
    assert!(out.is_empty());
}

#[test]
fn a_parent_that_is_its_own_child_is_kept_once() {
    let looped = child(4, 1, item(4, 1));
    let out = group_sort(std::slice::from_ref(&looped), &SortSpec::default()).expect("sort");
    assert_eq!(numbers(&out), vec![4]);
    assert_eq!(out[0].placement, Placement::Parent);
}
