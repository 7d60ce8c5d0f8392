//! skein-core library.
//!
//! Turns a flat collection of work items, some of which point at a parent,
//! into one ordered sequence where each child sits right after its parent
//! and parent clusters are ordered by a chosen sort field.
//!
//! The pipeline runs in three stages:
//!
//! 1. [`lookup::create_parent_lookups`] indexes which parents are referenced
//!    and which of those are already members of the collection.
//! 2. [`prepare::prepare_array_for_sort`] builds the flat working set,
//!    synthesizing any referenced parent that is missing.
//! 3. [`group::group_sort`] orders clusters by the resolved
//!    [`field::SortField`] and threads children behind their parent.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in the engine, `anyhow::Result` at
//!   the config/IO edges.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod field;
pub mod group;
pub mod lookup;
pub mod model;
pub mod prepare;
pub mod tags;

pub use field::{Direction, SortField, SortValue, resolve_sort_path, sort_by_field};
pub use group::{SortSpec, entries_into_items, group_sort, group_sort_by};
pub use lookup::{ParentLookups, create_parent_lookups};
pub use model::item::{Item, ItemKey, Person, Product};
pub use prepare::{Entry, Placement, prepare_array_for_sort};
