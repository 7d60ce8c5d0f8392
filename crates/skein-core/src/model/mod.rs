//! Work item data model.

pub mod item;
