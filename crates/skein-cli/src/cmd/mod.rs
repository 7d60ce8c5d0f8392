pub mod completions;
pub mod config;
pub mod fields;
pub mod sort;
pub mod tag;
