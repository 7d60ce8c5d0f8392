//! Sort fields, alias resolution and the key-path comparator.
//!
//! Callers name a sort field with a loose alias (`"assigned to"`,
//! `"created_by"`, ...). [`resolve_sort_path`] maps it onto a [`SortField`],
//! which knows both its dotted key path and how to pull a typed
//! [`SortValue`] out of an item. Unknown aliases fall back to
//! [`SortField::Number`]; this is deliberate and never an error.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;
use crate::model::item::{Item, ItemKey, ParseEnumError, normalize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while extracting sort values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The item does not carry the field the sort needs.
    #[error("item {key} has no `{path}` to sort by")]
    MissingField { key: ItemKey, path: &'static str },
}

impl SortError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingField { .. } => ErrorCode::MissingSortField,
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The item attributes a grouping sort can order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Number,
    Product,
    AssignedTo,
    CreatedBy,
    Created,
}

impl SortField {
    pub const ALL: [Self; 5] = [
        Self::Number,
        Self::Product,
        Self::AssignedTo,
        Self::CreatedBy,
        Self::Created,
    ];

    /// Dotted attribute path the field reads.
    #[must_use]
    pub const fn key_path(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Product => "product.name",
            Self::AssignedTo => "assigned_to.first_name",
            Self::CreatedBy => "created_by.first_name",
            Self::Created => "created_at",
        }
    }

    /// Canonical user-facing alias.
    #[must_use]
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Product => "product",
            Self::AssignedTo => "assigned to",
            Self::CreatedBy => "created by",
            Self::Created => "created",
        }
    }

    /// Extract this field's value from `item`.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::MissingField`] when the nested object or
    /// timestamp is absent on the item.
    pub fn value(self, item: &Item) -> Result<SortValue<'_>, SortError> {
        let missing = || SortError::MissingField {
            key: item.key(),
            path: self.key_path(),
        };
        match self {
            Self::Number => Ok(SortValue::Number(item.number)),
            Self::Product => Ok(SortValue::Text(&item.product.name)),
            Self::AssignedTo => item
                .assigned_to
                .as_ref()
                .map(|person| SortValue::Text(&person.first_name))
                .ok_or_else(missing),
            Self::CreatedBy => item
                .created_by
                .as_ref()
                .map(|person| SortValue::Text(&person.first_name))
                .ok_or_else(missing),
            Self::Created => item.created_at.map(SortValue::Time).ok_or_else(missing),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_path())
    }
}

/// Map a user-facing alias onto a sort field.
///
/// Matching ignores case and treats spaces, underscores and hyphens alike.
/// Anything unrecognised, including an empty alias, sorts by number.
#[must_use]
pub fn resolve_sort_path(alias: &str) -> SortField {
    match normalize(alias).as_str() {
        "product" | "product name" => SortField::Product,
        "assigned to" | "assigned to first name" => SortField::AssignedTo,
        "created by" | "created by first name" => SortField::CreatedBy,
        "created" | "created at" => SortField::Created,
        "number" | "" => SortField::Number,
        other => {
            debug!(alias = other, "unknown sort alias, falling back to number");
            SortField::Number
        }
    }
}

// ---------------------------------------------------------------------------
// Values and direction
// ---------------------------------------------------------------------------

/// A typed sort value borrowed from an item.
///
/// Values from one field always share a variant, so the derived ordering is
/// the natural one: numeric, lexicographic or chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Number(u64),
    Text(&'a str),
    Time(DateTime<Utc>),
}

impl fmt::Display for SortValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

/// Sort direction. Descending is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// Orient an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(ParseEnumError {
                expected: "direction",
                got: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

/// Stable sort of `items` by `field` in `direction`.
///
/// Every value is extracted before anything is reordered, so a shape error
/// leaves no partial result. Equal values keep their input order.
///
/// # Errors
///
/// Returns [`SortError::MissingField`] for the first item lacking `field`.
pub fn sort_by_field<T: AsRef<Item>>(
    items: &[T],
    field: SortField,
    direction: Direction,
) -> Result<Vec<&T>, SortError> {
    let mut keyed = items
        .iter()
        .map(|entry| field.value(entry.as_ref()).map(|value| (value, entry)))
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| direction.apply(a.cmp(b)));

    Ok(keyed.into_iter().map(|(_, entry)| entry).collect())
}
