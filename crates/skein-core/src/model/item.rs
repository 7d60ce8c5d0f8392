use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite identity of a work item: `(product id, item number)`.
///
/// Item numbers are only unique within a product, so every parent/child
/// match goes through this key rather than the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub product_id: u64,
    pub number: u64,
}

impl ItemKey {
    #[must_use]
    pub const fn new(product_id: u64, number: u64) -> Self {
        Self { product_id, number }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.product_id, self.number)
    }
}

/// The product an item belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A user referenced by `created_by` / `assigned_to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Person {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: None,
        }
    }
}

/// A work item as delivered by the data layer.
///
/// `parent` embeds the parent item by value when the caller already knows
/// it. `children` is a presence marker only; its contents are never read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub number: u64,
    pub product: Product,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<serde_json::Value>>,
    /// Set on parents that an earlier grouping pass synthesized.
    #[serde(
        default,
        rename = "is_non_matching",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub placeholder: bool,
}

impl Item {
    /// Create a bare item with no people, timestamps or relations.
    #[must_use]
    pub fn new(number: u64, product: Product) -> Self {
        Self {
            number,
            product,
            title: String::new(),
            created_by: None,
            assigned_to: None,
            created_at: None,
            tags: Vec::new(),
            parent: None,
            children: None,
            placeholder: false,
        }
    }

    #[must_use]
    pub const fn key(&self) -> ItemKey {
        ItemKey::new(self.product.id, self.number)
    }

    /// Key of the embedded parent, if any.
    #[must_use]
    pub fn parent_key(&self) -> Option<ItemKey> {
        self.parent.as_deref().map(Self::key)
    }

    /// True when the item carries a non-empty `children` marker.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: Self) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Attach a placeholder `children` marker.
    #[must_use]
    pub fn with_children_marker(mut self) -> Self {
        self.children = Some(vec![serde_json::Value::String("child".into())]);
        self
    }

    #[must_use]
    pub fn with_created_by(mut self, first_name: impl Into<String>) -> Self {
        self.created_by = Some(Person::new(first_name));
        self
    }

    #[must_use]
    pub fn with_assigned_to(mut self, first_name: impl Into<String>) -> Self {
        self.assigned_to = Some(Person::new(first_name));
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl AsRef<Item> for Item {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl ParseEnumError {
    #[must_use]
    pub const fn code(&self) -> crate::error::ErrorCode {
        crate::error::ErrorCode::InvalidEnumValue
    }
}

/// Lowercase and collapse `_`, `-` and runs of whitespace into single spaces.
pub(crate) fn normalize(input: &str) -> String {
    input
        .trim()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
