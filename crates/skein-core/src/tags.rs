//! Tag add/remove capability.
//!
//! The tag editing surface talks to the rest of the system through a single
//! operation, `add_or_remove(model_id, current_tags, tag, action)`. The model
//! id is the item's composite key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;
use crate::model::item::{Item, ItemKey, ParseEnumError, normalize};

/// Errors raised by tag changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("tag is empty")]
    EmptyTag,

    #[error("item not found: {0}")]
    ItemNotFound(ItemKey),
}

impl TagError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyTag => ErrorCode::EmptyTag,
            Self::ItemNotFound(_) => ErrorCode::ItemNotFound,
        }
    }
}

/// Whether a tag is being attached or detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagAction {
    Add,
    Remove,
}

impl TagAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for TagAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(ParseEnumError {
                expected: "tag action",
                got: s.to_string(),
            }),
        }
    }
}

/// Capability handed to tag editors.
pub trait TagChanger {
    /// Apply `action` for `tag` to the item identified by `model_id`, whose
    /// tags the caller currently sees as `current_tags`. Returns the new tag
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`TagError`] when the tag is empty or the item is unknown.
    fn add_or_remove(
        &mut self,
        model_id: ItemKey,
        current_tags: &[String],
        tag: &str,
        action: TagAction,
    ) -> Result<Vec<String>, TagError>;
}

/// Compute the tag list after applying `action`.
///
/// The tag is trimmed first. Adding keeps the existing order and skips
/// duplicates; removing drops every equal tag.
///
/// # Errors
///
/// Returns [`TagError::EmptyTag`] if the trimmed tag is empty.
pub fn apply_tag_change(
    current: &[String],
    tag: &str,
    action: TagAction,
) -> Result<Vec<String>, TagError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(TagError::EmptyTag);
    }

    let mut next = current.to_vec();
    match action {
        TagAction::Add => {
            if !next.iter().any(|t| t == tag) {
                next.push(tag.to_string());
            }
        }
        TagAction::Remove => next.retain(|t| t != tag),
    }
    Ok(next)
}

/// In-memory [`TagChanger`] over an owned item collection.
#[derive(Debug, Clone, Default)]
pub struct ItemTagStore {
    items: Vec<Item>,
}

impl ItemTagStore {
    #[must_use]
    pub const fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Look up a real (non-placeholder) item by key.
    #[must_use]
    pub fn get(&self, key: ItemKey) -> Option<&Item> {
        self.items
            .iter()
            .find(|item| !item.placeholder && item.key() == key)
    }

    fn get_mut(&mut self, key: ItemKey) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| !item.placeholder && item.key() == key)
    }
}

impl TagChanger for ItemTagStore {
    fn add_or_remove(
        &mut self,
        model_id: ItemKey,
        current_tags: &[String],
        tag: &str,
        action: TagAction,
    ) -> Result<Vec<String>, TagError> {
        let next = apply_tag_change(current_tags, tag, action)?;
        let item = self
            .get_mut(model_id)
            .ok_or(TagError::ItemNotFound(model_id))?;
        item.tags.clone_from(&next);
        debug!(item = %model_id, %action, tag = tag.trim(), tags = next.len(), "tags changed");
        Ok(next)
    }
}
