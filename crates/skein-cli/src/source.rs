//! Reading and writing JSON item files.

use anyhow::{Context, Result};
use skein_core::Item;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Where a command reads its items from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource<'a> {
    Stdin,
    File(&'a Path),
}

impl<'a> ItemSource<'a> {
    /// `None` and `-` mean stdin.
    pub fn from_arg(arg: Option<&'a Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => Self::File(path),
            _ => Self::Stdin,
        }
    }

    fn label(self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Read a JSON array of items.
///
/// # Errors
///
/// Returns an error if the source cannot be read or is not a JSON array of
/// items.
pub fn read_items(source: ItemSource<'_>) -> Result<Vec<Item>> {
    let raw = match source {
        ItemSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read items from stdin")?;
            buf
        }
        ItemSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
    };
    let items = parse_items(&raw).with_context(|| format!("Invalid items in {}", source.label()))?;
    debug!(source = %source.label(), count = items.len(), "loaded items");
    Ok(items)
}

/// Parse a JSON array of items.
///
/// # Errors
///
/// Returns the `serde_json` error if `raw` is not a JSON array of items.
pub fn parse_items(raw: &str) -> serde_json::Result<Vec<Item>> {
    serde_json::from_str(raw)
}

/// Write `items` back to `path` as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_items(path: &Path, items: &[Item]) -> Result<()> {
    let mut serialized = serde_json::to_string_pretty(items)?;
    serialized.push('\n');
    std::fs::write(path, serialized).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_core::Product;
    use tempfile::TempDir;

    #[test]
    fn dash_and_missing_arg_mean_stdin() {
        assert_eq!(ItemSource::from_arg(None), ItemSource::Stdin);
        assert_eq!(ItemSource::from_arg(Some(Path::new("-"))), ItemSource::Stdin);
        let path = Path::new("items.json");
        assert_eq!(ItemSource::from_arg(Some(path)), ItemSource::File(path));
    }

    #[test]
    fn parses_minimal_items_and_ignores_unknown_fields() {
        let raw = r#"[
            {"number": 3, "product": {"id": 1, "name": "sprintly"}, "score": 12},
            {"number": 4, "product": {"id": 1, "name": "sprintly"},
             "parent": {"number": 1, "product": {"id": 1, "name": "sprintly"}}}
        ]"#;
        let items = parse_items(raw).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].parent_key(), Some(skein_core::ItemKey::new(1, 1)));
    }

    #[test]
    fn rejects_items_without_product() {
        assert!(parse_items(r#"[{"number": 3}]"#).is_err());
        assert!(parse_items(r#"{"number": 3}"#).is_err());
    }

    #[test]
    fn write_then_read_keeps_items() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        let items = vec![Item::new(7, Product::new(2, "star wars")).with_tags(["ui"])];

        write_items(&path, &items).unwrap();
        let back = read_items(ItemSource::File(&path)).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_items(ItemSource::File(Path::new("/nonexistent/items.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/items.json"));
    }
}
