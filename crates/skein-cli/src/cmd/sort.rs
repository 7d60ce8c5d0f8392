//! `sk sort`: group items under their parents and order the clusters.

use crate::output::{CliError, OutputMode, pretty_rule, pretty_section, render_error, render_mode};
use crate::source::{ItemSource, read_items};
use anyhow::Result;
use clap::Args;
use skein_core::config::load_project_config;
use skein_core::error::ErrorCode;
use skein_core::{
    Direction, Entry, Placement, SortSpec, entries_into_items, group_sort, resolve_sort_path,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct SortArgs {
    /// JSON file holding an array of items; `-` or omitted reads stdin.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Sort alias (number, product, assigned to, created by, created).
    #[arg(long, value_name = "ALIAS")]
    pub by: Option<String>,

    /// Cluster order: ascending or descending.
    #[arg(long)]
    pub direction: Option<Direction>,
}

/// One rendered line of the threaded list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SortedRow {
    key: String,
    role: &'static str,
    value: String,
    title: String,
    nested: bool,
}

impl SortedRow {
    fn from_entry(entry: &Entry<'_>, spec: &SortSpec) -> Self {
        Self {
            key: entry.key().to_string(),
            role: entry.placement.label(),
            value: spec
                .field
                .value(entry.item)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            title: entry.item.title.clone(),
            nested: matches!(entry.placement, Placement::ChildOf(_)),
        }
    }

    const fn indent(&self) -> &'static str {
        if self.nested { "  " } else { "" }
    }
}

/// Merge the config default with `--by` / `--direction`.
fn effective_spec(args: &SortArgs, project_root: &Path) -> Result<SortSpec> {
    let configured = load_project_config(project_root)?.sort.spec()?;
    Ok(SortSpec::new(
        args.by
            .as_deref()
            .map_or(configured.field, resolve_sort_path),
        args.direction.unwrap_or(configured.direction),
    ))
}

pub fn run_sort(
    args: &SortArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> Result<()> {
    let spec = match effective_spec(args, project_root) {
        Ok(spec) => spec,
        Err(e) => {
            render_error(
                output,
                &CliError::coded(format!("{e:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(e);
        }
    };

    let items = match read_items(ItemSource::from_arg(args.file.as_deref())) {
        Ok(items) => items,
        Err(e) => {
            render_error(
                output,
                &CliError::coded(format!("{e:#}"), ErrorCode::InvalidItemsFile),
            )?;
            return Err(e);
        }
    };

    let entries = match group_sort(&items, &spec) {
        Ok(entries) => entries,
        Err(e) => {
            render_error(output, &CliError::from(&e))?;
            return Err(e.into());
        }
    };
    info!(
        field = %spec.field,
        direction = %spec.direction,
        input = items.len(),
        output = entries.len(),
        "sorted items"
    );

    let rows: Vec<SortedRow> = entries
        .iter()
        .map(|entry| SortedRow::from_entry(entry, &spec))
        .collect();
    render_mode(
        output,
        &entries_into_items(&entries),
        |_, w| write_text(w, &rows),
        |_, w| write_pretty(w, &rows, &spec, quiet),
    )
}

fn write_text(w: &mut dyn Write, rows: &[SortedRow]) -> io::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(w, "key  role  value  title")?;
    for row in rows {
        writeln!(
            w,
            "{}{}  {}  {}  {}",
            row.indent(),
            row.key,
            row.role,
            row.value,
            row.title
        )?;
    }
    Ok(())
}

/// Padding counts chars, so widths are measured in chars too.
fn write_pretty(
    w: &mut dyn Write,
    rows: &[SortedRow],
    spec: &SortSpec,
    quiet: bool,
) -> io::Result<()> {
    pretty_section(
        w,
        &format!("Sorted by {} ({})", spec.field.alias(), spec.direction),
    )?;
    if rows.is_empty() {
        writeln!(w, "No items.")?;
        return pretty_rule(w);
    }

    let key_width = rows
        .iter()
        .map(|r| r.key.chars().count() + r.indent().len())
        .max()
        .unwrap_or(3)
        .max(3);
    let value_width = rows
        .iter()
        .map(|r| r.value.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    writeln!(
        w,
        "{:<key_width$}  {:<11}  {:<value_width$}  TITLE",
        "KEY", "ROLE", "VALUE"
    )?;
    for row in rows {
        let key = format!("{}{}", row.indent(), row.key);
        writeln!(
            w,
            "{key:<key_width$}  {:<11}  {:<value_width$}  {}",
            row.role, row.value, row.title
        )?;
    }
    pretty_rule(w)?;
    if quiet {
        return Ok(());
    }
    let synthesized = rows
        .iter()
        .filter(|r| r.role == Placement::SynthesizedParent.label())
        .count();
    writeln!(w, "{} entries, {synthesized} synthesized parents", rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_core::{Item, Product, SortField};
    use tempfile::TempDir;

    fn rows_for(items: &[Item], spec: &SortSpec) -> Vec<SortedRow> {
        group_sort(items, spec)
            .unwrap()
            .iter()
            .map(|e| SortedRow::from_entry(e, spec))
            .collect()
    }

    fn sample() -> Vec<Item> {
        let product = Product::new(1, "sprintly");
        vec![
            Item::new(4, product.clone()).with_title("four"),
            Item::new(3, product.clone())
                .with_title("three")
                .with_parent(Item::new(1, product).with_title("one")),
        ]
    }

    fn text(rows: &[SortedRow]) -> String {
        let mut buf = Vec::new();
        write_text(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_rows_indent_children() {
        let rows = rows_for(&sample(), &SortSpec::default());
        assert_eq!(
            text(&rows),
            "key  role  value  title\n\
             1:4  standalone  4  four\n\
             1:1  synthesized  1  one\n  \
             1:3  child  3  three\n"
        );
    }

    #[test]
    fn empty_text_output_is_empty() {
        assert_eq!(text(&[]), "");
    }

    #[test]
    fn pretty_output_counts_synthesized_parents() {
        let spec = SortSpec::default();
        let rows = rows_for(&sample(), &spec);
        let mut buf = Vec::new();
        write_pretty(&mut buf, &rows, &spec, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Sorted by number (descending)\n"));
        assert!(out.contains("  1:3"));
        assert!(out.ends_with("3 entries, 1 synthesized parents\n"));
    }

    #[test]
    fn quiet_pretty_output_drops_the_summary() {
        let spec = SortSpec::default();
        let rows = rows_for(&sample(), &spec);
        let mut buf = Vec::new();
        write_pretty(&mut buf, &rows, &spec, true).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("  1:3"));
        assert!(!out.contains("synthesized parents"));
        assert!(out.ends_with("-\n"));
    }

    #[test]
    fn pretty_columns_align_with_non_ascii_values() {
        let row = |key: &str, value: &str, title: &str| SortedRow {
            key: key.into(),
            role: "standalone",
            value: value.into(),
            title: title.into(),
            nested: false,
        };
        let rows = vec![
            row("1:1", "Zoë Ångström", "first"),
            row("1:2", "amy", "second"),
        ];
        let spec = SortSpec::new(SortField::CreatedBy, Direction::Ascending);
        let mut buf = Vec::new();
        write_pretty(&mut buf, &rows, &spec, true).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let title_column = |line: &str, title: &str| {
            let byte = line.find(title).unwrap();
            line[..byte].chars().count()
        };
        let lines: Vec<&str> = out.lines().collect();
        let header = title_column(lines[2], "TITLE");
        assert_eq!(title_column(lines[3], "first"), header);
        assert_eq!(title_column(lines[4], "second"), header);
    }

    #[test]
    fn flags_override_project_config() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join(".skein")).unwrap();
        std::fs::write(
            root.path().join(".skein/config.toml"),
            "[sort]\nfield = \"created by\"\ndirection = \"ascending\"\n",
        )
        .unwrap();

        let from_config = SortArgs {
            file: None,
            by: None,
            direction: None,
        };
        assert_eq!(
            effective_spec(&from_config, root.path()).unwrap(),
            SortSpec::new(SortField::CreatedBy, Direction::Ascending)
        );

        let overridden = SortArgs {
            file: None,
            by: Some("product".into()),
            direction: Some(Direction::Descending),
        };
        assert_eq!(
            effective_spec(&overridden, root.path()).unwrap(),
            SortSpec::new(SortField::Product, Direction::Descending)
        );
    }
}
