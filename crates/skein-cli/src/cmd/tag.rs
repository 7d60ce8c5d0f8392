//! `sk tag` and `sk untag`: add/remove tags on one item in a JSON file.

use crate::output::{CliError, OutputMode, pretty_kv, render, render_error};
use crate::source::{ItemSource, read_items, write_items};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use skein_core::ItemKey;
use skein_core::error::ErrorCode;
use skein_core::tags::{ItemTagStore, TagAction, TagChanger, TagError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct TagArgs {
    /// JSON file holding an array of items; rewritten in place.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Product id of the item.
    #[arg(long)]
    pub product: u64,

    /// Item number within the product.
    #[arg(long)]
    pub number: u64,

    /// Tags to add or remove.
    #[arg(required = true)]
    pub tags: Vec<String>,
}

impl TagArgs {
    const fn key(&self) -> ItemKey {
        ItemKey::new(self.product, self.number)
    }
}

#[derive(Debug, Serialize)]
struct TagReport {
    ok: bool,
    item: String,
    action: TagAction,
    tags: Vec<String>,
    changed: Vec<String>,
}

/// Apply every tag in order, returning the final list and the tags that
/// actually changed it.
fn apply_all(
    changer: &mut impl TagChanger,
    key: ItemKey,
    mut current: Vec<String>,
    tags: &[String],
    action: TagAction,
) -> Result<(Vec<String>, Vec<String>), TagError> {
    let mut changed = Vec::new();
    for tag in tags {
        let next = changer.add_or_remove(key, &current, tag, action)?;
        if next != current {
            changed.push(tag.trim().to_string());
        }
        current = next;
    }
    Ok((current, changed))
}

fn change_tags(path: &Path, key: ItemKey, tags: &[String], action: TagAction) -> Result<TagReport> {
    let mut store = ItemTagStore::new(read_items(ItemSource::File(path))?);
    let current = store
        .get(key)
        .map(|item| item.tags.clone())
        .ok_or(TagError::ItemNotFound(key))?;

    let (tags, changed) = apply_all(&mut store, key, current, tags, action)?;
    if !changed.is_empty() {
        write_items(path, store.items())?;
    }
    info!(item = %key, %action, changed = changed.len(), "tags updated");

    Ok(TagReport {
        ok: true,
        item: key.to_string(),
        action,
        tags,
        changed,
    })
}

/// Human rendering; `quiet` keeps only the resulting tag list.
fn write_report(w: &mut dyn Write, report: &TagReport, quiet: bool) -> io::Result<()> {
    if !quiet {
        if report.changed.is_empty() {
            writeln!(w, "✓ {}: tags unchanged", report.item)?;
        } else {
            let verb = match report.action {
                TagAction::Add => "added",
                TagAction::Remove => "removed",
            };
            writeln!(w, "✓ {}: {verb} {}", report.item, report.changed.join(", "))?;
        }
    }
    pretty_kv(w, "tags", report.tags.join(", "))
}

fn run(args: &TagArgs, action: TagAction, output: OutputMode, quiet: bool) -> Result<()> {
    let report = match change_tags(&args.file, args.key(), &args.tags, action) {
        Ok(report) => report,
        Err(e) => {
            let cli_error = e.downcast_ref::<TagError>().map_or_else(
                || CliError::coded(format!("{e:#}"), ErrorCode::InvalidItemsFile),
                CliError::from,
            );
            render_error(output, &cli_error)?;
            return Err(e);
        }
    };

    render(output, &report, |r, w| write_report(w, r, quiet))
}

pub fn run_tag(args: &TagArgs, output: OutputMode, quiet: bool) -> Result<()> {
    run(args, TagAction::Add, output, quiet)
}

pub fn run_untag(args: &TagArgs, output: OutputMode, quiet: bool) -> Result<()> {
    run(args, TagAction::Remove, output, quiet)
}
