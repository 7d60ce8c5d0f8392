//! `sk fields`: list the sort aliases.

use crate::output::{OutputMode, Renderable, pretty_kv, render_list};
use anyhow::Result;
use serde::Serialize;
use skein_core::SortField;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct FieldRow {
    alias: &'static str,
    key_path: &'static str,
}

impl From<SortField> for FieldRow {
    fn from(field: SortField) -> Self {
        Self {
            alias: field.alias(),
            key_path: field.key_path(),
        }
    }
}

impl Renderable for FieldRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_kv(w, self.alias, self.key_path)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self)?;
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}", self.alias, self.key_path)
    }

    fn table_headers() -> &'static [&'static str] {
        &["alias", "key_path"]
    }
}

pub fn run_fields(output: OutputMode) -> Result<()> {
    let rows: Vec<FieldRow> = SortField::ALL.into_iter().map(FieldRow::from).collect();
    render_list(&rows, output)?;
    Ok(())
}
