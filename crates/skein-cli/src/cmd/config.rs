//! `sk config`: inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use skein_core::config::{
    EffectiveConfig, PROJECT_CONFIG_PATH, project_config_path, resolve_config, user_config_path,
};
use std::io::{self, Write};
use std::path::Path;

use crate::output::{OutputMode, pretty_kv, pretty_section};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the resolved configuration and where it was read from
    Show,
}

pub fn run_config(args: &ConfigArgs, project_root: &Path, output: OutputMode) -> Result<()> {
    match args.command {
        ConfigCommand::Show => run_show(project_root, output),
    }
}

fn run_show(project_root: &Path, output: OutputMode) -> Result<()> {
    let effective = resolve_config(project_root, output.as_str())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match output {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, &effective)?;
            writeln!(out)?;
        }
        OutputMode::Text => write_text(&mut out, &effective)?,
        OutputMode::Pretty => write_pretty(&mut out, &effective, project_root)?,
    }
    Ok(())
}

fn write_text(w: &mut dyn Write, value: &EffectiveConfig) -> io::Result<()> {
    writeln!(w, "resolved_output={}", value.resolved_output)?;
    writeln!(w, "sort.field={}", value.project.sort.field)?;
    writeln!(w, "sort.direction={}", value.project.sort.direction)?;
    if let Some(out) = &value.user.output {
        writeln!(w, "user.output={out}")?;
    }
    Ok(())
}

fn write_pretty(w: &mut dyn Write, value: &EffectiveConfig, project_root: &Path) -> io::Result<()> {
    pretty_section(w, "Configuration")?;
    pretty_kv(w, "output", &value.resolved_output)?;
    pretty_kv(w, "sort.field", &value.project.sort.field)?;
    pretty_kv(w, "sort.dir", &value.project.sort.direction)?;
    writeln!(w)?;

    pretty_section(w, "Files")?;
    let project = project_config_path(project_root);
    pretty_kv(w, "project", describe(&project, PROJECT_CONFIG_PATH))?;
    match user_config_path() {
        Some(path) => pretty_kv(w, "user", describe(&path, "user config"))?,
        None => pretty_kv(w, "user", "(no config directory)")?,
    }
    Ok(())
}

fn describe(path: &Path, label: &str) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (missing, {label} defaults apply)", path.display())
    }
}
