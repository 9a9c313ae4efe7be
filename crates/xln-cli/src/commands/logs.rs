//! `xln-inspect logs` command.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Value, json};
use xln_frames::{LogCategory, LogEntry, LogLevel};
use xln_inspect::{
    EventBridge, FsSettingsStore, LogFilter, LogTally, SettingsHandle, resolve_view,
};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

use super::{AtArgs, NO_FRAMES, load_history, view_meta};

#[derive(Args, Debug)]
pub struct LogsArgs {
    #[command(flatten)]
    pub at: AtArgs,

    /// Show only these levels (repeatable); default comes from settings
    #[arg(long = "level", value_name = "LEVEL")]
    pub levels: Vec<LogLevel>,

    /// Show only these categories (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<LogCategory>,

    /// Case-insensitive substring of the message
    #[arg(long)]
    pub search: Option<String>,

    /// Only entries attributed to this entity
    #[arg(long)]
    pub entity: Option<String>,

    /// Start from a filter that passes everything instead of the saved one
    #[arg(long)]
    pub all: bool,
}

pub fn cmd_logs(opts: &InspectOpts, config: &InspectConfig, args: &LogsArgs) -> Result<()> {
    let history = load_history(config)?;
    let view = resolve_view(args.at.at, &history, history.last());
    let Some(frame) = view.frame() else {
        return print_empty(opts, NO_FRAMES, None);
    };

    let filter = build_filter(config, args)?;
    let outcome = filter.apply(&frame.logs);
    let mut meta = view_meta(&view);
    meta["total"] = json!(outcome.total);
    meta["hidden"] = json!(outcome.hidden());
    meta["tally"] = serde_json::to_value(LogTally::of(&frame.logs))?;

    if let Some(message) = outcome.empty_state().message() {
        return print_empty(opts, message, Some(meta));
    }

    let mut warnings = Vec::new();
    if outcome.hidden() > 0 {
        warnings.push(format!(
            "{} of {} entries hidden by filter",
            outcome.hidden(),
            outcome.total
        ));
    }

    let data = if opts.wants_json() {
        serde_json::to_value(&outcome.visible)?
    } else {
        let lines: Vec<String> = outcome.visible.iter().map(|entry| log_line(entry)).collect();
        Value::String(lines.join("\n"))
    };
    print_success(opts, data, Some(meta), warnings)
}

/// Saved filter (or pass-all with `--all`) narrowed by the flags.
fn build_filter(config: &InspectConfig, args: &LogsArgs) -> Result<LogFilter> {
    let mut filter = if args.all {
        LogFilter::all()
    } else if config.settings_dir.is_dir() {
        let store = FsSettingsStore::open(&config.settings_dir)
            .with_context(|| format!("open settings at {}", config.settings_dir.display()))?;
        SettingsHandle::load(Arc::new(store), EventBridge::new())?
            .current()
            .log_filter
            .clone()
    } else {
        LogFilter::default()
    };

    if !args.levels.is_empty() {
        filter.active_levels = args.levels.iter().cloned().collect();
    }
    if !args.categories.is_empty() {
        filter.active_categories = args.categories.iter().cloned().collect();
    }
    if let Some(search) = &args.search {
        filter.set_search(search.clone());
    }
    if let Some(entity_id) = &args.entity {
        filter.set_entity(Some(entity_id.clone()));
    }
    Ok(filter)
}

fn log_line(entry: &LogEntry) -> String {
    let entity = entry.entity_id.as_deref().unwrap_or("-");
    format!(
        "{:<5} {:<12} {entity}  {}",
        entry.level.as_str(),
        entry.category.as_str(),
        entry.message
    )
}
