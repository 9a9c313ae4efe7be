//! `xln-inspect import` command: plays the runtime's appending role.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Value, json};
use xln_frames::{FrameSource, FrameStore, FsFrameStore, load_frames_json};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON export: an array of frames, oldest first
    #[arg(long)]
    pub from: PathBuf,
}

pub fn cmd_import(opts: &InspectOpts, config: &InspectConfig, args: &ImportArgs) -> Result<()> {
    let frames = load_frames_json(&args.from)
        .with_context(|| format!("read frames from {}", args.from.display()))?;
    let mut store = FsFrameStore::open(&config.store_root)
        .with_context(|| format!("open frame store at {}", config.store_root.display()))?;

    let mut imported = 0usize;
    for frame in frames {
        let height = frame.height;
        store
            .append(frame)
            .with_context(|| format!("append frame at height {height}"))?;
        tracing::debug!(height, "frame appended");
        imported += 1;
    }

    let head = store.latest().map(|frame| frame.height);
    let data = if opts.wants_json() {
        json!({ "imported": imported, "head": head })
    } else {
        match head {
            Some(head) => Value::String(format!("imported {imported} frames (head {head})")),
            None => Value::String(format!("imported {imported} frames")),
        }
    };
    print_success(opts, data, None, vec![])
}
