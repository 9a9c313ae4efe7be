//! CLI command handlers.

pub mod frame;
pub mod head;
pub mod import;
pub mod insurance;
pub mod jmachines;
pub mod logs;
pub mod replicas;
pub mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Value, json};
use xln_frames::{Frame, FrameSource, FsFrameStore};
use xln_inspect::TimeView;

use crate::config::InspectConfig;

pub const NO_FRAMES: &str = "no frames";

/// Time-travel selector shared by the frame-scoped commands.
#[derive(Args, Debug, Clone, Default)]
pub struct AtArgs {
    /// History index to view (past the end clamps to the last frame,
    /// negative follows live); omit to follow the live head
    #[arg(long, allow_negative_numbers = true)]
    pub at: Option<i64>,
}

/// Full history, oldest first. A store that was never written is empty.
pub fn load_history(config: &InspectConfig) -> Result<Vec<Arc<Frame>>> {
    let store = FsFrameStore::open_existing(&config.store_root)
        .with_context(|| format!("open frame store at {}", config.store_root.display()))?;
    Ok(store.history())
}

pub fn view_meta(view: &TimeView<'_, Arc<Frame>>) -> Value {
    let index = match view {
        TimeView::Historical { index, .. } => Some(*index),
        _ => None,
    };
    json!({
        "view": view.label(),
        "live": view.is_live(),
        "index": index,
        "height": view.frame().map(|frame| frame.height),
    })
}
