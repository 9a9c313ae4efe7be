//! `xln-inspect head` command.

use anyhow::Result;
use serde_json::{Value, json};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

use super::{NO_FRAMES, load_history};

pub fn cmd_head(opts: &InspectOpts, config: &InspectConfig) -> Result<()> {
    let history = load_history(config)?;
    let Some(head) = history.last() else {
        return print_empty(opts, NO_FRAMES, None);
    };

    let data = if opts.wants_json() {
        json!({
            "height": head.height,
            "timestamp": head.timestamp,
            "frames": history.len(),
        })
    } else {
        Value::String(format!("height {} ({} frames)", head.height, history.len()))
    };
    print_success(opts, data, None, vec![])
}
