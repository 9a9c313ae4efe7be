//! `xln-inspect frame` command.

use anyhow::Result;
use clap::Args;
use serde_json::Value;
use xln_frames::{JMachineSnapshot, ReplicaState};
use xln_inspect::{normalize, resolve_view};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

use super::{AtArgs, NO_FRAMES, load_history, view_meta};

#[derive(Args, Debug)]
pub struct FrameArgs {
    #[command(flatten)]
    pub at: AtArgs,
}

pub fn cmd_frame(opts: &InspectOpts, config: &InspectConfig, args: &FrameArgs) -> Result<()> {
    let history = load_history(config)?;
    let view = resolve_view(args.at.at, &history, history.last());
    let Some(frame) = view.frame() else {
        return print_empty(opts, NO_FRAMES, None);
    };
    let meta = Some(view_meta(&view));

    if opts.wants_json() {
        return print_success(opts, serde_json::to_value(&**frame)?, meta, vec![]);
    }

    let replicas: Vec<(String, ReplicaState)> = normalize(frame.replicas.as_ref());
    let j_machines: Vec<(String, JMachineSnapshot)> = normalize(frame.j_machines.as_ref());
    let lines = [
        view.label(),
        format!("timestamp: {}", frame.timestamp),
        format!("replicas: {}", replicas.len()),
        format!("jmachines: {}", j_machines.len()),
        format!("logs: {}", frame.logs.len()),
        format!("runtime outputs: {}", frame.runtime_outputs.len()),
    ];
    print_success(opts, Value::String(lines.join("\n")), meta, vec![])
}
