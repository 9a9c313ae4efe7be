//! `xln-inspect jmachines` command.

use anyhow::Result;
use clap::Args;
use serde_json::{Value, json};
use xln_frames::JMachineSnapshot;
use xln_inspect::{normalize, resolve_view};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

use super::{AtArgs, NO_FRAMES, load_history, view_meta};

#[derive(Args, Debug)]
pub struct JMachinesArgs {
    #[command(flatten)]
    pub at: AtArgs,
}

pub fn cmd_jmachines(
    opts: &InspectOpts,
    config: &InspectConfig,
    args: &JMachinesArgs,
) -> Result<()> {
    let history = load_history(config)?;
    let view = resolve_view(args.at.at, &history, history.last());
    let Some(frame) = view.frame() else {
        return print_empty(opts, NO_FRAMES, None);
    };
    let meta = Some(view_meta(&view));

    let machines: Vec<(String, JMachineSnapshot)> = normalize(frame.j_machines.as_ref());
    if machines.is_empty() {
        return print_empty(opts, "no jurisdiction machines in frame", meta);
    }

    let data = if opts.wants_json() {
        Value::Array(
            machines
                .iter()
                .map(|(name, machine)| {
                    json!({
                        "name": name,
                        "chainId": machine.chain_id,
                        "blockNumber": machine.block_number,
                        "entities": machine.entities.len(),
                    })
                })
                .collect(),
        )
    } else {
        let lines: Vec<String> = machines
            .iter()
            .map(|(name, machine)| {
                let chain = machine
                    .chain_id
                    .map_or_else(|| "-".to_string(), |id| id.to_string());
                format!(
                    "{name}  chain {chain}  block {}  entities {}",
                    machine.block_number,
                    machine.entities.len()
                )
            })
            .collect();
        Value::String(lines.join("\n"))
    };
    print_success(opts, data, meta, vec![])
}
