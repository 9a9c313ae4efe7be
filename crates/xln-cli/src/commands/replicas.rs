//! `xln-inspect replicas` command.

use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value, json};
use xln_frames::{AccountState, Amount, ReplicaState};
use xln_inspect::format::{format_amount, format_replica_key};
use xln_inspect::{entity_ids, normalize, replicas_for_entity, resolve_view, split_replica_key};

use crate::config::InspectConfig;
use crate::opts::InspectOpts;
use crate::output::{print_empty, print_success};

use super::{AtArgs, NO_FRAMES, load_history, view_meta};

#[derive(Args, Debug)]
pub struct ReplicasArgs {
    #[command(flatten)]
    pub at: AtArgs,

    /// Only replicas of this entity
    #[arg(long)]
    pub entity: Option<String>,

    /// Token decimals used to render reserves
    #[arg(long, default_value_t = 18)]
    pub decimals: u8,
}

pub fn cmd_replicas(opts: &InspectOpts, config: &InspectConfig, args: &ReplicasArgs) -> Result<()> {
    let history = load_history(config)?;
    let view = resolve_view(args.at.at, &history, history.last());
    let Some(frame) = view.frame() else {
        return print_empty(opts, NO_FRAMES, None);
    };

    let pairs: Vec<(String, ReplicaState)> = normalize(frame.replicas.as_ref());
    let mut meta = view_meta(&view);
    meta["entities"] = json!(entity_ids(&pairs));

    let shown: Vec<&(String, ReplicaState)> = match &args.entity {
        Some(entity_id) => replicas_for_entity(&pairs, entity_id),
        None => pairs.iter().collect(),
    };
    if shown.is_empty() {
        let message = match &args.entity {
            Some(entity_id) => format!("no replicas for entity {entity_id}"),
            None => "no replicas in frame".to_string(),
        };
        return print_empty(opts, &message, Some(meta));
    }

    let data = if opts.wants_json() {
        Value::Array(shown.iter().map(|(key, state)| replica_json(key, state)).collect())
    } else {
        let lines: Vec<String> = shown
            .iter()
            .map(|(key, state)| replica_line(key, state, args.decimals))
            .collect();
        Value::String(lines.join("\n"))
    };
    print_success(opts, data, Some(meta), vec![])
}

fn replica_json(key: &str, state: &ReplicaState) -> Value {
    let parts = split_replica_key(key);
    let reserves: Map<String, Value> = normalize(Some(&state.reserves))
        .into_iter()
        .map(|(token, amount): (String, Amount)| (token, Value::String(amount.as_str().to_string())))
        .collect();
    let accounts: Vec<(String, AccountState)> = normalize(Some(&state.accounts));
    json!({
        "key": key,
        "entityId": parts.entity_id,
        "signerId": parts.signer_id,
        "height": state.height,
        "reserves": reserves,
        "accounts": accounts.iter().map(|(counterparty, _)| counterparty).collect::<Vec<_>>(),
    })
}

fn replica_line(key: &str, state: &ReplicaState, decimals: u8) -> String {
    let reserves: Vec<String> = normalize(Some(&state.reserves))
        .iter()
        .map(|(token, amount): &(String, Amount)| format!("{token}={}", format_amount(amount, decimals)))
        .collect();
    let accounts: Vec<(String, AccountState)> = normalize(Some(&state.accounts));
    let reserves = if reserves.is_empty() {
        "-".to_string()
    } else {
        reserves.join(",")
    };
    format!(
        "{}  height {}  accounts {}  reserves {reserves}",
        format_replica_key(key),
        state.height,
        accounts.len()
    )
}
