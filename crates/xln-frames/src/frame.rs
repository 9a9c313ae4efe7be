//! Per-step snapshots produced by the runtime.
//!
//! Field names follow the runtime's JSON export (camelCase). Everything a panel
//! might render is optional or defaulted so that older exports still load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::Amount;
use crate::collection::KeyedCollection;
use crate::logs::LogEntry;
use crate::store::Height;

/// One immutable snapshot of the whole system after a runtime step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub height: Height,
    /// Wall-clock creation time in milliseconds. Informational only.
    #[serde(default)]
    pub timestamp: u64,
    /// Keyed by `"<entityId>:<signerId>"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<KeyedCollection<ReplicaState>>,
    #[serde(
        default,
        rename = "jMachines",
        alias = "xlnomies",
        skip_serializing_if = "Option::is_none"
    )]
    pub j_machines: Option<KeyedCollection<JMachineSnapshot>>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_input: Option<RuntimeInput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_outputs: Vec<RuntimeOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gossip: Option<GossipSnapshot>,
}

impl Frame {
    pub fn new(height: Height, timestamp: u64) -> Self {
        Self {
            height,
            timestamp,
            replicas: None,
            j_machines: None,
            logs: Vec::new(),
            runtime_input: None,
            runtime_outputs: Vec::new(),
            gossip: None,
        }
    }

    pub fn with_log(mut self, entry: LogEntry) -> Self {
        self.logs.push(entry);
        self
    }

    pub fn with_replica(mut self, key: impl Into<String>, state: ReplicaState) -> Self {
        insert_entry(&mut self.replicas, key.into(), state);
        self
    }

    pub fn with_j_machine(mut self, name: impl Into<String>, snapshot: JMachineSnapshot) -> Self {
        insert_entry(&mut self.j_machines, name.into(), snapshot);
        self
    }
}

fn insert_entry<V: Serialize>(slot: &mut Option<KeyedCollection<V>>, key: String, value: V) {
    match slot.get_or_insert_with(KeyedCollection::empty) {
        KeyedCollection::Map(map) => {
            map.insert(key, value);
        }
        KeyedCollection::Pairs(pairs) => pairs.push((key, value)),
        KeyedCollection::Object(object) => {
            if let Ok(encoded) = serde_json::to_value(value) {
                object.insert(key, encoded);
            }
        }
    }
}

/// State of one entity as seen by one of its signers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaState {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub signer_id: String,
    #[serde(default)]
    pub height: u64,
    /// Reserve balances keyed by token id.
    #[serde(default)]
    pub reserves: KeyedCollection<Amount>,
    /// Bilateral accounts keyed by counterparty entity id.
    #[serde(default)]
    pub accounts: KeyedCollection<AccountState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mempool: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insurance_lines: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debts: Vec<Value>,
}

impl ReplicaState {
    pub fn new(entity_id: impl Into<String>, signer_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            signer_id: signer_id.into(),
            ..Self::default()
        }
    }
}

/// Bilateral account between the owning entity and one counterparty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    #[serde(default)]
    pub counterparty_id: String,
    #[serde(default)]
    pub height: u64,
    /// Per-token deltas keyed by token id.
    #[serde(default)]
    pub deltas: KeyedCollection<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mempool: Vec<Value>,
}

/// Jurisdiction chain state mirrored into a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JMachineSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub block_number: u64,
    /// Entities registered on chain, as exported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Value>,
}

/// Commands consumed by the step that produced a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_txs: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_inputs: Vec<Value>,
}

/// Command emitted by a step; the shape is owned by the runtime.
pub type RuntimeOutput = Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GossipSnapshot {
    #[serde(default)]
    pub profiles: Vec<GossipProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GossipProfile {
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hubs: Vec<String>,
}
