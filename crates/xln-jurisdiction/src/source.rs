use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use xln_frames::Amount;

/// Coverage an insurer has committed to an entity for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceLine {
    pub insurer: String,
    pub token_id: u64,
    pub remaining: Amount,
    /// Unix seconds.
    pub expires_at: Amount,
}

impl InsuranceLine {
    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.expires_at
            .to_u64()
            .is_some_and(|deadline| deadline <= now_secs)
    }
}

/// Reads insurance lines for an entity from jurisdiction state.
#[async_trait]
pub trait InsuranceSource: Send + Sync {
    async fn insurance_lines(&self, entity_id: &str) -> anyhow::Result<Vec<InsuranceLine>>;
}

/// A jurisdiction as seen by the panels.
pub trait Jurisdiction: Send + Sync {
    fn name(&self) -> &str;

    /// `None` when this jurisdiction does not expose insurance at all. That
    /// is a feature gap, not a failure.
    fn insurance(&self) -> Option<Arc<dyn InsuranceSource>>;
}

/// Fixed in-memory lines keyed by entity id. Unknown entities have no lines.
#[derive(Debug, Clone, Default)]
pub struct StaticInsurance {
    lines: HashMap<String, Vec<InsuranceLine>>,
}

impl StaticInsurance {
    pub fn new(lines: HashMap<String, Vec<InsuranceLine>>) -> Self {
        Self { lines }
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, lines: Vec<InsuranceLine>) {
        self.lines.insert(entity_id.into(), lines);
    }
}

#[async_trait]
impl InsuranceSource for StaticInsurance {
    async fn insurance_lines(&self, entity_id: &str) -> anyhow::Result<Vec<InsuranceLine>> {
        Ok(self.lines.get(entity_id).cloned().unwrap_or_default())
    }
}
