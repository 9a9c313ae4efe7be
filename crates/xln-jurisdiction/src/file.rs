//! Jurisdiction backed by a JSON snapshot on disk:
//!
//! ```json
//! { "name": "arrakis", "insurance": { "<entityId>": [ { "insurer": "...", ... } ] } }
//! ```
//!
//! A document without an `insurance` key describes a jurisdiction that does
//! not support insurance.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::source::{InsuranceLine, InsuranceSource, Jurisdiction};

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    insurance: Option<HashMap<String, Vec<InsuranceLine>>>,
}

#[derive(Debug, Clone)]
pub struct FileJurisdiction {
    name: String,
    source: Option<Arc<FileInsuranceSource>>,
}

impl FileJurisdiction {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read(path)
            .with_context(|| format!("read jurisdiction file {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_slice(&raw)
            .with_context(|| format!("decode jurisdiction file {}", path.display()))?;
        let name = snapshot.name.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "jurisdiction".to_string())
        });
        let source = snapshot.insurance.map(|_| {
            Arc::new(FileInsuranceSource {
                path: path.to_path_buf(),
            })
        });
        Ok(Self { name, source })
    }
}

impl Jurisdiction for FileJurisdiction {
    fn name(&self) -> &str {
        &self.name
    }

    fn insurance(&self) -> Option<Arc<dyn InsuranceSource>> {
        self.source
            .clone()
            .map(|source| source as Arc<dyn InsuranceSource>)
    }
}

/// Re-reads the snapshot on every request so edits show up on refresh.
#[derive(Debug, Clone)]
pub struct FileInsuranceSource {
    path: PathBuf,
}

#[async_trait]
impl InsuranceSource for FileInsuranceSource {
    async fn insurance_lines(&self, entity_id: &str) -> Result<Vec<InsuranceLine>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("read jurisdiction file {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_slice(&raw)
            .with_context(|| format!("decode jurisdiction file {}", self.path.display()))?;
        let mut insurance = snapshot.insurance.unwrap_or_default();
        Ok(insurance.remove(entity_id).unwrap_or_default())
    }
}
