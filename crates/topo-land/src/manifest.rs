use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use topo_core::errors::TopoError;
use topo_core::RunProvenance;
use topo_network::NetworkSummary;

use crate::plan::Plan;
use crate::serde::{read_json, write_canonical_json};

/// Record of a completed exploration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// Plan that drove the run.
    pub plan: Plan,
    /// Hashes, seed and timestamp.
    pub provenance: RunProvenance,
    /// Network statistics at the end of the run.
    pub summary: NetworkSummary,
    /// Names of the network files, relative to the run directory.
    pub network_files: Vec<String>,
}

impl RunManifest {
    /// Stamps a manifest for `plan` with the current time.
    pub fn new(
        plan: &Plan,
        potential: &str,
        network_hash: String,
        summary: NetworkSummary,
        network_files: Vec<String>,
    ) -> Result<Self, TopoError> {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert("topo-land".to_string(), env!("CARGO_PKG_VERSION").to_string());
        Ok(Self {
            plan: plan.clone(),
            provenance: RunProvenance {
                plan_hash: plan.plan_hash()?,
                network_hash,
                potential: potential.to_string(),
                seed: plan.seed,
                created_at: Utc::now().to_rfc3339(),
                tool_versions,
            },
            summary,
            network_files,
        })
    }

    /// Writes the manifest as canonical JSON.
    pub fn write(&self, path: &Path) -> Result<(), TopoError> {
        write_canonical_json(path, self)
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, TopoError> {
        read_json(path)
    }
}
