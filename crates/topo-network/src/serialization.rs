use serde::{Deserialize, Serialize};
use topo_core::errors::{ErrorInfo, TopoError};
use topo_core::provenance::SchemaVersion;

use crate::network::{KineticTransitionNetwork, RawTransitionState};
use crate::similarity::SimilarityComparer;

/// Schema written into every snapshot.
pub const NETWORK_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the network to a compact binary snapshot using `bincode`.
pub fn network_to_bytes(network: &KineticTransitionNetwork) -> Result<Vec<u8>, TopoError> {
    let serializable = SerializableNetwork::from_network(network);
    bincode::serialize(&serializable)
        .map_err(|err| TopoError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a network from its binary snapshot.
pub fn network_from_bytes(bytes: &[u8]) -> Result<KineticTransitionNetwork, TopoError> {
    let serializable: SerializableNetwork = bincode::deserialize(bytes)
        .map_err(|err| TopoError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_network()
}

/// Serializes the network to a JSON snapshot.
pub fn network_to_json(network: &KineticTransitionNetwork) -> Result<String, TopoError> {
    let serializable = SerializableNetwork::from_network(network);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| TopoError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a network from a JSON snapshot.
pub fn network_from_json(json: &str) -> Result<KineticTransitionNetwork, TopoError> {
    let serializable: SerializableNetwork = serde_json::from_str(json)
        .map_err(|err| TopoError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_network()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableNetwork {
    schema_version: SchemaVersion,
    comparer: SimilarityComparer,
    minima: Vec<SerializableMinimum>,
    transition_states: Vec<SerializableTransitionState>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableMinimum {
    point: Vec<f64>,
    value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableTransitionState {
    point: Vec<f64>,
    value: f64,
    eigenvector: Vec<f64>,
    minima: (u64, u64),
}

impl SerializableNetwork {
    fn from_network(network: &KineticTransitionNetwork) -> Self {
        Self {
            schema_version: NETWORK_SCHEMA,
            comparer: network.comparer().clone(),
            minima: network
                .minima()
                .iter()
                .map(|m| SerializableMinimum {
                    point: m.point.clone(),
                    value: m.value,
                })
                .collect(),
            transition_states: network
                .transition_states()
                .iter()
                .map(|ts| SerializableTransitionState {
                    point: ts.point.clone(),
                    value: ts.value,
                    eigenvector: ts.eigenvector.clone(),
                    minima: (ts.minima.0.as_raw(), ts.minima.1.as_raw()),
                })
                .collect(),
        }
    }

    fn into_network(self) -> Result<KineticTransitionNetwork, TopoError> {
        if !NETWORK_SCHEMA.is_compatible(&self.schema_version) {
            return Err(TopoError::Serde(
                ErrorInfo::new("schema-mismatch", "snapshot schema is not supported")
                    .with_context(
                        "found",
                        format!(
                            "{}.{}.{}",
                            self.schema_version.major,
                            self.schema_version.minor,
                            self.schema_version.patch
                        ),
                    )
                    .with_context("supported_major", NETWORK_SCHEMA.major.to_string()),
            ));
        }
        let minima = self.minima.into_iter().map(|m| (m.point, m.value)).collect();
        let transition_states = self
            .transition_states
            .into_iter()
            .map(|ts| RawTransitionState {
                point: ts.point,
                value: ts.value,
                eigenvector: ts.eigenvector,
                minima: ts.minima,
            })
            .collect();
        KineticTransitionNetwork::restore(self.comparer, minima, transition_states)
    }
}
