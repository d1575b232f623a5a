use sha2::{Digest, Sha256};

use crate::network::KineticTransitionNetwork;

/// Resolution used when quantising floats before hashing.
pub const HASH_QUANTUM: f64 = 1e-9;

/// Computes the canonical structural hash of a network.
///
/// Covers the comparer thresholds, every minimum and transition state in id
/// order (values and coordinates quantised to [`HASH_QUANTUM`]) and the
/// sorted edge list. Eigenvectors are excluded since their sign is arbitrary.
pub fn canonical_hash(network: &KineticTransitionNetwork) -> String {
    let mut hasher = Sha256::new();
    let comparer = network.comparer();
    hasher.update((comparer.dimension() as u64).to_le_bytes());
    update_float(comparer.distance_criterion(), &mut hasher);
    update_float(comparer.energy_criterion(), &mut hasher);

    hasher.update(b"minima");
    hasher.update((network.n_minima() as u64).to_le_bytes());
    for minimum in network.minima() {
        update_float(minimum.value, &mut hasher);
        update_slice(&minimum.point, &mut hasher);
    }

    hasher.update(b"transition-states");
    hasher.update((network.n_transition_states() as u64).to_le_bytes());
    for ts in network.transition_states() {
        update_float(ts.value, &mut hasher);
        update_slice(&ts.point, &mut hasher);
        hasher.update(ts.minima.0.as_raw().to_le_bytes());
        hasher.update(ts.minima.1.as_raw().to_le_bytes());
    }

    hasher.update(b"edges");
    for (a, b, ts) in network.edges() {
        hasher.update(a.as_raw().to_le_bytes());
        hasher.update(b.as_raw().to_le_bytes());
        hasher.update(ts.as_raw().to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}

fn update_float(value: f64, hasher: &mut Sha256) {
    let quantised = (value / HASH_QUANTUM).round() as i64;
    hasher.update(quantised.to_le_bytes());
}

fn update_slice(values: &[f64], hasher: &mut Sha256) {
    hasher.update((values.len() as u64).to_le_bytes());
    for value in values {
        update_float(*value, hasher);
    }
}
