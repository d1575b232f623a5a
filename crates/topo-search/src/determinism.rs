use topo_core::{derive_substream_seed, RngHandle};

/// Seed of the basin-hopping walk in exploration cycle `cycle`.
pub fn basin_hopping_seed(master_seed: u64, cycle: usize) -> u64 {
    derive_substream_seed(master_seed, cycle as u64)
}

/// Random stream of the basin-hopping walk in exploration cycle `cycle`.
pub fn basin_hopping_rng(master_seed: u64, cycle: usize) -> RngHandle {
    RngHandle::substream(master_seed, cycle as u64)
}
