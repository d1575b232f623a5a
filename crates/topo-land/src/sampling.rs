use serde::{Deserialize, Serialize};
use topo_core::errors::TopoError;
use topo_core::{LocalMinimizer, MinimumId, Potential, RngHandle};
use topo_network::{canonical_hash, KineticTransitionNetwork, SimilarityComparer};
use topo_search::{
    BasinHopping, BasinHoppingSummary, HybridEigenvectorFollowing, NudgedElasticBand,
    SearchFailure, TransitionStateSearch,
};

use crate::dispatch::map_ordered;
use crate::pairs::{candidate_pairs, PairStrategy};
use crate::report::{LandscapeReport, PairReport};

/// Pair selection and parallelism of landscape generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// How candidate pairs are chosen.
    #[serde(default)]
    pub strategy: PairStrategy,
    /// Run pair searches on a worker pool.
    #[serde(default)]
    pub multiprocessing: bool,
    /// Worker pool size.
    #[serde(default = "default_n_processes")]
    pub n_processes: usize,
}

fn default_n_processes() -> usize {
    4
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            strategy: PairStrategy::default(),
            multiprocessing: false,
            n_processes: default_n_processes(),
        }
    }
}

struct PairJob {
    a: MinimumId,
    b: MinimumId,
    start: Vec<f64>,
    end: Vec<f64>,
}

struct PairOutcome {
    neb_converged: bool,
    band_error: Option<String>,
    searches: Vec<Result<TransitionStateSearch, SearchFailure>>,
}

/// Drives global optimisation and landscape generation over one surface.
///
/// Pair searches only read the potential and copies of their endpoints; the
/// network is written by the caller's thread alone, after every search of the
/// batch has finished, in candidate order.
pub struct NetworkSampling<'a> {
    potential: &'a dyn Potential,
    minimizer: &'a dyn LocalMinimizer,
    basin_hopping: BasinHopping,
    neb: NudgedElasticBand,
    hef: HybridEigenvectorFollowing,
    config: SamplingConfig,
}

impl<'a> NetworkSampling<'a> {
    /// Assembles the sampler from validated search components.
    pub fn new(
        potential: &'a dyn Potential,
        minimizer: &'a dyn LocalMinimizer,
        basin_hopping: BasinHopping,
        neb: NudgedElasticBand,
        hef: HybridEigenvectorFollowing,
        config: SamplingConfig,
    ) -> Self {
        Self {
            potential,
            minimizer,
            basin_hopping,
            neb,
            hef,
            config,
        }
    }

    /// Returns the sampling configuration.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Basin hopping from `start` (default: domain centre) into `network`.
    pub fn global_optimisation(
        &self,
        network: &mut KineticTransitionNetwork,
        start: Option<&[f64]>,
        rng: &mut RngHandle,
    ) -> Result<BasinHoppingSummary, TopoError> {
        self.check_network(network)?;
        self.basin_hopping
            .run(network, self.potential, self.minimizer, start, rng)
    }

    /// Searches every candidate pair for transition states and merges them.
    ///
    /// Each pair is relaxed with the elastic band; every interior maximum of
    /// the band seeds a saddle search. Converged saddles and the minima on
    /// either side are inserted with deduplication. Failed bands and saddle
    /// searches are counted per pair, never fatal.
    pub fn generate_landscape(
        &self,
        network: &mut KineticTransitionNetwork,
        strategy: &PairStrategy,
    ) -> Result<LandscapeReport, TopoError> {
        self.check_network(network)?;
        let minima_before = network.n_minima();
        let transition_states_before = network.n_transition_states();

        let jobs = candidate_pairs(network, strategy)?
            .into_iter()
            .map(|(a, b)| -> Result<PairJob, TopoError> {
                Ok(PairJob {
                    a,
                    b,
                    start: network.minimum(a)?.point.clone(),
                    end: network.minimum(b)?.point.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "landscape pass over {} pairs ({} minima, {} transition states)",
            jobs.len(),
            minima_before,
            transition_states_before
        );

        let comparer = network.comparer().clone();
        let outcomes = map_ordered(
            &jobs,
            self.config.multiprocessing,
            self.config.n_processes,
            |job| self.search_pair(&comparer, job),
        )?;

        let mut report = LandscapeReport {
            minima_before,
            transition_states_before,
            ..LandscapeReport::default()
        };
        for (job, outcome) in jobs.iter().zip(outcomes) {
            let mut pair = PairReport {
                a: job.a,
                b: job.b,
                neb_converged: outcome.neb_converged,
                band_error: outcome.band_error,
                seeds: outcome.searches.len(),
                saddles: 0,
            };
            if let Some(code) = &pair.band_error {
                *report.failures.entry(code.clone()).or_default() += 1;
            }
            for search in outcome.searches {
                match search {
                    Ok(ts) => {
                        pair.saddles += 1;
                        let minus = network.add_minimum(&ts.minus.point, ts.minus.value)?;
                        let plus = network.add_minimum(&ts.plus.point, ts.plus.value)?;
                        let inserted = network.add_transition_state(
                            &ts.point,
                            ts.value,
                            &ts.eigenvector,
                            minus,
                            plus,
                        )?;
                        report.insertions.record(&inserted);
                    }
                    Err(failure) => {
                        *report.failures.entry(failure.kind().to_string()).or_default() += 1;
                    }
                }
            }
            report.pairs.push(pair);
        }

        report.minima_after = network.n_minima();
        report.transition_states_after = network.n_transition_states();
        report.network_hash = canonical_hash(network);
        log::info!(
            "landscape pass done: {} searches, {} failed, {} new edges, {} -> {} minima",
            report.searches(),
            report.failed(),
            report.insertions.inserted,
            report.minima_before,
            report.minima_after
        );
        Ok(report)
    }

    fn search_pair(&self, comparer: &SimilarityComparer, job: &PairJob) -> PairOutcome {
        let band = match self.neb.run(self.potential, &job.start, &job.end) {
            Ok(band) => band,
            Err(err) => {
                log::debug!("pair ({}, {}): band failed: {err}", job.a.as_raw(), job.b.as_raw());
                return PairOutcome {
                    neb_converged: false,
                    band_error: Some(err.info().code.clone()),
                    searches: Vec::new(),
                };
            }
        };
        log::debug!(
            "pair ({}, {}): band converged {} after {} iterations",
            job.a.as_raw(),
            job.b.as_raw(),
            band.converged,
            band.iterations
        );
        let searches = band
            .path_maxima()
            .iter()
            .map(|seed| {
                self.hef
                    .run(self.potential, self.minimizer, comparer, seed)
            })
            .collect();
        PairOutcome {
            neb_converged: band.converged,
            band_error: None,
            searches,
        }
    }

    fn check_network(&self, network: &KineticTransitionNetwork) -> Result<(), TopoError> {
        let expected = self.potential.dimension();
        if network.dimension() != expected {
            return Err(TopoError::dimension_mismatch(expected, network.dimension()));
        }
        Ok(())
    }
}
