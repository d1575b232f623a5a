use rayon::prelude::*;
use topo_core::errors::{ErrorInfo, TopoError};

/// Applies `task` to every item, serially or on a dedicated pool, and
/// returns the results in item order.
///
/// Tasks are independent; the caller merges the ordered results, so the
/// outcome does not depend on scheduling.
pub fn map_ordered<T, R, F>(
    items: &[T],
    multiprocessing: bool,
    n_processes: usize,
    task: F,
) -> Result<Vec<R>, TopoError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if !multiprocessing || items.len() < 2 {
        return Ok(items.iter().map(&task).collect());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_processes.max(1))
        .build()
        .map_err(|err| {
            TopoError::Config(
                ErrorInfo::new("thread-pool", err.to_string())
                    .with_context("n_processes", n_processes.to_string()),
            )
        })?;

    let mut ordered: Vec<(usize, R)> = pool.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(index, item)| (index, task(item)))
            .collect()
    });
    ordered.sort_by_key(|(index, _)| *index);
    Ok(ordered.into_iter().map(|(_, result)| result).collect())
}
