//! Cache invalidation
//!
//! When a cell changes, every cached value downstream of it is dropped. The
//! walk covers the whole dependents closure: a cell that had nothing cached
//! does not end the walk, since cells past it may still hold stale values.

use gridcalc_core::Position;
use tracing::trace;

use crate::graph::DependencyGraph;
use crate::storage::CellStorage;

/// Drop the cached value of every cell that transitively depends on
/// `changed`. Returns how many caches were actually cleared.
pub(crate) fn invalidate_dependents(
    graph: &DependencyGraph,
    storage: &mut CellStorage,
    changed: Position,
) -> usize {
    let dependents = graph.dependents_closure(changed);

    let mut cleared = 0;
    for &pos in &dependents {
        if let Some(cell) = storage.get_mut(pos) {
            if cell.invalidate_cache() {
                cleared += 1;
            }
        }
    }

    trace!(
        cell = %changed,
        visited = dependents.len(),
        cleared,
        "invalidated dependents"
    );
    cleared
}
