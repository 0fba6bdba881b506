//! Dependency tracking between cells
//!
//! Edges are keyed by [`Position`] rather than held by the cells, so a cell
//! slot can be freed while other formulas still reference its position.

use ahash::{AHashMap, AHashSet};
use gridcalc_core::Position;

/// Dependency graph for formula cells
///
/// For every formula cell, `precedents` holds the positions it reads and
/// `dependents` holds the reverse edges. The two maps always mirror each
/// other, and the graph never contains a cycle.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Cell → Cells that depend on it
    dependents: AHashMap<Position, AHashSet<Position>>,
    /// Cell → Cells it depends on
    precedents: AHashMap<Position, AHashSet<Position>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency: `dependent` reads `precedent`
    pub fn add_dependency(&mut self, precedent: Position, dependent: Position) {
        self.dependents
            .entry(precedent)
            .or_default()
            .insert(dependent);
        self.precedents
            .entry(dependent)
            .or_default()
            .insert(precedent);
    }

    /// Drop every edge from `cell` to the cells it reads.
    ///
    /// Edges from other cells into `cell` are kept.
    pub fn remove_precedents(&mut self, cell: Position) {
        if let Some(precedents) = self.precedents.remove(&cell) {
            for precedent in precedents {
                if let Some(deps) = self.dependents.get_mut(&precedent) {
                    deps.remove(&cell);
                    if deps.is_empty() {
                        self.dependents.remove(&precedent);
                    }
                }
            }
        }
    }

    /// Rewire `cell` so it reads exactly `precedents`
    pub fn replace_precedents(&mut self, cell: Position, precedents: &[Position]) {
        self.remove_precedents(cell);
        for &precedent in precedents {
            self.add_dependency(precedent, cell);
        }
    }

    /// Get cells that depend on the given cell
    pub fn dependents(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells that the given cell depends on
    pub fn precedents(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        self.precedents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Whether any formula reads `cell`
    pub fn is_referenced(&self, cell: Position) -> bool {
        self.dependents.contains_key(&cell)
    }

    /// Whether making `root` read `references` would close a cycle.
    ///
    /// Walks the existing precedents of each reference looking for `root`.
    /// A reference to `root` itself counts.
    pub fn would_create_cycle(&self, root: Position, references: &[Position]) -> bool {
        let mut visited = AHashSet::new();
        let mut stack = references.to_vec();

        while let Some(cell) = stack.pop() {
            if cell == root {
                return true;
            }
            if visited.insert(cell) {
                stack.extend(self.precedents(cell));
            }
        }

        false
    }

    /// Every cell that transitively depends on `cell`, excluding `cell`
    pub fn dependents_closure(&self, cell: Position) -> Vec<Position> {
        let mut seen = AHashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![cell];

        while let Some(current) = stack.pop() {
            for dependent in self.dependents(current) {
                if seen.insert(dependent) {
                    result.push(dependent);
                    stack.push(dependent);
                }
            }
        }

        result
    }

    /// Order in which to compute `cell` and its stale precedents so that
    /// every cell comes after everything it reads.
    ///
    /// Only cells for which `is_stale` holds are visited; the walk does not
    /// continue through a cell whose value is already known. Returns an
    /// empty list when `cell` itself is not stale.
    pub fn evaluation_order(
        &self,
        cell: Position,
        is_stale: impl Fn(Position) -> bool,
    ) -> Vec<Position> {
        let mut order = Vec::new();
        if !is_stale(cell) {
            return order;
        }

        let mut visited = AHashSet::new();
        // (cell, precedents already pushed)
        let mut stack = vec![(cell, false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.push((current, true));
            for precedent in self.precedents(current) {
                if !visited.contains(&precedent) && is_stale(precedent) {
                    stack.push((precedent, false));
                }
            }
        }

        order
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.precedents.values().map(|set| set.len()).sum()
    }

    /// Check that every edge is recorded in both directions
    pub fn is_consistent(&self) -> bool {
        let forward = self.precedents.iter().all(|(cell, precs)| {
            !precs.is_empty()
                && precs
                    .iter()
                    .all(|p| self.dependents.get(p).is_some_and(|d| d.contains(cell)))
        });
        let backward = self.dependents.iter().all(|(cell, deps)| {
            !deps.is_empty()
                && deps
                    .iter()
                    .all(|d| self.precedents.get(d).is_some_and(|p| p.contains(cell)))
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(a1: &str) -> Position {
        Position::from_a1(a1)
    }

    #[test]
    fn test_add_dependency() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(p("A1"), p("B1"));

        assert!(graph.dependents(p("A1")).any(|c| c == p("B1")));
        assert!(graph.precedents(p("B1")).any(|c| c == p("A1")));
        assert!(graph.is_referenced(p("A1")));
        assert!(!graph.is_referenced(p("B1")));
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_replace_precedents_keeps_incoming_edges() {
        let mut graph = DependencyGraph::new();
        // B1 = A1, C1 = B1
        graph.replace_precedents(p("B1"), &[p("A1")]);
        graph.replace_precedents(p("C1"), &[p("B1")]);

        // B1 = D1
        graph.replace_precedents(p("B1"), &[p("D1")]);

        assert!(!graph.is_referenced(p("A1")));
        assert!(graph.is_referenced(p("D1")));
        assert!(graph.is_referenced(p("B1")));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.is_consistent());

        graph.remove_precedents(p("B1"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.is_consistent());
    }

    #[test]
    fn test_would_create_cycle() {
        let mut graph = DependencyGraph::new();
        // B1 = A1, C1 = B1
        graph.replace_precedents(p("B1"), &[p("A1")]);
        graph.replace_precedents(p("C1"), &[p("B1")]);

        assert!(graph.would_create_cycle(p("A1"), &[p("C1")]));
        assert!(graph.would_create_cycle(p("A1"), &[p("Z9"), p("B1")]));
        assert!(graph.would_create_cycle(p("A1"), &[p("A1")]));
        assert!(!graph.would_create_cycle(p("A1"), &[p("Z9")]));
        assert!(!graph.would_create_cycle(p("C1"), &[p("A1")]));
        assert!(!graph.would_create_cycle(p("A1"), &[]));
    }

    #[test]
    fn test_cycle_check_ignores_roots_old_edges() {
        let mut graph = DependencyGraph::new();
        // A1 = B1; now A1 = C1 where C1 reads nothing
        graph.replace_precedents(p("A1"), &[p("B1")]);
        assert!(!graph.would_create_cycle(p("A1"), &[p("C1")]));
        // B1 = A1 would close A1 -> B1 -> A1
        assert!(graph.would_create_cycle(p("B1"), &[p("A1")]));
    }

    #[test]
    fn test_dependents_closure_diamond() {
        let mut graph = DependencyGraph::new();
        // B1 = A1, C1 = A1, D1 = B1 + C1
        graph.replace_precedents(p("B1"), &[p("A1")]);
        graph.replace_precedents(p("C1"), &[p("A1")]);
        graph.replace_precedents(p("D1"), &[p("B1"), p("C1")]);

        let mut closure = graph.dependents_closure(p("A1"));
        closure.sort();
        assert_eq!(closure, vec![p("B1"), p("C1"), p("D1")]);
        assert!(graph.dependents_closure(p("D1")).is_empty());
    }

    #[test]
    fn test_evaluation_order_puts_precedents_first() {
        let mut graph = DependencyGraph::new();
        // B1 = A1, C1 = A1 + B1, D1 = C1
        graph.replace_precedents(p("B1"), &[p("A1")]);
        graph.replace_precedents(p("C1"), &[p("A1"), p("B1")]);
        graph.replace_precedents(p("D1"), &[p("C1")]);

        let order = graph.evaluation_order(p("D1"), |_| true);
        let index = |a1: &str| order.iter().position(|&c| c == p(a1)).unwrap();

        assert_eq!(order.len(), 4);
        assert!(index("A1") < index("B1"));
        assert!(index("B1") < index("C1"));
        assert!(index("C1") < index("D1"));
    }

    #[test]
    fn test_evaluation_order_stops_at_fresh_cells() {
        let mut graph = DependencyGraph::new();
        graph.replace_precedents(p("B1"), &[p("A1")]);
        graph.replace_precedents(p("C1"), &[p("B1")]);

        let order = graph.evaluation_order(p("C1"), |c| c != p("B1"));
        assert_eq!(order, vec![p("C1")]);
        assert!(graph.evaluation_order(p("C1"), |_| false).is_empty());
    }

    #[test]
    fn test_long_chain_is_iterative() {
        let mut graph = DependencyGraph::new();
        for row in 1..20_000 {
            graph.replace_precedents(Position::new(row, 0), &[Position::new(row - 1, 0)]);
        }
        assert_eq!(graph.dependents_closure(Position::new(0, 0)).len(), 19_999);
        assert_eq!(
            graph.evaluation_order(Position::new(19_999, 0), |_| true).len(),
            20_000
        );
        assert!(!graph.would_create_cycle(Position::new(19_999, 1), &[Position::new(19_999, 0)]));
        assert!(graph.would_create_cycle(Position::new(0, 0), &[Position::new(19_999, 0)]));
    }
}
