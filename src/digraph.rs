//! A small directed graph with cycle detection.
//!
//! Used for the derivation-dependency graphs the grammar classifiers build
//! over nonterminals.

use std::collections::HashMap;
use std::hash::Hash;

/// A directed graph stored as an adjacency map.
#[derive(Debug, Clone, Default)]
pub struct Digraph<V: Eq + Hash + Clone> {
    edges: HashMap<V, Vec<V>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Colour {
    Visiting,
    Done,
}

impl<V: Eq + Hash + Clone> Digraph<V> {
    pub fn new() -> Self {
        Digraph { edges: HashMap::new() }
    }

    /// Adds a vertex, doing nothing if it is already present.
    pub fn add_vertex(&mut self, v: V) {
        self.edges.entry(v).or_default();
    }

    /// Adds an edge, implicitly adding vertices not already in the graph.
    /// Parallel edges are not stored twice.
    pub fn add_edge(&mut self, s: V, t: V) {
        self.add_vertex(t.clone());
        let succ = self.edges.entry(s).or_default();
        if !succ.contains(&t) {
            succ.push(t);
        }
    }

    pub fn has_vertex(&self, v: &V) -> bool {
        self.edges.contains_key(v)
    }

    pub fn successors(&self, v: &V) -> &[V] {
        self.edges.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns whether the graph contains a cycle.
    ///
    /// Three-colour depth-first search started from every vertex, since the
    /// graph has no distinguished root.
    pub fn cyclic(&self) -> bool {
        let mut colours: HashMap<&V, Colour> = HashMap::new();
        for v in self.edges.keys() {
            if !colours.contains_key(v) {
                colours.insert(v, Colour::Visiting);
                if self.visit(v, &mut colours) {
                    return true;
                }
                colours.insert(v, Colour::Done);
            }
        }
        false
    }

    fn visit<'a>(&'a self, v: &'a V, colours: &mut HashMap<&'a V, Colour>) -> bool {
        for child in self.successors(v) {
            match colours.get(child) {
                Some(Colour::Visiting) => return true,
                Some(Colour::Done) => {}
                None => {
                    colours.insert(child, Colour::Visiting);
                    if self.visit(child, colours) {
                        return true;
                    }
                    colours.insert(child, Colour::Done);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acyclic_graph() {
        let mut g = Digraph::new();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(1, 3);
        assert!(!g.cyclic());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut g = Digraph::new();
        g.add_edge(1, 1);
        assert!(g.cyclic());
    }

    #[test]
    fn long_cycle_found_from_any_start() {
        let mut g = Digraph::new();
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        g.add_edge(3, 1);
        assert!(g.cyclic());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let mut g = Digraph::new();
        g.add_edge('a', 'b');
        g.add_edge('a', 'c');
        g.add_edge('b', 'd');
        g.add_edge('c', 'd');
        assert!(!g.cyclic());
    }
}
