// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The context-sensitive call graph, incrementally built as the solver
//! marks methods reachable (spec §4.8), plus a projection that collapses
//! contexts into a context-insensitive view.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use petgraph::graph::{DefaultIx, EdgeIndex, NodeIndex};
use petgraph::Graph;

use crate::elements::{CSCallSiteId, CSMethodId};
use crate::util::chunked_queue::ChunkedQueue;

pub type CgNodeId = NodeIndex<DefaultIx>;
pub type CgEdgeId = EdgeIndex<DefaultIx>;

/// How a call edge was resolved (spec §3 `CallEdge`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CallKind {
    Static,
    Virtual,
    Special,
    Interface,
    Other,
}

#[derive(Debug)]
struct CgNode {
    method: CSMethodId,
}

#[derive(Debug)]
struct CgEdge {
    call_site: CSCallSiteId,
    kind: CallKind,
}

/// The context-sensitive call graph: nodes are reachable `CSMethod`s, edges
/// are `CallEdge`s (spec §4.8).
pub struct CsCallGraph {
    graph: Graph<CgNode, CgEdge>,
    method_nodes: HashMap<CSMethodId, CgNodeId>,
    call_site_edges: HashMap<CSCallSiteId, HashSet<CgEdgeId>>,
    reachable: ChunkedQueue<CSMethodId>,
}

impl Default for CsCallGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CsCallGraph {
    pub fn new() -> Self {
        CsCallGraph {
            graph: Graph::new(),
            method_nodes: HashMap::new(),
            call_site_edges: HashMap::new(),
            reachable: ChunkedQueue::new(),
        }
    }

    /// Marks `method` reachable if it is not already; returns whether this
    /// was the first time (spec §4.6 `markReachable`: "first-time only").
    pub fn add_reachable(&mut self, method: CSMethodId) -> bool {
        match self.method_nodes.entry(method) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                let node_id = self.graph.add_node(CgNode { method });
                v.insert(node_id);
                self.reachable.push(method);
                true
            }
        }
    }

    pub fn is_reachable(&self, method: CSMethodId) -> bool {
        self.method_nodes.contains_key(&method)
    }

    fn get_or_insert_node(&mut self, method: CSMethodId) -> CgNodeId {
        match self.method_nodes.entry(method) {
            Entry::Occupied(o) => *o.get(),
            Entry::Vacant(v) => {
                self.reachable.push(method);
                let node_id = self.graph.add_node(CgNode { method });
                *v.insert(node_id)
            }
        }
    }

    pub fn callees(&self, call_site: CSCallSiteId) -> HashSet<CSMethodId> {
        self.call_site_edges
            .get(&call_site)
            .into_iter()
            .flatten()
            .filter_map(|edge_id| self.graph.edge_endpoints(*edge_id))
            .map(|(_, callee)| self.graph[callee].method)
            .collect()
    }

    pub fn has_edge(&self, call_site: CSCallSiteId, callee: CSMethodId) -> bool {
        self.callees(call_site).contains(&callee)
    }

    /// Adds a call edge `caller --call_site--> callee` of `kind`. Call
    /// edges are idempotent (spec §3): returns `false` if it already
    /// existed.
    pub fn add_edge(&mut self, call_site: CSCallSiteId, caller: CSMethodId, callee: CSMethodId, kind: CallKind) -> bool {
        if self.has_edge(call_site, callee) {
            return false;
        }
        let caller_node = self.get_or_insert_node(caller);
        let callee_node = self.get_or_insert_node(callee);
        let edge_id = self.graph.add_edge(caller_node, callee_node, CgEdge { call_site, kind });
        self.call_site_edges.entry(call_site).or_default().insert(edge_id);
        true
    }

    pub fn reachable_methods(&self) -> impl Iterator<Item = CSMethodId> + '_ {
        self.reachable.iter().copied()
    }

    pub fn num_reachable_methods(&self) -> usize {
        self.reachable.len()
    }

    /// All `(caller, call_site, callee, kind)` tuples, for result surfacing
    /// and dump (spec §4.8, §6).
    pub fn edges(&self) -> impl Iterator<Item = (CSMethodId, CSCallSiteId, CSMethodId, CallKind)> + '_ {
        self.graph.edge_indices().filter_map(move |edge_id| {
            let (caller, callee) = self.graph.edge_endpoints(edge_id)?;
            let edge = &self.graph[edge_id];
            Some((self.graph[caller].method, edge.call_site, self.graph[callee].method, edge.kind))
        })
    }

    /// Collapses this graph into a context-insensitive projection keyed by
    /// `project`, typically "the underlying uncontextualized method"
    /// (spec §4.8). Edge multiplicities collapse; only distinct
    /// `(caller, callee)` pairs survive.
    pub fn to_context_insensitive<K: Eq + std::hash::Hash + Clone>(
        &self,
        project: impl Fn(CSMethodId) -> K,
    ) -> HashSet<(K, K)> {
        let mut out = HashSet::new();
        for (caller, _, callee, _) in self.edges() {
            out.insert((project(caller), project(callee)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::bit_vec::Idx;

    fn m(i: usize) -> CSMethodId {
        CSMethodId::new(i)
    }

    fn cs(i: usize) -> CSCallSiteId {
        CSCallSiteId::new(i)
    }

    #[test]
    fn adding_the_same_edge_twice_is_idempotent() {
        let mut cg = CsCallGraph::new();
        assert!(cg.add_edge(cs(0), m(0), m(1), CallKind::Virtual));
        assert!(!cg.add_edge(cs(0), m(0), m(1), CallKind::Virtual));
        assert_eq!(cg.callees(cs(0)).len(), 1);
    }

    #[test]
    fn reachable_methods_are_recorded_once() {
        let mut cg = CsCallGraph::new();
        assert!(cg.add_reachable(m(0)));
        assert!(!cg.add_reachable(m(0)));
        assert_eq!(cg.num_reachable_methods(), 1);
    }

    #[test]
    fn context_insensitive_projection_collapses_contexts() {
        let mut cg = CsCallGraph::new();
        cg.add_edge(cs(0), m(0), m(1), CallKind::Virtual);
        cg.add_edge(cs(1), m(2), m(1), CallKind::Virtual);
        // Two distinct CS callers/callees project onto the same underlying method.
        let projected = cg.to_context_insensitive(|_id| "same-method");
        assert_eq!(projected.len(), 1);
    }
}
