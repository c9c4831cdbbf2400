// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The queryable result surface (spec §4.8): read-only views over every
//! pointer class, reachable methods, call edges, and plug-in-populated
//! named sub-results. Built once by [`crate::solver::Solver::into_result`]
//! after the worklist reaches a fixed point.

use std::any::Any;
use std::collections::HashMap;

use crate::elements::{
    ArrayIndexId, CSCallSiteId, CSMethodId, CSObjId, CSVarId, ElementManager, InstanceFieldId, Pointer, StaticFieldId,
};
use crate::graph::call_graph::{CallKind, CsCallGraph};
use crate::graph::pfg::PointerFlowGraph;
use crate::ir::{IrProgram, JMethod, MethodOf};
use crate::pts_set::points_to::PointsToSet;
use crate::util::bit_vec::Idx;

/// The complete, read-only outcome of a solver run.
pub struct PtaResult<P: IrProgram> {
    elements: ElementManager<MethodOf<P>>,
    pfg: PointerFlowGraph<MethodOf<P>>,
    call_graph: CsCallGraph,
    named_results: HashMap<String, Box<dyn Any>>,
    /// Set when the run was cancelled before reaching a fixed point (spec
    /// §5 "the result contains partial... sets").
    incomplete: bool,
}

impl<P: IrProgram> PtaResult<P> {
    pub(crate) fn new(
        elements: ElementManager<MethodOf<P>>,
        pfg: PointerFlowGraph<MethodOf<P>>,
        call_graph: CsCallGraph,
        named_results: HashMap<String, Box<dyn Any>>,
        incomplete: bool,
    ) -> Self {
        PtaResult { elements, pfg, call_graph, named_results, incomplete }
    }

    pub fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    pub fn elements(&self) -> &ElementManager<MethodOf<P>> {
        &self.elements
    }

    pub fn call_graph(&self) -> &CsCallGraph {
        &self.call_graph
    }

    /// All interned CS-variables (spec §4.8 "all variables, CS-variables").
    pub fn cs_vars(&self) -> impl Iterator<Item = CSVarId> + '_ {
        (0..self.elements.num_vars()).map(CSVarId::new)
    }

    pub fn cs_objs(&self) -> impl Iterator<Item = CSObjId> + '_ {
        (0..self.elements.num_objs()).map(CSObjId::new)
    }

    /// Points-to set for any pointer kind; `None` if it was never touched
    /// by the solver (equivalent to empty for dump/query purposes).
    pub fn points_to(&self, pointer: Pointer) -> Vec<CSObjId> {
        match self.pfg.points_to(pointer) {
            Some(set) => set.iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn reachable_methods(&self) -> impl Iterator<Item = CSMethodId> + '_ {
        self.call_graph.reachable_methods()
    }

    pub fn call_edges(&self) -> impl Iterator<Item = (CSMethodId, CSCallSiteId, CSMethodId, CallKind)> + '_ {
        self.call_graph.edges()
    }

    /// Collapses the call graph into a context-insensitive projection keyed
    /// by underlying method (spec §4.8).
    pub fn call_graph_context_insensitive(&self) -> std::collections::HashSet<(String, String)> {
        self.call_graph.to_context_insensitive(|m| {
            let cs_method = self.elements.cs_method(m);
            format!("{}.{}", cs_method.method.declaring_class(), cs_method.method.signature())
        })
    }

    /// Every interned static-field pointer with a non-empty points-to set.
    pub fn static_field_pointers(&self) -> impl Iterator<Item = StaticFieldId> + '_ {
        (0..self.elements.num_static_fields()).map(StaticFieldId::new)
    }

    pub fn instance_field_pointers(&self) -> impl Iterator<Item = InstanceFieldId> + '_ {
        (0..self.elements.num_instance_fields()).map(InstanceFieldId::new)
    }

    pub fn array_index_pointers(&self) -> impl Iterator<Item = ArrayIndexId> + '_ {
        (0..self.elements.num_array_indexes()).map(ArrayIndexId::new)
    }

    /// An extensible, plug-in-populated sub-result keyed by name (spec
    /// §4.8: "extensible named sub-results (e.g. `\"Taint\"` key yields
    /// taint flows)").
    pub fn named<T: Any>(&self, key: &str) -> Option<&T> {
        self.named_results.get(key).and_then(|v| v.downcast_ref::<T>())
    }
}
