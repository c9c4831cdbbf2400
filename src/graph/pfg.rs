// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The pointer-flow graph: pointers with outgoing, typed edges
//! (spec §4.5).

use std::collections::{HashMap, HashSet};

use crate::elements::{CSObjId, Pointer};
use crate::ir::JMethod;
use crate::pts_set::points_to::{HybridPointsToSet, PointsToSet};

/// Edge kinds and their propagation filters (spec §4.5 table). The filter
/// is a type id resolved against the receiving pointer's declared/cast/
/// field/parameter type; `None` means no filtering (loads have none).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EdgeKind {
    LocalAssign,
    Cast,
    StaticLoad,
    StaticStore,
    InstanceLoad,
    InstanceStore,
    ArrayLoad,
    ArrayStore,
    Parameter,
    Return,
}

impl EdgeKind {
    /// Whether this edge kind carries a type filter at all (spec §4.5:
    /// loads have `—`, everything else filters).
    pub fn is_filtered(&self) -> bool {
        !matches!(self, EdgeKind::StaticLoad | EdgeKind::InstanceLoad | EdgeKind::ArrayLoad)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Edge<T> {
    pub target: Pointer,
    pub kind: EdgeKind,
    /// The filter type, when `kind.is_filtered()`.
    pub filter_type: Option<T>,
}

/// The pointer-flow graph: per-pointer points-to sets and outgoing edge
/// lists, plus a type-assignability oracle used to apply edge filters.
pub struct PointerFlowGraph<M: JMethod> {
    points_to: HashMap<Pointer, HybridPointsToSet<CSObjId>>,
    out_edges: HashMap<Pointer, Vec<Edge<M::Ty>>>,
    edge_set: HashMap<Pointer, HashSet<(Pointer, EdgeKind)>>,
}

impl<M: JMethod> Default for PointerFlowGraph<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: JMethod> PointerFlowGraph<M> {
    pub fn new() -> Self {
        PointerFlowGraph {
            points_to: HashMap::new(),
            out_edges: HashMap::new(),
            edge_set: HashMap::new(),
        }
    }

    pub fn points_to(&self, p: Pointer) -> Option<&HybridPointsToSet<CSObjId>> {
        self.points_to.get(&p)
    }

    pub fn points_to_mut(&mut self, p: Pointer) -> &mut HybridPointsToSet<CSObjId> {
        self.points_to.entry(p).or_insert_with(HybridPointsToSet::new)
    }

    pub fn out_edges(&self, p: Pointer) -> &[Edge<M::Ty>] {
        self.out_edges.get(&p).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds edge `src -> target` of `kind` with an optional `filter_type`.
    /// Returns the (filtered) points-to set already on `src`, to be
    /// enqueued as the retroactive propagation delta (spec §4.5: "Adding an
    /// edge ... must retroactively propagate"). Duplicate edges are
    /// rejected and return `None`.
    pub fn add_edge(
        &mut self,
        src: Pointer,
        target: Pointer,
        kind: EdgeKind,
        filter_type: Option<M::Ty>,
        is_subtype: impl Fn(&M::Ty, &M::Ty) -> bool,
        resolve_obj_type: impl Fn(CSObjId) -> M::Ty,
    ) -> Option<Vec<CSObjId>> {
        let seen = self.edge_set.entry(src).or_default();
        if !seen.insert((target, kind)) {
            return None;
        }
        self.out_edges.entry(src).or_default().push(Edge {
            target,
            kind,
            filter_type: filter_type.clone(),
        });

        let existing: Vec<CSObjId> = match self.points_to.get(&src) {
            Some(pts) => pts.iter().collect(),
            None => return Some(Vec::new()),
        };
        let filtered = match &filter_type {
            Some(filter) => existing
                .into_iter()
                .filter(|&o| is_subtype(&resolve_obj_type(o), filter))
                .collect(),
            None => existing,
        };
        Some(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::CSVarId;
    use crate::ir::{JField, JMethod, MethodSig, Statement, Type};
    use crate::util::bit_vec::Idx;
    use std::fmt;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct TestTy;
    impl fmt::Display for TestTy {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "T")
        }
    }
    impl Type for TestTy {
        fn qualified_name(&self) -> &str {
            "T"
        }
        fn is_array(&self) -> bool {
            false
        }
        fn array_element_type(&self) -> Option<Self> {
            None
        }
        fn is_primitive(&self) -> bool {
            false
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct TestSig;
    impl fmt::Display for TestSig {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "m")
        }
    }
    impl MethodSig for TestSig {
        fn name(&self) -> &str {
            "m"
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct TestField;
    impl JField for TestField {
        type Ty = TestTy;
        fn name(&self) -> &str {
            "f"
        }
        fn declaring_class(&self) -> &str {
            "C"
        }
        fn field_type(&self) -> TestTy {
            TestTy
        }
        fn is_static(&self) -> bool {
            true
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct TestMethod;
    impl JMethod for TestMethod {
        type Ty = TestTy;
        type Field = TestField;
        type Sig = TestSig;
        fn declaring_class(&self) -> &str {
            "C"
        }
        fn signature(&self) -> TestSig {
            TestSig
        }
        fn is_static(&self) -> bool {
            false
        }
        fn param_types(&self) -> &[TestTy] {
            &[]
        }
        fn return_type(&self) -> TestTy {
            TestTy
        }
        fn num_locals(&self) -> u32 {
            1
        }
        fn local_type(&self, _local: u32) -> TestTy {
            TestTy
        }
        fn statements(&self) -> Option<&[Statement<Self>]> {
            None
        }
    }

    fn var(i: usize) -> Pointer {
        Pointer::Var(CSVarId::new(i))
    }

    #[test]
    fn duplicate_edges_are_rejected() {
        let mut pfg: PointerFlowGraph<TestMethod> = PointerFlowGraph::new();
        let a = var(0);
        let b = var(1);
        let first = pfg.add_edge(a, b, EdgeKind::LocalAssign, None, |_, _| true, |_| TestTy);
        assert!(first.is_some());
        let second = pfg.add_edge(a, b, EdgeKind::LocalAssign, None, |_, _| true, |_| TestTy);
        assert!(second.is_none());
    }

    #[test]
    fn existing_points_to_set_is_returned_on_edge_add() {
        let mut pfg: PointerFlowGraph<TestMethod> = PointerFlowGraph::new();
        let a = var(0);
        let b = var(1);
        pfg.points_to_mut(a).insert(CSObjId::new(5));
        let diff = pfg
            .add_edge(a, b, EdgeKind::LocalAssign, None, |_, _| true, |_| TestTy)
            .unwrap();
        assert_eq!(diff, vec![CSObjId::new(5)]);
    }
}
