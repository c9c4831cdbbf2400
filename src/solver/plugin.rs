// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The plug-in lifecycle (spec §4.7): synchronous callbacks invoked in
//! registration order within the solver loop.

use crate::elements::{CSCallSiteId, CSMethodId, CSObjId, CSVarId};
use crate::graph::call_graph::CallKind;
use crate::ir::IrProgram;

use super::Solver;

/// A plug-in implements any subset of the lifecycle; every method
/// defaults to a no-op. Implementations reach back into the solver
/// through the handful of `pub` mutator methods on [`Solver`]
/// (`add_points_to`, `mark_reachable`, `heap_mut`, `elements_mut`) —
/// the same discipline the solver's own statement translation uses, so a
/// plug-in cannot bypass the worklist (spec §4.7: "must not mutate
/// existing points-to sets except through solver APIs").
#[allow(unused_variables)]
pub trait PtaPlugin<P: IrProgram> {
    fn on_start(&mut self, solver: &mut Solver<P>) {}

    fn on_finish(&mut self, solver: &mut Solver<P>) {}

    fn handle_new_method(&mut self, solver: &mut Solver<P>, method: CSMethodId) {}

    fn handle_new_points_to_set(&mut self, solver: &mut Solver<P>, var: CSVarId, diff: &[CSObjId]) {}

    fn handle_new_call_edge(
        &mut self,
        solver: &mut Solver<P>,
        call_site: CSCallSiteId,
        caller: CSMethodId,
        callee: CSMethodId,
        kind: CallKind,
    ) {
    }
}
