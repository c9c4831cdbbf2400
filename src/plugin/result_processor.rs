// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Logs summary statistics once the solver reaches a fixed point (spec
//! §4.7 "ResultProcessor"), in the shape of the teacher's
//! `pta_statistics` dump: pointer/points-to counts plus call-graph size.

use log::info;

use crate::elements::{CSVarId, Pointer};
use crate::ir::IrProgram;
use crate::pts_set::points_to::PointsToSet;
use crate::solver::plugin::PtaPlugin;
use crate::solver::Solver;
use crate::util::bit_vec::Idx;

#[derive(Default)]
pub struct ResultProcessorPlugin;

impl<P: IrProgram> PtaPlugin<P> for ResultProcessorPlugin {
    fn on_finish(&mut self, solver: &mut Solver<P>) {
        let num_vars = solver.elements().num_vars();
        let num_objs = solver.elements().num_objs();
        let num_methods = solver.elements().num_methods();
        let num_reachable = solver.call_graph().num_reachable_methods();
        let num_call_edges = solver.call_graph().edges().count();

        let mut num_pointers = 0usize;
        let mut num_relations = 0usize;
        for i in 0..num_vars {
            let var = CSVarId::new(i);
            if let Some(pts) = solver.pfg().points_to(Pointer::Var(var)) {
                if !pts.is_empty() {
                    num_pointers += 1;
                    num_relations += pts.count();
                }
            }
        }
        let avg_pts = if num_pointers == 0 { 0.0 } else { num_relations as f64 / num_pointers as f64 };

        info!("##########################################################");
        info!("Pointer analysis statistics:");
        info!("#CS variables: {num_vars}");
        info!("#CS objects: {num_objs}");
        info!("#Methods interned: {num_methods}");
        info!("#Reachable methods: {num_reachable}");
        info!("#Call edges: {num_call_edges}");
        info!("----------------------------------------------------------");
        info!("Points-to statistics:");
        info!("#Pointers: {num_pointers}");
        info!("#Points-to relations: {num_relations}");
        info!("#Avg points-to size: {avg_pts:.2}");
        info!("##########################################################");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_defaults_to_zeroed_state() {
        let _plugin = ResultProcessorPlugin;
    }
}
