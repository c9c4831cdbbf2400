// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Pattern-based modelling of common reflective APIs (spec §4.7
//! "Reflection"): `Class.newInstance` is folded into a regular allocation
//! once the receiver resolves to a `ClassLiteral`; `Method.invoke` has no
//! stable target to resolve against a generic IR and is logged as a
//! dispatch failure instead (spec §7).

use std::collections::HashMap;
use std::rc::Rc;

use crate::elements::{CSMethodId, CSVarId};
use crate::heap::ObjKind;
use crate::ir::{AllocSite, InvokeKind, IrProgram, JMethod, MethodOf, MethodSig, Statement};
use crate::solver::plugin::PtaPlugin;
use crate::solver::Solver;

const NEW_INSTANCE: &str = "newInstance";
const METHOD_INVOKE: &str = "invoke";

struct PendingNewInstance<M: JMethod> {
    caller: Rc<M>,
    result_var: Option<CSVarId>,
    stmt_idx: u32,
}

pub struct ReflectionPlugin<M: JMethod> {
    pending: HashMap<CSVarId, Vec<PendingNewInstance<M>>>,
}

impl<M: JMethod> Default for ReflectionPlugin<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: JMethod> ReflectionPlugin<M> {
    pub fn new() -> Self {
        ReflectionPlugin { pending: HashMap::new() }
    }
}

impl<P: IrProgram> PtaPlugin<P> for ReflectionPlugin<MethodOf<P>> {
    fn handle_new_method(&mut self, solver: &mut Solver<P>, method: CSMethodId) {
        let cs_method = solver.elements().cs_method(method);
        let Some(stmts) = cs_method.method.statements() else {
            return;
        };
        for (idx, stmt) in stmts.iter().enumerate() {
            let Statement::Invoke {
                result,
                kind: InvokeKind::Virtual,
                base: Some(base),
                signature,
                ..
            } = stmt
            else {
                continue;
            };
            if signature.name() == NEW_INSTANCE {
                let base_var = solver.elements_mut().get_cs_var(cs_method.context, cs_method.method.clone(), *base);
                let result_var = result.map(|r| solver.elements_mut().get_cs_var(cs_method.context, cs_method.method.clone(), r));
                self.pending.entry(base_var).or_default().push(PendingNewInstance {
                    caller: cs_method.method.clone(),
                    result_var,
                    stmt_idx: idx as u32,
                });
            } else if signature.name() == METHOD_INVOKE {
                log::debug!("reflective Method.invoke at statement {idx} is not modelled: target unknown");
            }
        }
    }

    fn handle_new_points_to_set(&mut self, solver: &mut Solver<P>, var: CSVarId, diff: &[crate::elements::CSObjId]) {
        let Some(calls) = self.pending.get(&var) else {
            return;
        };
        let calls: Vec<(Rc<MethodOf<P>>, Option<CSVarId>, u32)> =
            calls.iter().map(|c| (c.caller.clone(), c.result_var, c.stmt_idx)).collect();
        for &obj in diff {
            let ObjKind::ClassLiteral(ty) = solver.obj_kind(obj) else {
                continue;
            };
            for (caller, result_var, stmt_idx) in &calls {
                let Some(result_var) = result_var else { continue };
                let ctx = solver.var_context(*result_var);
                let site = AllocSite { method: caller.clone(), stmt_index: *stmt_idx };
                let instance = solver.heap_mut().obj_for_alloc(site, ty.clone());
                let instance_id = solver.intern_obj(ctx, instance);
                solver.add_points_to(*result_var, instance_id);
            }
        }
    }
}
