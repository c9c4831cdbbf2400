// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Resolves `invokedynamic`/lambda call sites to their bootstrap target
//! (spec §4.7 "Invokedynamic / Lambda").
//!
//! The frontend resolves the constant-pool bootstrap method handle down to
//! a target class and signature, carried on `Statement::Invoke` as
//! `static_declaring_class` for `InvokeKind::Dynamic` sites (spec §6:
//! class-hierarchy construction is out of scope for this engine). This
//! plug-in's job starts where that leaves off: turning the resolved target
//! into an actual call edge, exactly as a direct call would be linked.

use crate::graph::call_graph::CallKind;
use crate::ir::{ClassHierarchy, InvokeKind, IrProgram, JMethod, Statement};
use crate::solver::plugin::PtaPlugin;
use crate::solver::Solver;

#[derive(Default)]
pub struct InvokedynamicPlugin;

impl<P: IrProgram> PtaPlugin<P> for InvokedynamicPlugin {
    fn handle_new_method(&mut self, solver: &mut Solver<P>, method: crate::elements::CSMethodId) {
        let cs_method = solver.elements().cs_method(method);
        let Some(stmts) = cs_method.method.statements() else {
            return;
        };
        let dynamic_calls: Vec<(u32, Option<crate::ir::Local>, Option<String>, <crate::ir::MethodOf<P> as JMethod>::Sig, Vec<crate::ir::Local>)> = stmts
            .iter()
            .enumerate()
            .filter_map(|(idx, stmt)| match stmt {
                Statement::Invoke {
                    result,
                    kind: InvokeKind::Dynamic,
                    static_declaring_class,
                    signature,
                    args,
                    ..
                } => Some((idx as u32, *result, static_declaring_class.clone(), signature.clone(), args.clone())),
                _ => None,
            })
            .collect();

        for (idx, result, class_name, signature, args) in dynamic_calls {
            let Some(class_name) = class_name else { continue };
            let Some(callee) = solver.program().hierarchy().resolve_direct(&class_name, &signature) else {
                continue;
            };
            self_link(solver, cs_method.context, cs_method.method.clone(), idx, callee, result, &args);
        }
    }
}

fn self_link<P: IrProgram>(
    solver: &mut Solver<P>,
    ctx: crate::context::ContextId,
    caller: std::rc::Rc<crate::ir::MethodOf<P>>,
    idx: u32,
    callee: crate::ir::MethodOf<P>,
    result: Option<crate::ir::Local>,
    args: &[crate::ir::Local],
) {
    // A synthesised indy target is always invoked as a plain static/direct
    // call from the solver's point of view: the lambda's captured receiver
    // (if any) already flows in as its first argument at the call site.
    solver.register_call_edge(ctx, caller, idx, None, callee, CallKind::Other, result, args);
}
