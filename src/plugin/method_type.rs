// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Folds `MethodType.methodType(...)` factory calls into a single shared
//! `MethodType` constant object once its arguments resolve to class or
//! method-type literals (spec §4.7 "MethodType").

use std::collections::HashMap;
use std::rc::Rc;

use crate::context::ContextId;
use crate::elements::{CSObjId, CSVarId};
use crate::heap::ObjKind;
use crate::ir::{InvokeKind, IrProgram, JMethod, MethodOf, MethodSig, Statement};
use crate::solver::plugin::PtaPlugin;
use crate::solver::Solver;

const METHOD_TYPE_CLASS: &str = "java.lang.invoke.MethodType";
const METHOD_TYPE_FACTORY: &str = "methodType";

struct PendingCall<Ty> {
    result_var: CSVarId,
    context: ContextId,
    arg_vars: Vec<CSVarId>,
    resolved: Vec<Option<Resolved<Ty>>>,
}

enum Resolved<Ty> {
    ClassLiteral(Ty),
    MethodType { return_type: Ty, param_types: Vec<Ty> },
}

/// Watches arguments of pending `methodType` calls and, once every
/// argument resolves to a class/method-type literal, injects the folded
/// object into the call's result variable.
pub struct MethodTypePlugin<M: JMethod> {
    method_type_class_type: M::Ty,
    /// `arg_var -> indices into `pending` whose call this argument belongs
    /// to`, so a single points-to notification can be routed to every
    /// pending call that cares about it.
    watchers: HashMap<CSVarId, Vec<usize>>,
    pending: Vec<Option<PendingCall<M::Ty>>>,
}

impl<M: JMethod> MethodTypePlugin<M> {
    pub fn new(method_type_class_type: M::Ty) -> Self {
        MethodTypePlugin {
            method_type_class_type,
            watchers: HashMap::new(),
            pending: Vec::new(),
        }
    }

    fn register_pending(&mut self, result_var: CSVarId, context: ContextId, arg_vars: Vec<CSVarId>) {
        let idx = self.pending.len();
        for &v in &arg_vars {
            self.watchers.entry(v).or_default().push(idx);
        }
        let n = arg_vars.len();
        self.pending.push(Some(PendingCall {
            result_var,
            context,
            arg_vars,
            resolved: (0..n).map(|_| None).collect(),
        }));
    }
}

impl<P: IrProgram> PtaPlugin<P> for MethodTypePlugin<MethodOf<P>>
where
    MethodOf<P>: JMethod,
{
    fn handle_new_method(&mut self, solver: &mut Solver<P>, method: crate::elements::CSMethodId) {
        let cs_method = solver.elements().cs_method(method);
        let Some(stmts) = cs_method.method.statements() else {
            return;
        };
        for stmt in stmts {
            if let Statement::Invoke {
                result: Some(result_local),
                kind: InvokeKind::Static,
                static_declaring_class: Some(class_name),
                signature,
                args,
                ..
            } = stmt
            {
                if class_name == METHOD_TYPE_CLASS && signature.name() == METHOD_TYPE_FACTORY && !args.is_empty() {
                    let result_var = solver.elements_mut().get_cs_var(cs_method.context, cs_method.method.clone(), *result_local);
                    let arg_vars: Vec<CSVarId> = args
                        .iter()
                        .map(|&a| solver.elements_mut().get_cs_var(cs_method.context, cs_method.method.clone(), a))
                        .collect();
                    self.register_pending(result_var, cs_method.context, arg_vars);
                }
            }
        }
    }

    fn handle_new_points_to_set(&mut self, solver: &mut Solver<P>, var: CSVarId, diff: &[CSObjId]) {
        let Some(indices) = self.watchers.get(&var).cloned() else {
            return;
        };
        for idx in indices {
            let Some(call) = self.pending[idx].as_mut() else { continue };
            let slot = call.arg_vars.iter().position(|&v| v == var);
            let Some(slot) = slot else { continue };
            if call.resolved[slot].is_some() {
                continue;
            }
            for &obj in diff {
                match solver.obj_kind(obj) {
                    ObjKind::ClassLiteral(ty) => {
                        call.resolved[slot] = Some(Resolved::ClassLiteral(ty));
                        break;
                    }
                    ObjKind::MethodTypeConst { return_type, param_types } => {
                        call.resolved[slot] = Some(Resolved::MethodType { return_type, param_types });
                        break;
                    }
                    _ => {}
                }
            }
            if call.resolved.iter().all(Option::is_some) {
                let call = self.pending[idx].take().unwrap();
                let return_type = match &call.resolved[0] {
                    Some(Resolved::ClassLiteral(ty)) => ty.clone(),
                    _ => return,
                };
                let param_types = if call.resolved.len() == 1 {
                    Vec::new()
                } else {
                    match &call.resolved[1] {
                        Some(Resolved::ClassLiteral(ty)) => vec![ty.clone()],
                        Some(Resolved::MethodType { param_types, .. }) => param_types.clone(),
                        None => return,
                    }
                };
                let folded = Rc::new(crate::heap::Obj {
                    kind: ObjKind::MethodTypeConst { return_type, param_types },
                    ty: self.method_type_class_type.clone(),
                });
                let cs_obj = solver.intern_obj(call.context, folded);
                solver.add_points_to(call.result_var, cs_obj);
            }
        }
    }
}
