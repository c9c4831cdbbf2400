// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The worklist fixed-point loop: the heart of the analysis (spec §4.6).

pub mod plugin;

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::context::selector::{ContextSelector, ReceiverObj};
use crate::context::{Context, ContextCache, ContextId, HybridCtxElem};
use crate::elements::{CSCallSiteId, CSMethodId, CSObjId, CSVarId, ElementManager, Pointer};
use crate::graph::call_graph::{CallKind, CsCallGraph};
use crate::graph::pfg::{EdgeKind, PointerFlowGraph};
use crate::heap::{HeapMergePolicy, HeapModel};
use crate::ir::{AllocSite, ClassHierarchy, InvokeKind, IrProgram, JField, JMethod, Local, MethodOf, Statement, Type};
use crate::pts_set::points_to::PointsToSet;
use crate::util::bit_vec::Idx;
use crate::util::indexer::{Indexer, MappedIndexer};

use plugin::PtaPlugin;

/// Cooperative cancellation, checked once per worklist pop (spec §5).
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        CancellationToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Solver configuration, decided once at start-up from the `cs` and
/// `only-app` options (spec §6).
pub struct SolverConfig {
    pub context_selector: ContextSelector,
    pub heap_merge_policy: HeapMergePolicy,
    pub only_app: bool,
}

type M<P> = MethodOf<P>;

pub struct Solver<P: IrProgram> {
    program: P,
    config: SolverConfig,
    heap: HeapModel<M<P>>,
    elements: ElementManager<M<P>>,
    pfg: PointerFlowGraph<M<P>>,
    call_graph: CsCallGraph,
    ctx_cache: ContextCache<HybridCtxElem>,
    type_ids: MappedIndexer<<M<P> as JMethod>::Ty>,
    worklist: VecDeque<(Pointer, Vec<CSObjId>)>,
    plugins: Vec<Box<dyn PtaPlugin<P>>>,
    cancel: CancellationToken,
    /// Extensible named sub-results a plug-in may populate from `on_finish`
    /// (spec §4.8 "extensible named sub-results", e.g. the `"Taint"` key).
    named_results: HashMap<String, Box<dyn Any>>,
}

impl<P: IrProgram> Solver<P> {
    pub fn new(program: P, config: SolverConfig, cancel: CancellationToken) -> Self {
        let heap_policy = config.heap_merge_policy;
        Solver {
            program,
            config,
            heap: HeapModel::new(heap_policy),
            elements: ElementManager::new(),
            pfg: PointerFlowGraph::new(),
            call_graph: CsCallGraph::new(),
            ctx_cache: ContextCache::new(),
            type_ids: MappedIndexer::new(),
            worklist: VecDeque::new(),
            plugins: Vec::new(),
            cancel,
            named_results: HashMap::new(),
        }
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn PtaPlugin<P>>) {
        self.plugins.push(plugin);
    }

    pub fn elements(&self) -> &ElementManager<M<P>> {
        &self.elements
    }

    pub fn pfg(&self) -> &PointerFlowGraph<M<P>> {
        &self.pfg
    }

    pub fn call_graph(&self) -> &CsCallGraph {
        &self.call_graph
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    fn is_subtype(&self, sub: &<M<P> as JMethod>::Ty, sup: &<M<P> as JMethod>::Ty) -> bool {
        self.program.hierarchy().is_subtype(sub, sup)
    }

    fn obj_type(&self, obj: CSObjId) -> <M<P> as JMethod>::Ty {
        self.elements.cs_obj(obj).obj.ty.clone()
    }

    fn empty_context(&mut self) -> ContextId {
        self.ctx_cache.intern(Context::new_empty())
    }

    /// Runs the solver to completion or until cancelled (spec §4.6, §5).
    pub fn solve(&mut self) {
        self.on_start();
        let entry_ctx = self.empty_context();
        for entry in self.program.entry_points() {
            let cs_method = self.elements.get_cs_method(entry_ctx, Rc::new(entry));
            self.mark_reachable(cs_method);
        }
        self.run_loop();
        self.on_finish();
    }

    fn on_start(&mut self) {
        let mut plugins = std::mem::take(&mut self.plugins);
        for plugin in plugins.iter_mut() {
            plugin.on_start(self);
        }
        self.plugins = plugins;
    }

    fn on_finish(&mut self) {
        let mut plugins = std::mem::take(&mut self.plugins);
        for plugin in plugins.iter_mut() {
            plugin.on_finish(self);
        }
        self.plugins = plugins;
    }

    fn run_loop(&mut self) {
        while let Some((n, delta)) = self.worklist.pop_front() {
            if self.cancel.is_cancelled() {
                warn!("analysis cancelled with {} entries remaining in worklist", self.worklist.len() + 1);
                return;
            }
            let actual: Vec<CSObjId> = {
                let pts = self.pfg.points_to_mut(n);
                delta.into_iter().filter(|&o| pts.insert(o)).collect()
            };
            if actual.is_empty() {
                continue;
            }
            for edge in self.pfg.out_edges(n).to_vec() {
                let filtered: Vec<CSObjId> = match &edge.filter_type {
                    Some(filter) => actual
                        .iter()
                        .copied()
                        .filter(|&o| self.is_subtype(&self.obj_type(o), filter))
                        .collect(),
                    None => actual.clone(),
                };
                if !filtered.is_empty() {
                    self.worklist.push_back((edge.target, filtered));
                }
            }
            if let Pointer::Var(v) = n {
                self.handle_var_growth(v, &actual);
                self.notify_new_points_to_set(v, &actual);
            }
        }
    }

    fn notify_new_points_to_set(&mut self, var: CSVarId, diff: &[CSObjId]) {
        let mut plugins = std::mem::take(&mut self.plugins);
        for plugin in plugins.iter_mut() {
            plugin.handle_new_points_to_set(self, var, diff);
        }
        self.plugins = plugins;
    }

    /// Marks `method` reachable the first time it is seen, translating its
    /// statements into PFG edges and deferred obligations
    /// (spec §4.6 `markReachable`). With `only-app` set, methods outside the
    /// application are never marked reachable: the call edge that resolved
    /// to them is still recorded by `link_call`, but they are not explored
    /// any further.
    pub fn mark_reachable(&mut self, method: CSMethodId) {
        let cs_method = self.elements.cs_method(method);
        if self.config.only_app && !self.program.is_application_class(cs_method.method.declaring_class()) {
            return;
        }
        if !self.call_graph.add_reachable(method) {
            return;
        }
        match cs_method.method.statements() {
            Some(stmts) => {
                let stmts = stmts.to_vec();
                for (idx, stmt) in stmts.iter().enumerate() {
                    self.translate_statement(cs_method.context, cs_method.method.clone(), idx as u32, stmt);
                }
            }
            None => {
                warn!("method {:?} has no IR available; treated as an empty body", cs_method.method);
            }
        }
        let mut plugins = std::mem::take(&mut self.plugins);
        for plugin in plugins.iter_mut() {
            plugin.handle_new_method(self, method);
        }
        self.plugins = plugins;
    }

    fn push_if_nonempty(&mut self, target: Pointer, diff: Vec<CSObjId>) {
        if !diff.is_empty() {
            self.worklist.push_back((target, diff));
        }
    }

    /// Allocates the object for a `New` statement and, for `new T[..][..]`
    /// (`dims > 1`), the `dims - 1` nested array objects it owns, chaining
    /// each one into the previous level's array-index pointer so a load off
    /// any dimension reaches the right abstract object (spec §4.6
    /// "Statement translation", multi-dimensional array allocation).
    ///
    /// Nested levels reuse the outer statement's index with the nesting
    /// depth packed into the unused high byte, since methods have far fewer
    /// than 2^24 statements; this keeps one `AllocSite` identity per level
    /// without widening `AllocSite` itself.
    fn alloc_chain(&mut self, ctx: ContextId, method: &Rc<M<P>>, idx: u32, alloc_type: &<M<P> as JMethod>::Ty, dims: u32) -> CSObjId {
        let alloc_ctx_rc = self.ctx_cache.get(ctx).expect("interned context");
        let heap_ctx_rc = self.config.context_selector.select_heap_context(&alloc_ctx_rc, idx);
        let heap_ctx = self.ctx_cache.intern(heap_ctx_rc);

        let site = AllocSite { method: method.clone(), stmt_index: idx };
        let outer_obj = self.heap.obj_for_alloc(site, alloc_type.clone());
        let outer_cs_obj = self.elements.get_cs_obj(heap_ctx, outer_obj);

        let mut current_obj = outer_cs_obj;
        let mut current_ty = alloc_type.clone();
        for level in 1..dims {
            let Some(elem_ty) = current_ty.array_element_type() else {
                debug!("array type {current_ty} has no element type at nesting level {level} of a {dims}-dim allocation");
                break;
            };
            let nested_idx = idx | (level << 24);
            let site = AllocSite { method: method.clone(), stmt_index: nested_idx };
            let nested_obj = self.heap.obj_for_alloc(site, elem_ty.clone());
            let nested_cs_obj = self.elements.get_cs_obj(heap_ctx, nested_obj);
            let arr = self.elements.get_array_index(current_obj);
            let inserted = self.pfg.points_to_mut(Pointer::ArrayIndex(arr)).insert(nested_cs_obj);
            if inserted {
                self.push_if_nonempty(Pointer::ArrayIndex(arr), vec![nested_cs_obj]);
            }
            current_obj = nested_cs_obj;
            current_ty = elem_ty;
        }
        outer_cs_obj
    }

    fn translate_statement(&mut self, ctx: ContextId, method: Rc<M<P>>, idx: u32, stmt: &Statement<M<P>>) {
        match stmt {
            Statement::New { lhs, alloc_type, dims } => {
                let cs_obj = self.alloc_chain(ctx, &method, idx, alloc_type, *dims);
                let dst = self.elements.get_cs_var(ctx, method, *lhs);
                let inserted = self.pfg.points_to_mut(Pointer::Var(dst)).insert(cs_obj);
                if inserted {
                    self.push_if_nonempty(Pointer::Var(dst), vec![cs_obj]);
                }
            }
            Statement::Assign { lhs, rhs } => {
                let dst = self.elements.get_cs_var(ctx, method.clone(), *lhs);
                let src = self.elements.get_cs_var(ctx, method, *rhs);
                self.add_pfg_edge(Pointer::Var(src), Pointer::Var(dst), EdgeKind::LocalAssign, None);
            }
            Statement::Cast { lhs, rhs, cast_type } => {
                let dst = self.elements.get_cs_var(ctx, method.clone(), *lhs);
                let src = self.elements.get_cs_var(ctx, method, *rhs);
                self.add_pfg_edge(Pointer::Var(src), Pointer::Var(dst), EdgeKind::Cast, Some(cast_type.clone()));
            }
            Statement::LoadField { lhs, base: None, field } => {
                let resolved = self.program.hierarchy().resolve_field(field);
                let sf = self.elements.get_static_field(resolved);
                let dst = self.elements.get_cs_var(ctx, method, *lhs);
                self.add_pfg_edge(Pointer::StaticField(sf), Pointer::Var(dst), EdgeKind::StaticLoad, None);
            }
            Statement::StoreField { base: None, field, rhs } => {
                let resolved = self.program.hierarchy().resolve_field(field);
                let sf = self.elements.get_static_field(resolved);
                let src = self.elements.get_cs_var(ctx, method, *rhs);
                let ty = field.field_type();
                self.add_pfg_edge(Pointer::Var(src), Pointer::StaticField(sf), EdgeKind::StaticStore, Some(ty));
            }
            // Instance/array field access and virtual/special/interface
            // calls are deferred until the base variable's points-to set
            // grows (spec §4.6 "Statement translation").
            Statement::LoadField { base: Some(_), .. }
            | Statement::StoreField { base: Some(_), .. }
            | Statement::LoadArray { .. }
            | Statement::StoreArray { .. } => {}
            Statement::Invoke { kind: InvokeKind::Static, static_declaring_class, signature, result, args, .. } => {
                let Some(class_name) = static_declaring_class else {
                    debug!("static call without a declaring class at statement {idx}");
                    return;
                };
                if let Some(callee) = self.program.hierarchy().resolve_direct(class_name, signature) {
                    self.link_call(ctx, method, idx, None, callee, CallKind::Static, *result, args);
                } else {
                    debug!("dispatch failure: no implementation of {signature} in {class_name}");
                }
            }
            Statement::Invoke { .. } => {}
            Statement::Return { .. } => {}
        }
    }

    /// Applies deferred obligations now that `v`'s points-to set grew by
    /// `actual` (spec §4.6 loop body, "if n is a CSVar v in context c").
    fn handle_var_growth(&mut self, v: CSVarId, actual: &[CSObjId]) {
        let cs_var = self.elements.cs_var(v);
        let Some(stmts) = cs_var.method.statements().map(|s| s.to_vec()) else {
            return;
        };
        for (idx, stmt) in stmts.iter().enumerate() {
            match stmt {
                Statement::LoadField { lhs, base: Some(b), field } if *b == cs_var.local && !field.is_static() => {
                    let resolved = self.program.hierarchy().resolve_field(field);
                    for &o in actual {
                        let inst = self.elements.get_instance_field(o, resolved.clone());
                        let dst = self.elements.get_cs_var(cs_var.context, cs_var.method.clone(), *lhs);
                        self.add_pfg_edge(Pointer::InstanceField(inst), Pointer::Var(dst), EdgeKind::InstanceLoad, None);
                    }
                }
                Statement::StoreField { base: Some(b), field, rhs } if *b == cs_var.local && !field.is_static() => {
                    let resolved = self.program.hierarchy().resolve_field(field);
                    for &o in actual {
                        let inst = self.elements.get_instance_field(o, resolved.clone());
                        let src = self.elements.get_cs_var(cs_var.context, cs_var.method.clone(), *rhs);
                        self.add_pfg_edge(Pointer::Var(src), Pointer::InstanceField(inst), EdgeKind::InstanceStore, Some(field.field_type()));
                    }
                }
                Statement::LoadArray { lhs, base } if *base == cs_var.local => {
                    for &o in actual {
                        let arr = self.elements.get_array_index(o);
                        let dst = self.elements.get_cs_var(cs_var.context, cs_var.method.clone(), *lhs);
                        self.add_pfg_edge(Pointer::ArrayIndex(arr), Pointer::Var(dst), EdgeKind::ArrayLoad, None);
                    }
                }
                Statement::StoreArray { base, rhs } if *base == cs_var.local => {
                    for &o in actual {
                        let arr = self.elements.get_array_index(o);
                        let src = self.elements.get_cs_var(cs_var.context, cs_var.method.clone(), *rhs);
                        let component = self.obj_type(o).array_element_type();
                        self.add_pfg_edge(Pointer::Var(src), Pointer::ArrayIndex(arr), EdgeKind::ArrayStore, component);
                    }
                }
                Statement::Invoke {
                    result,
                    kind: kind @ (InvokeKind::Virtual | InvokeKind::Interface | InvokeKind::Special),
                    base: Some(b),
                    static_declaring_class,
                    signature,
                    args,
                } if *b == cs_var.local => {
                    for &o in actual {
                        let receiver_type = self.obj_type(o);
                        let callee = match kind {
                            InvokeKind::Special => static_declaring_class
                                .as_ref()
                                .and_then(|class_name| self.program.hierarchy().resolve_direct(class_name, signature)),
                            _ => self.program.hierarchy().resolve_virtual(&receiver_type, signature),
                        };
                        let call_kind = match kind {
                            InvokeKind::Virtual => CallKind::Virtual,
                            InvokeKind::Interface => CallKind::Interface,
                            InvokeKind::Special => CallKind::Special,
                            _ => CallKind::Other,
                        };
                        match callee {
                            Some(callee_method) => {
                                self.link_call(
                                    cs_var.context,
                                    cs_var.method.clone(),
                                    idx as u32,
                                    Some(o),
                                    callee_method,
                                    call_kind,
                                    *result,
                                    args,
                                );
                            }
                            None => debug!("dispatch failure: no implementation of {signature} for {receiver_type}"),
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Resolves context, records the call edge, and links parameters,
    /// receiver, and returns (spec §4.6 loop body, virtual-call handling).
    fn link_call(
        &mut self,
        caller_ctx: ContextId,
        caller_method: Rc<M<P>>,
        stmt_idx: u32,
        receiver: Option<CSObjId>,
        callee_method: M<P>,
        call_kind: CallKind,
        result: Option<Local>,
        args: &[Local],
    ) {
        let cs_call_site = self.elements.get_cs_call_site(caller_ctx, caller_method.clone(), stmt_idx);
        let caller_ctx_rc = self.ctx_cache.get(caller_ctx).expect("interned context");
        let receiver_info = receiver.map(|o| ReceiverObj {
            obj_id: o.index() as u32,
            type_id: self.type_ids.index_of(&self.obj_type(o)),
        });
        let callee_ctx_rc = self
            .config
            .context_selector
            .select_method_context(&caller_ctx_rc, cs_call_site.index() as u32, receiver_info);
        let callee_ctx = self.ctx_cache.intern(callee_ctx_rc);
        let callee_method = Rc::new(callee_method);
        let caller_cs_method = self.elements.get_cs_method(caller_ctx, caller_method.clone());
        let callee_cs_method = self.elements.get_cs_method(callee_ctx, callee_method.clone());

        let is_new = self.call_graph.add_edge(cs_call_site, caller_cs_method, callee_cs_method, call_kind);
        if is_new {
            self.mark_reachable(callee_cs_method);
            let mut plugins = std::mem::take(&mut self.plugins);
            for plugin in plugins.iter_mut() {
                plugin.handle_new_call_edge(self, cs_call_site, caller_cs_method, callee_cs_method, call_kind);
            }
            self.plugins = plugins;
        }

        let offset = if callee_method.is_static() { 0 } else { 1 };
        for (i, &arg_local) in args.iter().enumerate() {
            let Some(param_ty) = callee_method.param_types().get(i).cloned() else {
                continue;
            };
            let param_local = offset + i as Local;
            let arg_var = self.elements.get_cs_var(caller_ctx, caller_method.clone(), arg_local);
            let param_var = self.elements.get_cs_var(callee_ctx, callee_method.clone(), param_local);
            self.add_pfg_edge(Pointer::Var(arg_var), Pointer::Var(param_var), EdgeKind::Parameter, Some(param_ty));
        }

        if let Some(obj) = receiver {
            let this_var = self.elements.get_cs_var(callee_ctx, callee_method.clone(), 0);
            let inserted = self.pfg.points_to_mut(Pointer::Var(this_var)).insert(obj);
            if inserted {
                self.push_if_nonempty(Pointer::Var(this_var), vec![obj]);
            }
        }

        if let Some(result_local) = result {
            if let Some(callee_stmts) = callee_method.statements().map(|s| s.to_vec()) {
                let result_var = self.elements.get_cs_var(caller_ctx, caller_method, result_local);
                let return_ty = callee_method.return_type();
                for stmt in &callee_stmts {
                    if let Statement::Return { value: Some(v) } = stmt {
                        let ret_var = self.elements.get_cs_var(callee_ctx, callee_method.clone(), *v);
                        self.add_pfg_edge(Pointer::Var(ret_var), Pointer::Var(result_var), EdgeKind::Return, Some(return_ty.clone()));
                    }
                }
            }
        }
    }

    fn add_pfg_edge(&mut self, src: Pointer, dst: Pointer, kind: EdgeKind, filter: Option<<M<P> as JMethod>::Ty>) {
        let hierarchy = self.program.hierarchy();
        let is_subtype = |sub: &<M<P> as JMethod>::Ty, sup: &<M<P> as JMethod>::Ty| hierarchy.is_subtype(sub, sup);
        let elements = &self.elements;
        let resolve_type = |o: CSObjId| elements.cs_obj(o).obj.ty.clone();
        if let Some(diff) = self.pfg.add_edge(src, dst, kind, filter, is_subtype, resolve_type) {
            self.push_if_nonempty(dst, diff);
        }
    }

    /// Directly injects `obj` into `var`'s points-to set and propagates it,
    /// bypassing statement translation. Used by plug-ins to model
    /// synthetic flows (reflection, invokedynamic, constant folding) that
    /// the IR does not express directly (spec §4.7).
    pub fn add_points_to(&mut self, var: CSVarId, obj: CSObjId) {
        let inserted = self.pfg.points_to_mut(Pointer::Var(var)).insert(obj);
        if inserted {
            self.push_if_nonempty(Pointer::Var(var), vec![obj]);
        }
    }

    pub fn heap_mut(&mut self) -> &mut HeapModel<M<P>> {
        &mut self.heap
    }

    pub fn elements_mut(&mut self) -> &mut ElementManager<M<P>> {
        &mut self.elements
    }

    pub fn empty_context_id(&mut self) -> ContextId {
        self.empty_context()
    }

    pub fn var_context(&self, var: CSVarId) -> ContextId {
        self.elements.cs_var(var).context
    }

    /// Interns `obj` under `context` and returns its dense id, for
    /// plug-ins injecting synthetic objects (reflection, invokedynamic,
    /// method-type folding; spec §4.7).
    pub fn intern_obj(&mut self, context: ContextId, obj: Rc<crate::heap::Obj<M<P>>>) -> CSObjId {
        self.elements.get_cs_obj(context, obj)
    }

    pub fn obj_kind(&self, obj: CSObjId) -> crate::heap::ObjKind<M<P>> {
        self.elements.cs_obj(obj).obj.kind.clone()
    }

    /// Registers a call edge on behalf of a plug-in (spec §4.7: "register
    /// new call edges"), linking parameters, receiver, and returns exactly
    /// as the solver does for statically resolved calls.
    #[allow(clippy::too_many_arguments)]
    pub fn register_call_edge(
        &mut self,
        caller_ctx: ContextId,
        caller_method: Rc<M<P>>,
        stmt_idx: u32,
        receiver: Option<CSObjId>,
        callee_method: M<P>,
        call_kind: CallKind,
        result: Option<Local>,
        args: &[Local],
    ) {
        self.link_call(caller_ctx, caller_method, stmt_idx, receiver, callee_method, call_kind, result, args);
    }

    /// Publishes a named sub-result, typically from a plug-in's `on_finish`
    /// (spec §4.8 "extensible named sub-results", e.g. `"Taint"`).
    pub fn set_named_result<T: Any>(&mut self, key: &str, value: T) {
        self.named_results.insert(key.to_string(), Box::new(value));
    }

    pub fn named_result<T: Any>(&self, key: &str) -> Option<&T> {
        self.named_results.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Consumes the solver after [`Solver::solve`] into a read-only result
    /// view (spec §5 "Shared resources... post-analysis, the result object
    /// exposes them as read-only views").
    pub fn into_result(self) -> crate::result::PtaResult<P> {
        crate::result::PtaResult::new(
            self.elements,
            self.pfg,
            self.call_graph,
            self.named_results,
            self.cancel.is_cancelled(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Pointer;
    use crate::ir::{JField, MethodSig, Type};
    use std::fmt;
    use std::hash::{Hash, Hasher};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum TestTy {
        C,
        D,
    }
    impl fmt::Display for TestTy {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", if *self == TestTy::C { "C" } else { "D" })
        }
    }
    impl Type for TestTy {
        fn qualified_name(&self) -> &str {
            match self {
                TestTy::C => "C",
                TestTy::D => "D",
            }
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
    struct TestSig(&'static str);
    impl fmt::Display for TestSig {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }
    impl MethodSig for TestSig {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct TestField {
        name: &'static str,
        declaring_class: &'static str,
        ty: TestTy,
        is_static: bool,
    }
    impl JField for TestField {
        type Ty = TestTy;
        fn name(&self) -> &str {
            self.name
        }
        fn declaring_class(&self) -> &str {
            self.declaring_class
        }
        fn field_type(&self) -> TestTy {
            self.ty
        }
        fn is_static(&self) -> bool {
            self.is_static
        }
    }

    struct MethodData {
        declaring_class: &'static str,
        is_static: bool,
        num_locals: u32,
        statements: Vec<Statement<TestMethod>>,
    }

    impl fmt::Debug for MethodData {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.declaring_class)
        }
    }

    /// Identity by `Rc` pointer, matching the teacher's practice of treating
    /// method handles as interned pointers rather than structurally.
    #[derive(Clone, Debug)]
    struct TestMethod(Rc<MethodData>);

    impl PartialEq for TestMethod {
        fn eq(&self, other: &Self) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }
    impl Eq for TestMethod {}
    impl Hash for TestMethod {
        fn hash<H: Hasher>(&self, state: &mut H) {
            (Rc::as_ptr(&self.0) as usize).hash(state);
        }
    }
    impl JMethod for TestMethod {
        type Ty = TestTy;
        type Field = TestField;
        type Sig = TestSig;
        fn declaring_class(&self) -> &str {
            self.0.declaring_class
        }
        fn signature(&self) -> TestSig {
            TestSig("foo")
        }
        fn is_static(&self) -> bool {
            self.0.is_static
        }
        fn param_types(&self) -> &[TestTy] {
            &[]
        }
        fn return_type(&self) -> TestTy {
            TestTy::C
        }
        fn num_locals(&self) -> u32 {
            self.0.num_locals
        }
        fn local_type(&self, _local: u32) -> TestTy {
            TestTy::C
        }
        fn statements(&self) -> Option<&[Statement<Self>]> {
            Some(&self.0.statements)
        }
    }

    struct TestHierarchy {
        c_foo: TestMethod,
        d_foo: TestMethod,
    }
    impl ClassHierarchy for TestHierarchy {
        type Method = TestMethod;
        fn is_subtype(&self, _sub: &TestTy, _sup: &TestTy) -> bool {
            true
        }
        fn resolve_virtual(&self, receiver_type: &TestTy, _signature: &TestSig) -> Option<TestMethod> {
            match receiver_type {
                TestTy::C => Some(self.c_foo.clone()),
                TestTy::D => Some(self.d_foo.clone()),
            }
        }
        fn resolve_direct(&self, _declaring_class: &str, _signature: &TestSig) -> Option<TestMethod> {
            None
        }
        fn resolve_field(&self, field: &TestField) -> TestField {
            field.clone()
        }
    }

    struct TestProgram {
        hierarchy: TestHierarchy,
        main: TestMethod,
    }
    impl IrProgram for TestProgram {
        type Hierarchy = TestHierarchy;
        fn hierarchy(&self) -> &TestHierarchy {
            &self.hierarchy
        }
        fn entry_points(&self) -> Vec<TestMethod> {
            vec![self.main.clone()]
        }
        fn is_application_class(&self, _class_name: &str) -> bool {
            true
        }
    }

    fn leaf_method(declaring_class: &'static str) -> TestMethod {
        TestMethod(Rc::new(MethodData {
            declaring_class,
            is_static: false,
            num_locals: 1,
            statements: vec![Statement::Return { value: None }],
        }))
    }

    fn solver_config() -> SolverConfig {
        SolverConfig {
            context_selector: ContextSelector::Insensitive,
            heap_merge_policy: HeapMergePolicy::default(),
            only_app: false,
        }
    }

    #[test]
    fn virtual_dispatch_reaches_overriding_method() {
        let c_foo = leaf_method("C");
        let d_foo = leaf_method("D");
        let main = TestMethod(Rc::new(MethodData {
            declaring_class: "Main",
            is_static: true,
            num_locals: 1,
            statements: vec![
                Statement::New { lhs: 0, alloc_type: TestTy::D, dims: 0 },
                Statement::Invoke {
                    result: None,
                    kind: InvokeKind::Virtual,
                    base: Some(0),
                    static_declaring_class: None,
                    signature: TestSig("foo"),
                    args: vec![],
                },
            ],
        }));
        let program = TestProgram { hierarchy: TestHierarchy { c_foo, d_foo }, main };

        let mut solver = Solver::new(program, solver_config(), CancellationToken::new());
        solver.solve();

        let reached_d = solver
            .call_graph()
            .reachable_methods()
            .any(|m| solver.elements().cs_method(m).method.declaring_class() == "D");
        let reached_c = solver
            .call_graph()
            .reachable_methods()
            .any(|m| solver.elements().cs_method(m).method.declaring_class() == "C");
        assert!(reached_d, "dispatch on a D receiver must reach D.foo");
        assert!(!reached_c, "dispatch on a D receiver must not also reach C.foo");
    }

    #[test]
    fn static_field_store_flows_to_load() {
        let field = TestField { name: "f", declaring_class: "Main", ty: TestTy::C, is_static: true };
        let main = TestMethod(Rc::new(MethodData {
            declaring_class: "Main",
            is_static: true,
            num_locals: 2,
            statements: vec![
                Statement::New { lhs: 0, alloc_type: TestTy::C, dims: 0 },
                Statement::StoreField { base: None, field: field.clone(), rhs: 0 },
                Statement::LoadField { lhs: 1, base: None, field },
            ],
        }));
        let leaf = leaf_method("C");
        let program = TestProgram { hierarchy: TestHierarchy { c_foo: leaf.clone(), d_foo: leaf }, main };

        let mut solver = Solver::new(program, solver_config(), CancellationToken::new());
        solver.solve();
        let result = solver.into_result();

        let x = result.cs_vars().next().unwrap();
        let y = CSVarId::new(x.index() + 1);
        assert_eq!(result.points_to(Pointer::Var(x)), result.points_to(Pointer::Var(y)));
        assert_eq!(result.points_to(Pointer::Var(y)).len(), 1);
    }

    #[test]
    fn cancellation_before_run_loop_leaves_propagation_incomplete() {
        let main = TestMethod(Rc::new(MethodData {
            declaring_class: "Main",
            is_static: true,
            num_locals: 2,
            statements: vec![
                Statement::New { lhs: 0, alloc_type: TestTy::C, dims: 0 },
                Statement::Assign { lhs: 1, rhs: 0 },
            ],
        }));
        let leaf = leaf_method("C");
        let program = TestProgram { hierarchy: TestHierarchy { c_foo: leaf.clone(), d_foo: leaf }, main };

        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut solver = Solver::new(program, solver_config(), cancel);
        solver.solve();
        let result = solver.into_result();

        assert!(result.is_incomplete());
        let x = result.cs_vars().next().unwrap();
        let y = CSVarId::new(x.index() + 1);
        assert_eq!(result.points_to(Pointer::Var(x)).len(), 1, "direct New assignment bypasses the worklist");
        assert!(result.points_to(Pointer::Var(y)).is_empty(), "propagation across the Assign edge never runs");
    }
}
