// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Context-sensitivity policies (spec §4.3): context-insensitive,
//! k-call-site, k-object, k-type, and hybrid.
//!
//! All policies share one context-element shape, [`HybridCtxElem`], rather
//! than a family of selector types each with its own element type — this
//! keeps the solver's context plumbing monomorphic regardless of which
//! `cs` option was chosen at start-up (spec §9 "tagged unions... avoid
//! class hierarchies").

use std::rc::Rc;

use super::{Context, HybridCtxElem};

/// A receiver object as seen by the selector: its interned `Obj` id and the
/// type id used by the k-type policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiverObj {
    pub obj_id: u32,
    pub type_id: u32,
}

/// Computes callee and heap contexts from caller state (spec §4.3
/// contract). A policy is selected once at start-up from the `cs` option
/// and is immutable for the run.
#[derive(Clone, Copy, Debug)]
pub enum ContextSelector {
    Insensitive,
    KCallSite(usize),
    KObject(usize),
    KType(usize),
    /// k-object sensitivity for instance calls, context-insensitive for
    /// static calls — the common default policy.
    Hybrid(usize),
}

impl ContextSelector {
    /// Computes the callee context for a call from `caller_ctx` at
    /// `call_site`, with optional `receiver` (absent for static calls).
    pub fn select_method_context(
        &self,
        caller_ctx: &Rc<Context<HybridCtxElem>>,
        call_site: u32,
        receiver: Option<ReceiverObj>,
    ) -> Rc<Context<HybridCtxElem>> {
        match self {
            ContextSelector::Insensitive => Context::new_empty(),
            ContextSelector::KCallSite(k) => {
                Context::extend_k_limited(caller_ctx, HybridCtxElem::CallSite(call_site), *k)
            }
            ContextSelector::KObject(k) | ContextSelector::KType(k) => match receiver {
                Some(r) => {
                    let elem = match self {
                        ContextSelector::KType(_) => HybridCtxElem::Object(r.type_id),
                        _ => HybridCtxElem::Object(r.obj_id),
                    };
                    Context::extend_k_limited(caller_ctx, elem, *k)
                }
                None => Context::new_empty(),
            },
            ContextSelector::Hybrid(k) => match receiver {
                Some(r) => Context::extend_k_limited(caller_ctx, HybridCtxElem::Object(r.obj_id), *k),
                None => Context::new_empty(),
            },
        }
    }

    /// Computes the heap context for an allocation performed under
    /// `alloc_ctx` at `alloc_site` (identified by the call-site-like id of
    /// its enclosing method invocation).
    pub fn select_heap_context(
        &self,
        alloc_ctx: &Rc<Context<HybridCtxElem>>,
        alloc_site: u32,
    ) -> Rc<Context<HybridCtxElem>> {
        match self {
            ContextSelector::Insensitive => Context::new_empty(),
            ContextSelector::KCallSite(k) => {
                Context::extend_k_limited(alloc_ctx, HybridCtxElem::CallSite(alloc_site), *k)
            }
            ContextSelector::KObject(k) | ContextSelector::Hybrid(k) | ContextSelector::KType(k) => {
                // Heap context for object/type sensitivity is the allocating
                // method's own context, truncated to the same depth.
                let elems: Vec<HybridCtxElem> = alloc_ctx.elems().iter().take(*k).cloned().collect();
                if elems.is_empty() {
                    Context::new_empty()
                } else {
                    let mut ctx = Context::new_empty();
                    for elem in elems.into_iter().rev() {
                        ctx = Context::extend_k_limited(&ctx, elem, *k);
                    }
                    ctx
                }
            }
        }
    }
}
