// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Maps IR allocation sites to abstract heap objects, and shares constant
//! objects program-wide (spec §4.2).

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ir::{AllocSite, JMethod, Type};

/// An abstract heap object: either tied to a concrete allocation site, or
/// one of the program-wide constant kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjKind<M: JMethod> {
    /// `x = new T` / `x = new T[len]`.
    Alloc(AllocSite<M>),
    /// One shared object per distinct string value.
    StringConst(Rc<str>),
    /// One shared object per referenced class literal (`T.class`).
    ClassLiteral(M::Ty),
    /// One shared object per `(returnType, paramTypes)` tuple.
    MethodTypeConst { return_type: M::Ty, param_types: Vec<M::Ty> },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Obj<M: JMethod> {
    pub kind: ObjKind<M>,
    pub ty: M::Ty,
}

impl<M: JMethod> fmt::Display for Obj<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ObjKind::Alloc(site) => write!(f, "{}:{}", self.ty, site),
            ObjKind::StringConst(s) => write!(f, "String:{:?}", s),
            ObjKind::ClassLiteral(t) => write!(f, "ClassLiteral:{}", t),
            ObjKind::MethodTypeConst { return_type, param_types } => {
                write!(f, "MethodType:({})->{}",
                    param_types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(","),
                    return_type)
            }
        }
    }
}

/// Which heap-merge policies are active (spec §4.2, options `merge-string-objects`,
/// `merge-string-builders`, `merge-exception-objects`).
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapMergePolicy {
    pub merge_string_objects: bool,
    pub merge_string_builders: bool,
    pub merge_exception_objects: bool,
}

impl HeapMergePolicy {
    /// Whether allocations of `ty` should be merged into one type-keyed
    /// object rather than kept per-allocation-site.
    fn merges_by_type(&self, ty: &str) -> bool {
        (self.merge_string_objects && ty == "java.lang.String")
            || (self.merge_string_builders && (ty == "java.lang.StringBuilder" || ty == "java.lang.StringBuffer"))
            || (self.merge_exception_objects && ty.ends_with("Exception"))
    }
}

/// Deterministic, idempotent translation from IR allocation sites and
/// constant literals to abstract objects.
pub struct HeapModel<M: JMethod> {
    policy: HeapMergePolicy,
    alloc_objs: HashMap<AllocSite<M>, Rc<Obj<M>>>,
    merged_by_type: HashMap<String, Rc<Obj<M>>>,
    string_consts: HashMap<Rc<str>, Rc<Obj<M>>>,
    class_literals: HashMap<M::Ty, Rc<Obj<M>>>,
    method_types: HashMap<(M::Ty, Vec<M::Ty>), Rc<Obj<M>>>,
}

impl<M: JMethod> HeapModel<M> {
    pub fn new(policy: HeapMergePolicy) -> Self {
        HeapModel {
            policy,
            alloc_objs: HashMap::new(),
            merged_by_type: HashMap::new(),
            string_consts: HashMap::new(),
            class_literals: HashMap::new(),
            method_types: HashMap::new(),
        }
    }

    /// Returns the (possibly merged) abstract object for an allocation site
    /// of type `ty`.
    pub fn obj_for_alloc(&mut self, site: AllocSite<M>, ty: M::Ty) -> Rc<Obj<M>> {
        if self.policy.merges_by_type(ty.qualified_name()) {
            let key = ty.qualified_name().to_string();
            return self
                .merged_by_type
                .entry(key)
                .or_insert_with(|| Rc::new(Obj { kind: ObjKind::Alloc(site), ty }))
                .clone();
        }
        self.alloc_objs
            .entry(site.clone())
            .or_insert_with(|| Rc::new(Obj { kind: ObjKind::Alloc(site), ty }))
            .clone()
    }

    pub fn obj_for_string(&mut self, value: &str, string_type: M::Ty) -> Rc<Obj<M>> {
        if let Some(obj) = self.string_consts.get(value) {
            return obj.clone();
        }
        let key: Rc<str> = Rc::from(value);
        let obj = Rc::new(Obj {
            kind: ObjKind::StringConst(key.clone()),
            ty: string_type,
        });
        self.string_consts.insert(key, obj.clone());
        obj
    }

    pub fn obj_for_class_literal(&mut self, referenced: M::Ty, class_type: M::Ty) -> Rc<Obj<M>> {
        self.class_literals
            .entry(referenced.clone())
            .or_insert_with(|| Rc::new(Obj {
                kind: ObjKind::ClassLiteral(referenced),
                ty: class_type,
            }))
            .clone()
    }

    pub fn obj_for_method_type(&mut self, return_type: M::Ty, param_types: Vec<M::Ty>, method_type_type: M::Ty) -> Rc<Obj<M>> {
        let key = (return_type.clone(), param_types.clone());
        self.method_types
            .entry(key)
            .or_insert_with(|| Rc::new(Obj {
                kind: ObjKind::MethodTypeConst { return_type, param_types },
                ty: method_type_type,
            }))
            .clone()
    }
}
