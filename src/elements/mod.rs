// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Interns every context-qualified entity the solver operates on
//! (spec §4.4): `CSVar`, `CSObj`, `StaticField`, `InstanceField`,
//! `ArrayIndex`, `CSCallSite`, `CSMethod`.
//!
//! Every accessor is idempotent: two lookups with equal keys return the
//! same dense id (spec §3 "Interning is total").

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use crate::context::ContextId;
use crate::heap::Obj;
use crate::ir::{AllocSite, JField, JMethod, Local};
use crate::util::bit_vec::Idx;
use crate::util::indexer::{Indexer, MappedIndexer};

macro_rules! dense_id {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl Idx for $name {
            fn new(idx: usize) -> Self {
                assert!(idx <= u32::MAX as usize);
                $name(idx as u32)
            }
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

dense_id!(CSVarId);
dense_id!(CSObjId);
dense_id!(StaticFieldId);
dense_id!(InstanceFieldId);
dense_id!(ArrayIndexId);
dense_id!(CSCallSiteId);
dense_id!(CSMethodId);

/// A context-qualified local variable.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CSVar<M: JMethod> {
    pub context: ContextId,
    pub method: Rc<M>,
    pub local: Local,
}

/// A context-qualified heap object: `(heapContext, Obj)` (spec §3).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CSObj<M: JMethod> {
    pub context: ContextId,
    pub obj: Rc<Obj<M>>,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StaticFieldPtr<M: JMethod> {
    pub field: M::Field,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InstanceFieldPtr<M: JMethod> {
    pub base: CSObjId,
    pub field: M::Field,
}

/// Array-element pointer keyed by the array object alone; no index or
/// length component (spec §4.5 "Zero-sized / empty-array caveat").
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayIndexPtr {
    pub base: CSObjId,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CSCallSite<M: JMethod> {
    pub context: ContextId,
    pub method: Rc<M>,
    pub stmt_index: u32,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CSMethod<M: JMethod> {
    pub context: ContextId,
    pub method: Rc<M>,
}

/// The four kinds of pointer flow can target, unified into one discriminated
/// union so the pointer-flow graph can be keyed on a single hashable type
/// (spec §3 `Pointer`, §9 "tagged unions").
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Pointer {
    Var(CSVarId),
    StaticField(StaticFieldId),
    InstanceField(InstanceFieldId),
    ArrayIndex(ArrayIndexId),
}

/// Owns every intern table; the sole authority creating CS-qualified
/// identities (spec §3 "Ownership").
pub struct ElementManager<M: JMethod> {
    vars: MappedIndexer<CSVar<M>>,
    objs: MappedIndexer<CSObj<M>>,
    static_fields: MappedIndexer<StaticFieldPtr<M>>,
    instance_fields: MappedIndexer<InstanceFieldPtr<M>>,
    array_indexes: MappedIndexer<ArrayIndexPtr>,
    call_sites: MappedIndexer<CSCallSite<M>>,
    methods: MappedIndexer<CSMethod<M>>,
}

impl<M: JMethod> Default for ElementManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: JMethod> ElementManager<M> {
    pub fn new() -> Self {
        ElementManager {
            vars: MappedIndexer::new(),
            objs: MappedIndexer::new(),
            static_fields: MappedIndexer::new(),
            instance_fields: MappedIndexer::new(),
            array_indexes: MappedIndexer::new(),
            call_sites: MappedIndexer::new(),
            methods: MappedIndexer::new(),
        }
    }

    pub fn get_cs_var(&mut self, context: ContextId, method: Rc<M>, local: Local) -> CSVarId {
        CSVarId(self.vars.index_of(&CSVar { context, method, local }))
    }

    pub fn cs_var(&self, id: CSVarId) -> CSVar<M> {
        self.vars.value_of(id.0).expect("interned CSVarId")
    }

    pub fn get_cs_obj(&mut self, context: ContextId, obj: Rc<Obj<M>>) -> CSObjId {
        CSObjId(self.objs.index_of(&CSObj { context, obj }))
    }

    pub fn cs_obj(&self, id: CSObjId) -> CSObj<M> {
        self.objs.value_of(id.0).expect("interned CSObjId")
    }

    pub fn get_static_field(&mut self, field: M::Field) -> StaticFieldId {
        StaticFieldId(self.static_fields.index_of(&StaticFieldPtr { field }))
    }

    pub fn static_field(&self, id: StaticFieldId) -> StaticFieldPtr<M> {
        self.static_fields.value_of(id.0).expect("interned StaticFieldId")
    }

    pub fn get_instance_field(&mut self, base: CSObjId, field: M::Field) -> InstanceFieldId {
        InstanceFieldId(self.instance_fields.index_of(&InstanceFieldPtr { base, field }))
    }

    pub fn instance_field(&self, id: InstanceFieldId) -> InstanceFieldPtr<M> {
        self.instance_fields.value_of(id.0).expect("interned InstanceFieldId")
    }

    pub fn get_array_index(&mut self, base: CSObjId) -> ArrayIndexId {
        ArrayIndexId(self.array_indexes.index_of(&ArrayIndexPtr { base }))
    }

    pub fn array_index(&self, id: ArrayIndexId) -> ArrayIndexPtr {
        self.array_indexes.value_of(id.0).expect("interned ArrayIndexId")
    }

    pub fn get_cs_call_site(&mut self, context: ContextId, method: Rc<M>, stmt_index: u32) -> CSCallSiteId {
        CSCallSiteId(self.call_sites.index_of(&CSCallSite { context, method, stmt_index }))
    }

    pub fn cs_call_site(&self, id: CSCallSiteId) -> CSCallSite<M> {
        self.call_sites.value_of(id.0).expect("interned CSCallSiteId")
    }

    pub fn get_cs_method(&mut self, context: ContextId, method: Rc<M>) -> CSMethodId {
        CSMethodId(self.methods.index_of(&CSMethod { context, method }))
    }

    pub fn cs_method(&self, id: CSMethodId) -> CSMethod<M> {
        self.methods.value_of(id.0).expect("interned CSMethodId")
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_objs(&self) -> usize {
        self.objs.len()
    }

    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    pub fn num_static_fields(&self) -> usize {
        self.static_fields.len()
    }

    pub fn num_instance_fields(&self) -> usize {
        self.instance_fields.len()
    }

    pub fn num_array_indexes(&self) -> usize {
        self.array_indexes.len()
    }
}

pub type AllocSiteOf<M> = AllocSite<M>;

/// Textual forms used for sorting and rendering in the dump format (spec
/// §6 "each sorted by `toString`"). Not derived from `Debug`: these need to
/// be stable and readable independent of how the frontend derives it.
impl<M: JMethod> fmt::Display for CSVar<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:%{}[ctx={}]", self.method.declaring_class(), self.method.signature(), self.local, self.context.as_u32())
    }
}

impl<M: JMethod> fmt::Display for CSObj<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[ctx={}]", self.obj, self.context.as_u32())
    }
}

impl<M: JMethod> fmt::Display for StaticFieldPtr<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.field.declaring_class(), self.field.name())
    }
}

impl<M: JMethod> fmt::Display for InstanceFieldPtr<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.base.0, self.field.name())
    }
}

impl fmt::Display for ArrayIndexPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[*]", self.base.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{JField, MethodSig, Statement, Type};

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
    struct TestMethod(u32);
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

    #[test]
    fn interning_cs_vars_is_idempotent() {
        let mut mgr: ElementManager<TestMethod> = ElementManager::new();
        let m = Rc::new(TestMethod(1));
        let v1 = mgr.get_cs_var(ContextId::default(), m.clone(), 0);
        let v2 = mgr.get_cs_var(ContextId::default(), m.clone(), 0);
        assert_eq!(v1, v2);
        let v3 = mgr.get_cs_var(ContextId::default(), m, 1);
        assert_ne!(v1, v3);
        assert_eq!(mgr.num_vars(), 2);
    }

    #[test]
    fn array_index_identity_ignores_length() {
        let mut mgr: ElementManager<TestMethod> = ElementManager::new();
        let m = Rc::new(TestMethod(1));
        let obj = Rc::new(crate::heap::Obj {
            kind: crate::heap::ObjKind::Alloc(AllocSite { method: m, stmt_index: 0 }),
            ty: TestTy,
        });
        let cs_obj = mgr.get_cs_obj(ContextId::default(), obj);
        let a1 = mgr.get_array_index(cs_obj);
        let a2 = mgr.get_array_index(cs_obj);
        assert_eq!(a1, a2);
    }
}
