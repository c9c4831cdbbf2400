// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The frontend boundary: traits a caller implements to feed a program into
//! the solver.
//!
//! Constructing this IR from source (parsing, building a class hierarchy,
//! computing subtyping) is out of scope here (spec §6, §12): the engine only
//! consumes it. `tests/support` implements these traits over a small
//! in-memory program for the seed scenarios.

use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

pub mod json;

/// A local variable slot within one method body, including the (optional)
/// receiver/parameter slots and the method's formal result.
pub type Local = u32;

/// A nominal type: a class, interface, array, or primitive.
pub trait Type: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// Fully qualified name, stable across the run; used as dump/compare key
    /// material and as the `HashMap`/interning key for constant objects.
    fn qualified_name(&self) -> &str;

    fn is_array(&self) -> bool;

    /// The element type of an array type; `None` for non-arrays.
    fn array_element_type(&self) -> Option<Self>;

    fn is_primitive(&self) -> bool;
}

/// An immutable handle to a field declaration.
pub trait JField: Clone + Eq + Hash + fmt::Debug {
    type Ty: Type;

    fn name(&self) -> &str;
    fn declaring_class(&self) -> &str;
    fn field_type(&self) -> Self::Ty;
    fn is_static(&self) -> bool;
}

/// A call target signature: declaring class is resolved separately by
/// dispatch, this just carries the invoked subsignature.
pub trait MethodSig: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    fn name(&self) -> &str;
}

/// How a call site invokes its target; drives dispatch in the solver
/// (spec §4.6 "Dispatch").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvokeKind {
    Static,
    Virtual,
    Special,
    Interface,
    Dynamic,
}

/// One IR statement within a method body, translated into PFG edges and/or
/// deferred obligations at method-reachable time (spec §4.6 "Statement
/// translation").
#[derive(Clone, Debug)]
pub enum Statement<M: JMethod> {
    /// `x = new T`, `x = new T[len]`, or a chained multi-dimensional array
    /// allocation (`dims > 1` means this site also owns `dims - 1` nested
    /// array allocations at the same program point).
    New {
        lhs: Local,
        alloc_type: M::Ty,
        dims: u32,
    },
    /// `x = y`.
    Assign { lhs: Local, rhs: Local },
    /// `x = (T) y`.
    Cast { lhs: Local, rhs: Local, cast_type: M::Ty },
    /// `x = T.f` (static) or `x = y.f` (instance, `base = Some(y)`).
    LoadField {
        lhs: Local,
        base: Option<Local>,
        field: M::Field,
    },
    /// `T.f = x` or `y.f = x`.
    StoreField {
        base: Option<Local>,
        field: M::Field,
        rhs: Local,
    },
    /// `x = y[i]`; the index is not tracked (spec §4.5 zero-sized/index
    /// insensitivity).
    LoadArray { lhs: Local, base: Local },
    /// `y[i] = x`.
    StoreArray { base: Local, rhs: Local },
    /// A call of any `InvokeKind`. `base` is the receiver local for
    /// `Virtual`/`Special`/`Interface`/`Dynamic`, `None` for `Static`.
    /// `static_declaring_class` names the class a `Static` or `Special`
    /// call resolves against directly (dispatch for `Virtual`/`Interface`
    /// instead follows the receiver's runtime type, spec §4.6 "Dispatch").
    Invoke {
        result: Option<Local>,
        kind: InvokeKind,
        base: Option<Local>,
        static_declaring_class: Option<String>,
        signature: M::Sig,
        args: Vec<Local>,
    },
    Return { value: Option<Local> },
}

/// An immutable handle to a method declaration, generic over its own
/// field/signature/type associated kinds so `Statement<M>` can be built
/// without a circular trait dependency.
pub trait JMethod: Clone + Eq + Hash + fmt::Debug {
    type Ty: Type;
    type Field: JField<Ty = Self::Ty>;
    type Sig: MethodSig;

    fn declaring_class(&self) -> &str;
    fn signature(&self) -> Self::Sig;
    fn is_static(&self) -> bool;

    /// Declared parameter types, in order; the receiver (if any) is not
    /// included.
    fn param_types(&self) -> &[Self::Ty];
    fn return_type(&self) -> Self::Ty;

    /// Locals: index 0 is `this` for instance methods, followed by
    /// parameters, followed by the remaining body locals.
    fn num_locals(&self) -> u32;
    fn local_type(&self, local: Local) -> Self::Ty;

    /// `None` for methods without a body (spec §7 "Missing CFG": treated as
    /// an empty body).
    fn statements(&self) -> Option<&[Statement<Self>]>
    where
        Self: Sized;
}

/// Class-hierarchy queries needed for dispatch and field resolution
/// (spec §6 "class hierarchy").
pub trait ClassHierarchy {
    type Method: JMethod;

    /// Whether `sub` is a subtype of (or equal to) `sup`.
    fn is_subtype(&self, sub: &<Self::Method as JMethod>::Ty, sup: &<Self::Method as JMethod>::Ty) -> bool;

    /// Resolves a virtual/interface dispatch: given the runtime type of the
    /// receiver and an invoked subsignature, returns the overriding method,
    /// if any is found (spec §7 "Dispatch failure" when `None`).
    fn resolve_virtual(
        &self,
        receiver_type: &<Self::Method as JMethod>::Ty,
        signature: &<Self::Method as JMethod>::Sig,
    ) -> Option<Self::Method>;

    /// Resolves a static or special (super/constructor/private) call
    /// directly by declaring class and subsignature.
    fn resolve_direct(&self, declaring_class: &str, signature: &<Self::Method as JMethod>::Sig) -> Option<Self::Method>;

    /// Resolves the declaring class that actually stores `field` when
    /// accessed via `accessed_from` (handles inherited static fields, as in
    /// scenario S4).
    fn resolve_field(&self, field: &<Self::Method as JMethod>::Field) -> <Self::Method as JMethod>::Field;
}

/// The whole program: entry points plus whatever the class hierarchy needs
/// to look up methods by name (spec §6 "Entry-method specification").
pub trait IrProgram {
    type Hierarchy: ClassHierarchy;

    fn hierarchy(&self) -> &Self::Hierarchy;

    /// Entry methods: the designated `main(String[])` plus any configured
    /// extension list.
    fn entry_points(&self) -> Vec<<Self::Hierarchy as ClassHierarchy>::Method>;

    /// Whether `class_name` belongs to the application (vs. a library),
    /// consulted when `only-app` is set.
    fn is_application_class(&self, class_name: &str) -> bool;
}

pub type MethodOf<P> = <<P as IrProgram>::Hierarchy as ClassHierarchy>::Method;
pub type TypeOf<P> = <MethodOf<P> as JMethod>::Ty;
pub type FieldOf<P> = <MethodOf<P> as JMethod>::Field;
pub type SigOf<P> = <MethodOf<P> as JMethod>::Sig;

/// An allocation site identity: declaring method plus the statement index
/// of the `New`, shared by the heap model to build `Obj` identities.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AllocSite<M> {
    pub method: Rc<M>,
    pub stmt_index: u32,
}

impl<M: fmt::Debug> fmt::Display for AllocSite<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.method, self.stmt_index)
    }
}
