// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Renders a [`PtaResult`] into the fixed textual dump format (spec §6),
//! grounded on the teacher's `util/results_dumper.rs` writer-based dump
//! routines, adapted from per-node `BufWriter` output to an in-memory
//! string the `pta` binary then writes to `stdout` or a file.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::elements::Pointer;
use crate::ir::{IrProgram, JField, JMethod};
use crate::plugin::TaintFlow;
use crate::result::PtaResult;

fn section(out: &mut String, title: &str, mut lines: Vec<(String, Vec<String>)>) {
    lines.sort_by(|a, b| a.0.cmp(&b.0));
    let _ = writeln!(out, "-- {title} --");
    for (pointer, mut objs) in lines {
        objs.sort();
        let _ = writeln!(out, "{pointer} -> [{}]", objs.join(","));
    }
    out.push('\n');
}

/// The full context-sensitive dump: one section per pointer class, sorted
/// by `toString`, with an empty line between sections (spec §6).
pub fn dump<P: IrProgram>(result: &PtaResult<P>) -> String {
    let mut out = String::new();

    let vars = result
        .cs_vars()
        .filter_map(|v| {
            let pts = result.points_to(Pointer::Var(v));
            if pts.is_empty() {
                return None;
            }
            let key = result.elements().cs_var(v).to_string();
            let objs = pts.into_iter().map(|o| result.elements().cs_obj(o).to_string()).collect();
            Some((key, objs))
        })
        .collect();
    section(&mut out, "variables", vars);

    let static_fields = result
        .static_field_pointers()
        .filter_map(|f| {
            let pts = result.points_to(Pointer::StaticField(f));
            if pts.is_empty() {
                return None;
            }
            let key = result.elements().static_field(f).to_string();
            let objs = pts.into_iter().map(|o| result.elements().cs_obj(o).to_string()).collect();
            Some((key, objs))
        })
        .collect();
    section(&mut out, "static fields", static_fields);

    let instance_fields = result
        .instance_field_pointers()
        .filter_map(|f| {
            let pts = result.points_to(Pointer::InstanceField(f));
            if pts.is_empty() {
                return None;
            }
            let key = result.elements().instance_field(f).to_string();
            let objs = pts.into_iter().map(|o| result.elements().cs_obj(o).to_string()).collect();
            Some((key, objs))
        })
        .collect();
    section(&mut out, "instance fields", instance_fields);

    let array_indexes = result
        .array_index_pointers()
        .filter_map(|a| {
            let pts = result.points_to(Pointer::ArrayIndex(a));
            if pts.is_empty() {
                return None;
            }
            let key = result.elements().array_index(a).to_string();
            let objs = pts.into_iter().map(|o| result.elements().cs_obj(o).to_string()).collect();
            Some((key, objs))
        })
        .collect();
    section(&mut out, "array indexes", array_indexes);

    if let Some(flows) = result.named::<Vec<TaintFlow>>("Taint") {
        let _ = writeln!(out, "Detected {} taint flow(s):", flows.len());
        for flow in flows {
            let _ = writeln!(out, "{flow}");
        }
    }

    out
}

/// The context-insensitive projection: pointers and heap objects are keyed
/// by their underlying, context-stripped identity, and points-to sets
/// collapse accordingly (`dump-ci` option, spec §6).
pub fn dump_ci<P: IrProgram>(result: &PtaResult<P>) -> String {
    let mut out = String::new();

    let mut vars: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for v in result.cs_vars() {
        let pts = result.points_to(Pointer::Var(v));
        if pts.is_empty() {
            continue;
        }
        let cs_var = result.elements().cs_var(v);
        let key = format!("{}.{}:%{}", cs_var.method.declaring_class(), cs_var.method.signature(), cs_var.local);
        let entry = vars.entry(key).or_default();
        for o in pts {
            entry.insert(result.elements().cs_obj(o).obj.to_string());
        }
    }
    section(&mut out, "variables", vars.into_iter().map(|(k, v)| (k, v.into_iter().collect())).collect());

    let mut statics: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for f in result.static_field_pointers() {
        let pts = result.points_to(Pointer::StaticField(f));
        if pts.is_empty() {
            continue;
        }
        let key = result.elements().static_field(f).to_string();
        let entry = statics.entry(key).or_default();
        for o in pts {
            entry.insert(result.elements().cs_obj(o).obj.to_string());
        }
    }
    section(&mut out, "static fields", statics.into_iter().map(|(k, v)| (k, v.into_iter().collect())).collect());

    let mut instance_fields: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for f in result.instance_field_pointers() {
        let pts = result.points_to(Pointer::InstanceField(f));
        if pts.is_empty() {
            continue;
        }
        let ptr = result.elements().instance_field(f);
        let base_text = result.elements().cs_obj(ptr.base).obj.to_string();
        let key = format!("{}.{}", base_text, ptr.field.name());
        let entry = instance_fields.entry(key).or_default();
        for o in pts {
            entry.insert(result.elements().cs_obj(o).obj.to_string());
        }
    }
    section(&mut out, "instance fields", instance_fields.into_iter().map(|(k, v)| (k, v.into_iter().collect())).collect());

    let mut array_indexes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for a in result.array_index_pointers() {
        let pts = result.points_to(Pointer::ArrayIndex(a));
        if pts.is_empty() {
            continue;
        }
        let ptr = result.elements().array_index(a);
        let base_text = result.elements().cs_obj(ptr.base).obj.to_string();
        let key = format!("{base_text}[*]");
        let entry = array_indexes.entry(key).or_default();
        for o in pts {
            entry.insert(result.elements().cs_obj(o).obj.to_string());
        }
    }
    section(&mut out, "array indexes", array_indexes.into_iter().map(|(k, v)| (k, v.into_iter().collect())).collect());

    if let Some(flows) = result.named::<Vec<TaintFlow>>("Taint") {
        let _ = writeln!(out, "Detected {} taint flow(s):", flows.len());
        for flow in flows {
            let _ = writeln!(out, "{flow}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextId;
    use crate::elements::ElementManager;
    use crate::graph::call_graph::CsCallGraph;
    use crate::graph::pfg::PointerFlowGraph;
    use crate::heap::{Obj, ObjKind};
    use crate::ir::{AllocSite, ClassHierarchy, JField, JMethod, MethodSig, Statement, Type};
    use crate::pts_set::points_to::PointsToSet;
    use std::collections::HashMap;
    use std::fmt;
    use std::rc::Rc;

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
    struct TestMethod;
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

    struct TestHierarchy;
    impl ClassHierarchy for TestHierarchy {
        type Method = TestMethod;
        fn is_subtype(&self, _sub: &TestTy, _sup: &TestTy) -> bool {
            true
        }
        fn resolve_virtual(&self, _receiver_type: &TestTy, _signature: &TestSig) -> Option<TestMethod> {
            None
        }
        fn resolve_direct(&self, _declaring_class: &str, _signature: &TestSig) -> Option<TestMethod> {
            None
        }
        fn resolve_field(&self, field: &TestField) -> TestField {
            field.clone()
        }
    }
    struct TestProgram;
    impl IrProgram for TestProgram {
        type Hierarchy = TestHierarchy;
        fn hierarchy(&self) -> &TestHierarchy {
            &TestHierarchy
        }
        fn entry_points(&self) -> Vec<TestMethod> {
            vec![]
        }
        fn is_application_class(&self, _class_name: &str) -> bool {
            true
        }
    }

    #[test]
    fn dump_sorts_sections_and_skips_empty_pointers() {
        let mut elements: ElementManager<TestMethod> = ElementManager::new();
        let mut pfg: PointerFlowGraph<TestMethod> = PointerFlowGraph::new();
        let m = Rc::new(TestMethod);
        let v0 = elements.get_cs_var(ContextId::default(), m.clone(), 0);
        let _v1 = elements.get_cs_var(ContextId::default(), m.clone(), 1);
        let obj = Rc::new(Obj { kind: ObjKind::Alloc(AllocSite { method: m, stmt_index: 0 }), ty: TestTy });
        let cs_obj = elements.get_cs_obj(ContextId::default(), obj);
        pfg.points_to_mut(Pointer::Var(v0)).insert(cs_obj);

        let result: PtaResult<TestProgram> = PtaResult::new(elements, pfg, CsCallGraph::new(), HashMap::new(), false);
        let text = dump(&result);
        assert!(text.contains("-- variables --"));
        assert!(text.contains("-> ["));
        assert!(text.contains("[ctx=0]"));
    }
}
