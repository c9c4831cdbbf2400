// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! A minimal JSON-encoded `IrProgram` loader, the frontend the `pta` binary
//! actually runs against. Building an IR from class files is out of scope
//! (spec §12); this instead deserializes an already-built whole-program IR,
//! the same way the teacher decodes its `PTA_FLAGS` payload with
//! `serde_json` rather than hand-rolling a parser.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::Deserialize;

use crate::ir::{ClassHierarchy, InvokeKind, IrProgram, JField, JMethod, Local, MethodSig, Statement, Type};

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Semantic(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "{e}"),
            LoadError::Json(e) => write!(f, "{e}"),
            LoadError::Semantic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct TypeData {
    name: String,
    is_array: bool,
    element: Option<JsonType>,
    is_primitive: bool,
}

/// A nominal type named in the input file: a class, interface, array, or
/// primitive, interned by value so clones stay cheap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JsonType(Rc<TypeData>);

impl JsonType {
    fn leaf(name: &str) -> JsonType {
        JsonType(Rc::new(TypeData { name: name.to_string(), is_array: false, element: None, is_primitive: false }))
    }

    fn new(name: &str, is_array: bool, element: Option<JsonType>, is_primitive: bool) -> JsonType {
        JsonType(Rc::new(TypeData { name: name.to_string(), is_array, element, is_primitive }))
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

impl Type for JsonType {
    fn qualified_name(&self) -> &str {
        &self.0.name
    }
    fn is_array(&self) -> bool {
        self.0.is_array
    }
    fn array_element_type(&self) -> Option<Self> {
        self.0.element.clone()
    }
    fn is_primitive(&self) -> bool {
        self.0.is_primitive
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JsonField {
    name: String,
    declaring_class: String,
    field_type: JsonType,
    is_static: bool,
}

impl JField for JsonField {
    type Ty = JsonType;
    fn name(&self) -> &str {
        &self.name
    }
    fn declaring_class(&self) -> &str {
        &self.declaring_class
    }
    fn field_type(&self) -> JsonType {
        self.field_type.clone()
    }
    fn is_static(&self) -> bool {
        self.is_static
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JsonSig(Rc<str>);

impl fmt::Display for JsonSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl MethodSig for JsonSig {
    fn name(&self) -> &str {
        &self.0
    }
}

struct MethodData {
    declaring_class: String,
    signature: JsonSig,
    is_static: bool,
    param_types: Vec<JsonType>,
    return_type: JsonType,
    num_locals: u32,
    local_types: Vec<JsonType>,
    statements: Option<Vec<Statement<JsonMethod>>>,
}

impl fmt::Debug for MethodData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_class, self.signature)
    }
}

/// A method handle, identified by `Rc` pointer rather than structurally, the
/// same convention the test-only `JMethod` implementations use.
#[derive(Clone, Debug)]
pub struct JsonMethod(Rc<MethodData>);

impl PartialEq for JsonMethod {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for JsonMethod {}
impl Hash for JsonMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl JMethod for JsonMethod {
    type Ty = JsonType;
    type Field = JsonField;
    type Sig = JsonSig;

    fn declaring_class(&self) -> &str {
        &self.0.declaring_class
    }
    fn signature(&self) -> JsonSig {
        self.0.signature.clone()
    }
    fn is_static(&self) -> bool {
        self.0.is_static
    }
    fn param_types(&self) -> &[JsonType] {
        &self.0.param_types
    }
    fn return_type(&self) -> JsonType {
        self.0.return_type.clone()
    }
    fn num_locals(&self) -> u32 {
        self.0.num_locals
    }
    fn local_type(&self, local: Local) -> JsonType {
        self.0.local_types.get(local as usize).cloned().unwrap_or_else(|| self.0.return_type.clone())
    }
    fn statements(&self) -> Option<&[Statement<Self>]> {
        self.0.statements.as_deref()
    }
}

struct ClassInfo {
    super_class: Option<String>,
    interfaces: Vec<String>,
    is_application: bool,
}

/// Class-hierarchy queries resolved by walking `super_class`/`interfaces`
/// chains recorded in the input file. Dispatch ties are broken by whichever
/// ancestor is visited first; a class file with diamond inheritance and
/// conflicting overrides is expected to declare them unambiguously.
pub struct JsonHierarchy {
    classes: HashMap<String, ClassInfo>,
    methods: HashMap<(String, String), JsonMethod>,
    fields: HashMap<(String, String), JsonField>,
    types: HashMap<String, JsonType>,
}

impl JsonHierarchy {
    /// Looks up a type declared in the input file, falling back to a fresh
    /// non-array, non-primitive type for names the file never declares as a
    /// class (used by the CLI to resolve marker types like
    /// `java.lang.invoke.MethodType` for plug-in wiring).
    pub fn type_named(&self, name: &str) -> JsonType {
        self.types.get(name).cloned().unwrap_or_else(|| JsonType::leaf(name))
    }

    fn ancestors(&self, start: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut frontier = vec![start.to_string()];
        let mut visited = HashSet::new();
        while let Some(name) = frontier.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            order.push(name.clone());
            if let Some(info) = self.classes.get(&name) {
                if let Some(sup) = &info.super_class {
                    frontier.push(sup.clone());
                }
                frontier.extend(info.interfaces.iter().cloned());
            }
        }
        order
    }
}

impl ClassHierarchy for JsonHierarchy {
    type Method = JsonMethod;

    fn is_subtype(&self, sub: &JsonType, sup: &JsonType) -> bool {
        if sub == sup {
            return true;
        }
        if sup.qualified_name() == "java.lang.Object" && !sub.is_primitive() {
            return true;
        }
        if sub.is_array() && sup.is_array() {
            return match (sub.array_element_type(), sup.array_element_type()) {
                (Some(se), Some(pe)) => self.is_subtype(&se, &pe),
                _ => false,
            };
        }
        self.ancestors(sub.qualified_name()).iter().any(|a| a == sup.qualified_name())
    }

    fn resolve_virtual(&self, receiver_type: &JsonType, signature: &JsonSig) -> Option<JsonMethod> {
        self.ancestors(receiver_type.qualified_name())
            .into_iter()
            .find_map(|class| self.methods.get(&(class, signature.name().to_string())))
            .cloned()
    }

    fn resolve_direct(&self, declaring_class: &str, signature: &JsonSig) -> Option<JsonMethod> {
        self.methods.get(&(declaring_class.to_string(), signature.name().to_string())).cloned()
    }

    fn resolve_field(&self, field: &JsonField) -> JsonField {
        self.ancestors(&field.declaring_class)
            .into_iter()
            .find_map(|class| self.fields.get(&(class, field.name.clone())))
            .cloned()
            .unwrap_or_else(|| field.clone())
    }
}

pub struct JsonProgram {
    hierarchy: JsonHierarchy,
    entry_points: Vec<JsonMethod>,
}

impl IrProgram for JsonProgram {
    type Hierarchy = JsonHierarchy;

    fn hierarchy(&self) -> &JsonHierarchy {
        &self.hierarchy
    }

    fn entry_points(&self) -> Vec<JsonMethod> {
        self.entry_points.clone()
    }

    fn is_application_class(&self, class_name: &str) -> bool {
        self.hierarchy.classes.get(class_name).map(|c| c.is_application).unwrap_or(false)
    }
}

#[derive(Deserialize)]
struct ProgramFile {
    #[serde(default)]
    classes: Vec<ClassFile>,
    entry_points: Vec<EntryPointFile>,
}

#[derive(Deserialize)]
struct EntryPointFile {
    class: String,
    method: String,
}

#[derive(Deserialize)]
struct ClassFile {
    name: String,
    #[serde(default)]
    super_class: Option<String>,
    #[serde(default)]
    interfaces: Vec<String>,
    #[serde(default)]
    is_application: bool,
    #[serde(default)]
    is_array: bool,
    #[serde(default)]
    element_type: Option<String>,
    #[serde(default)]
    is_primitive: bool,
    #[serde(default)]
    fields: Vec<FieldFile>,
    #[serde(default)]
    methods: Vec<MethodFile>,
}

#[derive(Deserialize)]
struct FieldFile {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    is_static: bool,
}

fn default_return_type() -> String {
    "java.lang.Object".to_string()
}

#[derive(Deserialize)]
struct MethodFile {
    name: String,
    #[serde(default)]
    is_static: bool,
    #[serde(default)]
    param_types: Vec<String>,
    #[serde(default = "default_return_type")]
    return_type: String,
    num_locals: u32,
    #[serde(default)]
    local_types: Vec<String>,
    #[serde(default)]
    statements: Option<Vec<StatementFile>>,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum StatementFile {
    New {
        lhs: Local,
        alloc_type: String,
        #[serde(default)]
        dims: u32,
    },
    Assign {
        lhs: Local,
        rhs: Local,
    },
    Cast {
        lhs: Local,
        rhs: Local,
        cast_type: String,
    },
    LoadField {
        lhs: Local,
        #[serde(default)]
        base: Option<Local>,
        field_class: String,
        field_name: String,
    },
    StoreField {
        #[serde(default)]
        base: Option<Local>,
        field_class: String,
        field_name: String,
        rhs: Local,
    },
    LoadArray {
        lhs: Local,
        base: Local,
    },
    StoreArray {
        base: Local,
        rhs: Local,
    },
    Invoke {
        #[serde(default)]
        result: Option<Local>,
        kind: String,
        #[serde(default)]
        base: Option<Local>,
        #[serde(default)]
        static_declaring_class: Option<String>,
        method: String,
        #[serde(default)]
        args: Vec<Local>,
    },
    Return {
        #[serde(default)]
        value: Option<Local>,
    },
}

fn build_type(name: &str, classes: &HashMap<String, ClassFile>, cache: &mut HashMap<String, JsonType>) -> JsonType {
    if let Some(t) = cache.get(name) {
        return t.clone();
    }
    let Some(cf) = classes.get(name) else {
        let t = JsonType::leaf(name);
        cache.insert(name.to_string(), t.clone());
        return t;
    };
    // Guards against a class file that names itself as its own element type.
    cache.insert(name.to_string(), JsonType::leaf(name));
    let element = cf.element_type.as_deref().map(|e| build_type(e, classes, cache));
    let t = JsonType::new(name, cf.is_array, element, cf.is_primitive);
    cache.insert(name.to_string(), t.clone());
    t
}

fn resolve_ty(name: &str, types: &mut HashMap<String, JsonType>) -> JsonType {
    types.entry(name.to_string()).or_insert_with(|| JsonType::leaf(name)).clone()
}

fn parse_invoke_kind(kind: &str) -> Result<InvokeKind, LoadError> {
    Ok(match kind {
        "static" => InvokeKind::Static,
        "virtual" => InvokeKind::Virtual,
        "special" => InvokeKind::Special,
        "interface" => InvokeKind::Interface,
        "dynamic" => InvokeKind::Dynamic,
        other => return Err(LoadError::Semantic(format!("unknown invoke kind '{other}'"))),
    })
}

fn lookup_field(fields: &HashMap<(String, String), JsonField>, class: &str, name: &str) -> Result<JsonField, LoadError> {
    fields
        .get(&(class.to_string(), name.to_string()))
        .cloned()
        .ok_or_else(|| LoadError::Semantic(format!("statement references undeclared field {class}.{name}")))
}

fn build_statement(
    stmt: &StatementFile,
    fields: &HashMap<(String, String), JsonField>,
    types: &mut HashMap<String, JsonType>,
) -> Result<Statement<JsonMethod>, LoadError> {
    Ok(match stmt {
        StatementFile::New { lhs, alloc_type, dims } => {
            Statement::New { lhs: *lhs, alloc_type: resolve_ty(alloc_type, types), dims: *dims }
        }
        StatementFile::Assign { lhs, rhs } => Statement::Assign { lhs: *lhs, rhs: *rhs },
        StatementFile::Cast { lhs, rhs, cast_type } => {
            Statement::Cast { lhs: *lhs, rhs: *rhs, cast_type: resolve_ty(cast_type, types) }
        }
        StatementFile::LoadField { lhs, base, field_class, field_name } => {
            Statement::LoadField { lhs: *lhs, base: *base, field: lookup_field(fields, field_class, field_name)? }
        }
        StatementFile::StoreField { base, field_class, field_name, rhs } => {
            Statement::StoreField { base: *base, field: lookup_field(fields, field_class, field_name)?, rhs: *rhs }
        }
        StatementFile::LoadArray { lhs, base } => Statement::LoadArray { lhs: *lhs, base: *base },
        StatementFile::StoreArray { base, rhs } => Statement::StoreArray { base: *base, rhs: *rhs },
        StatementFile::Invoke { result, kind, base, static_declaring_class, method, args } => Statement::Invoke {
            result: *result,
            kind: parse_invoke_kind(kind)?,
            base: *base,
            static_declaring_class: static_declaring_class.clone(),
            signature: JsonSig(Rc::from(method.as_str())),
            args: args.clone(),
        },
        StatementFile::Return { value } => Statement::Return { value: *value },
    })
}

fn build_program(file: ProgramFile) -> Result<JsonProgram, LoadError> {
    let classes_by_name: HashMap<String, ClassFile> = file.classes.into_iter().map(|c| (c.name.clone(), c)).collect();

    let mut types: HashMap<String, JsonType> = HashMap::new();
    let names: Vec<String> = classes_by_name.keys().cloned().collect();
    for name in &names {
        build_type(name, &classes_by_name, &mut types);
    }

    let mut field_registry: HashMap<(String, String), JsonField> = HashMap::new();
    for cf in classes_by_name.values() {
        for f in &cf.fields {
            let field_type = resolve_ty(&f.ty, &mut types);
            field_registry.insert(
                (cf.name.clone(), f.name.clone()),
                JsonField { name: f.name.clone(), declaring_class: cf.name.clone(), field_type, is_static: f.is_static },
            );
        }
    }

    let mut methods: HashMap<(String, String), JsonMethod> = HashMap::new();
    for cf in classes_by_name.values() {
        for mf in &cf.methods {
            let param_types = mf.param_types.iter().map(|t| resolve_ty(t, &mut types)).collect();
            let return_type = resolve_ty(&mf.return_type, &mut types);
            let local_types = mf.local_types.iter().map(|t| resolve_ty(t, &mut types)).collect();
            let statements = match &mf.statements {
                Some(stmts) => {
                    Some(stmts.iter().map(|s| build_statement(s, &field_registry, &mut types)).collect::<Result<Vec<_>, _>>()?)
                }
                None => None,
            };
            let data = MethodData {
                declaring_class: cf.name.clone(),
                signature: JsonSig(Rc::from(mf.name.as_str())),
                is_static: mf.is_static,
                param_types,
                return_type,
                num_locals: mf.num_locals,
                local_types,
                statements,
            };
            methods.insert((cf.name.clone(), mf.name.clone()), JsonMethod(Rc::new(data)));
        }
    }

    let classes = classes_by_name
        .into_iter()
        .map(|(name, cf)| (name, ClassInfo { super_class: cf.super_class, interfaces: cf.interfaces, is_application: cf.is_application }))
        .collect();

    let hierarchy = JsonHierarchy { classes, methods: methods.clone(), fields: field_registry, types };

    let mut entry_points = Vec::with_capacity(file.entry_points.len());
    for ep in &file.entry_points {
        let method = methods
            .get(&(ep.class.clone(), ep.method.clone()))
            .cloned()
            .ok_or_else(|| LoadError::Semantic(format!("entry point {}.{} is not declared", ep.class, ep.method)))?;
        entry_points.push(method);
    }

    Ok(JsonProgram { hierarchy, entry_points })
}

/// Loads a whole-program IR from the JSON file at `path` (spec §6 "Input").
pub fn load_program(path: &str) -> Result<JsonProgram, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let file: ProgramFile = serde_json::from_str(&text)?;
    build_program(file)
}
