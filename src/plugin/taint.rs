// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Tracks taint sources and sinks, producing `TaintFlow` facts surfaced
//! through the result (spec §4.7 "Taint", §4.8 "extensible named
//! sub-results").

use std::collections::HashMap;

use serde::Deserialize;

use crate::elements::{CSMethodId, CSObjId, CSVarId};
use crate::ir::{AllocSite, InvokeKind, IrProgram, JMethod, MethodOf, MethodSig, Statement};
use crate::solver::plugin::PtaPlugin;
use crate::solver::Solver;

/// `(class, method)` pair identifying a static factory treated as a source
/// or a sink, loaded from the `taint-config` option (spec §6).
#[derive(Clone, Debug, Deserialize)]
pub struct TaintPoint {
    pub class: String,
    pub method: String,
    /// Argument index watched for taint at a sink; unused for sources.
    #[serde(default)]
    pub arg_index: usize,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaintConfig {
    pub sources: Vec<TaintPoint>,
    pub sinks: Vec<TaintPoint>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaintFlow {
    pub source: String,
    pub sink: String,
}

impl std::fmt::Display for TaintFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaintFlow{{source={}, sink={}}}", self.source, self.sink)
    }
}

struct SinkWatch {
    description: String,
}

pub struct TaintPlugin<M: JMethod> {
    config: TaintConfig,
    marker_type: M::Ty,
    source_of: HashMap<CSObjId, String>,
    sink_watchers: HashMap<CSVarId, Vec<SinkWatch>>,
    flows: Vec<TaintFlow>,
}

impl<M: JMethod> TaintPlugin<M> {
    pub fn new(config: TaintConfig, marker_type: M::Ty) -> Self {
        TaintPlugin {
            config,
            marker_type,
            source_of: HashMap::new(),
            sink_watchers: HashMap::new(),
            flows: Vec::new(),
        }
    }

    pub fn flows(&self) -> &[TaintFlow] {
        &self.flows
    }
}

impl<P: IrProgram> PtaPlugin<P> for TaintPlugin<MethodOf<P>> {
    fn handle_new_method(&mut self, solver: &mut Solver<P>, method: CSMethodId) {
        let cs_method = solver.elements().cs_method(method);
        let Some(stmts) = cs_method.method.statements() else {
            return;
        };
        for (idx, stmt) in stmts.iter().enumerate() {
            let Statement::Invoke {
                result,
                kind: InvokeKind::Static,
                static_declaring_class: Some(class_name),
                signature,
                args,
                ..
            } = stmt
            else {
                continue;
            };
            if let Some(src) = self
                .config
                .sources
                .iter()
                .find(|s| &s.class == class_name && s.method == signature.name())
            {
                let Some(result_local) = result else { continue };
                let result_var = solver.elements_mut().get_cs_var(cs_method.context, cs_method.method.clone(), *result_local);
                let site = AllocSite { method: cs_method.method.clone(), stmt_index: idx as u32 };
                let taint_obj = solver.heap_mut().obj_for_alloc(site, self.marker_type.clone());
                let obj_id = solver.intern_obj(cs_method.context, taint_obj);
                self.source_of.insert(obj_id, format!("{}.{}", src.class, src.method));
                solver.add_points_to(result_var, obj_id);
            } else if let Some(sink) = self
                .config
                .sinks
                .iter()
                .find(|s| &s.class == class_name && s.method == signature.name())
            {
                if let Some(&arg_local) = args.get(sink.arg_index) {
                    let arg_var = solver.elements_mut().get_cs_var(cs_method.context, cs_method.method.clone(), arg_local);
                    self.sink_watchers.entry(arg_var).or_default().push(SinkWatch {
                        description: format!("{}.{}", sink.class, sink.method),
                    });
                }
            }
        }
    }

    fn handle_new_points_to_set(&mut self, _solver: &mut Solver<P>, var: CSVarId, diff: &[CSObjId]) {
        let Some(watchers) = self.sink_watchers.get(&var) else {
            return;
        };
        for &obj in diff {
            if let Some(source_desc) = self.source_of.get(&obj) {
                for watch in watchers {
                    self.flows.push(TaintFlow {
                        source: source_desc.clone(),
                        sink: watch.description.clone(),
                    });
                }
            }
        }
    }

    fn on_finish(&mut self, solver: &mut Solver<P>) {
        solver.set_named_result("Taint", self.flows.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taint_config_deserializes_from_json() {
        let json = r#"{
            "sources": [{"class": "Source", "method": "taint"}],
            "sinks": [{"class": "Sink", "method": "sink", "arg_index": 0}]
        }"#;
        let config: TaintConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sinks[0].arg_index, 0);
    }
}
