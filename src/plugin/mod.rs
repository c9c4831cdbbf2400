// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Built-in plug-ins (spec §4.7): `MethodType` folding, invokedynamic,
//! reflection, taint, and a finishing statistics reporter.

pub mod invokedynamic;
pub mod method_type;
pub mod reflection;
pub mod result_processor;
pub mod taint;

pub use invokedynamic::InvokedynamicPlugin;
pub use method_type::MethodTypePlugin;
pub use reflection::ReflectionPlugin;
pub use result_processor::ResultProcessorPlugin;
pub use taint::{TaintConfig, TaintFlow, TaintPlugin, TaintPoint};
