// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The `pta` command-line entry point: loads a JSON-encoded whole-program
//! IR, runs the pointer analysis, and writes the requested dumps (spec §6).

use std::fs;
use std::process::ExitCode as ProcessExitCode;
use std::time::Duration;

use log::{info, warn};

use pta::error::{AnalysisError, ExitCode};
use pta::ir::json;
use pta::ir::IrProgram;
use pta::options::AnalysisOptions;
use pta::plugin::{InvokedynamicPlugin, MethodTypePlugin, ReflectionPlugin, ResultProcessorPlugin, TaintConfig, TaintPlugin};
use pta::solver::{CancellationToken, Solver, SolverConfig};
use pta::{compare, dump};

fn register_plugins(solver: &mut Solver<json::JsonProgram>, options: &AnalysisOptions) -> Result<(), AnalysisError> {
    let method_type_class = solver.program().hierarchy().type_named("java.lang.invoke.MethodType");
    let taint_marker_class = solver.program().hierarchy().type_named("java.lang.Object");

    for name in &options.plugins {
        match name.as_str() {
            "method-type" => solver.register_plugin(Box::new(MethodTypePlugin::new(method_type_class.clone()))),
            "invokedynamic" => solver.register_plugin(Box::new(InvokedynamicPlugin)),
            "reflection" => solver.register_plugin(Box::new(ReflectionPlugin::new())),
            "result-processor" => solver.register_plugin(Box::new(ResultProcessorPlugin)),
            "taint" => {
                let path = options
                    .taint_config
                    .as_ref()
                    .ok_or_else(|| AnalysisError::Configuration("--plugins taint requires --taint-config".to_string()))?;
                let text = fs::read_to_string(path)
                    .map_err(|e| AnalysisError::Configuration(format!("failed to read '{path}': {e}")))?;
                let config: TaintConfig = serde_json::from_str(&text)
                    .map_err(|e| AnalysisError::Configuration(format!("malformed taint config '{path}': {e}")))?;
                solver.register_plugin(Box::new(TaintPlugin::new(config, taint_marker_class.clone())));
            }
            other => return Err(AnalysisError::Configuration(format!("unknown plug-in '{other}'"))),
        }
    }
    Ok(())
}

fn write_dumps(options: &AnalysisOptions, result: &pta::result::PtaResult<json::JsonProgram>) -> Result<(), AnalysisError> {
    let mut wrote_any = false;
    if let Some(path) = &options.dump_output {
        fs::write(path, dump::dump(result)).map_err(|e| AnalysisError::Configuration(format!("failed to write '{path}': {e}")))?;
        wrote_any = true;
    }
    if let Some(path) = &options.dump_ci_output {
        fs::write(path, dump::dump_ci(result)).map_err(|e| AnalysisError::Configuration(format!("failed to write '{path}': {e}")))?;
        wrote_any = true;
    }
    if !wrote_any && options.expected_file.is_none() {
        print!("{}", dump::dump(result));
    }
    Ok(())
}

fn spawn_time_limit(cancel: CancellationToken, limit: Duration) {
    std::thread::spawn(move || {
        std::thread::sleep(limit);
        cancel.cancel();
    });
}

fn run(options: AnalysisOptions) -> anyhow::Result<()> {
    let program = json::load_program(&options.input)
        .map_err(|e| AnalysisError::Configuration(format!("failed to load '{}': {e}", options.input)))?;

    let config = SolverConfig {
        context_selector: options.context_selector,
        heap_merge_policy: options.heap_merge_policy,
        only_app: options.only_app,
    };

    let cancel = CancellationToken::new();
    if let Some(limit) = options.time_limit {
        spawn_time_limit(cancel.clone(), limit);
    }

    let mut solver = Solver::new(program, config, cancel);
    register_plugins(&mut solver, &options)?;

    info!("starting analysis of '{}'", options.input);
    solver.solve();
    let result = solver.into_result();
    if result.is_incomplete() {
        warn!("analysis was cancelled before reaching a fixed point; the result is partial");
    }

    write_dumps(&options, &result)?;

    if let Some(path) = &options.expected_file {
        let expected = fs::read_to_string(path).map_err(|e| AnalysisError::Configuration(format!("failed to read '{path}': {e}")))?;
        compare::compare(&result, &expected)?;
    }

    Ok(())
}

fn init_logger() {
    if std::env::var("PTA_LOG").is_ok() {
        let env = env_logger::Env::new().filter("PTA_LOG").write_style("PTA_LOG_STYLE");
        env_logger::init_from_env(env);
    } else {
        env_logger::init();
    }
}

fn main() -> ProcessExitCode {
    init_logger();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match AnalysisOptions::parse_from_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            return ProcessExitCode::from(ExitCode::Configuration as u8);
        }
    };

    match run(options) {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            eprintln!("{err:#}");
            let code = err.downcast_ref::<AnalysisError>().map(ExitCode::from).unwrap_or(ExitCode::Internal);
            ProcessExitCode::from(code as u8)
        }
    }
}
