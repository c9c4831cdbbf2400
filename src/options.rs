// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Command-line options (spec §6), grounded on the teacher's
//! `util/options.rs` `clap::Command` construction, trimmed of rustc-driver
//! plumbing and extended with the context-sensitivity, heap-merge, dump,
//! and taint surfaces this engine exposes.

use std::time::Duration;

use clap::{Arg, Command};

use crate::context::selector::ContextSelector;
use crate::error::AnalysisError;
use crate::heap::HeapMergePolicy;

const USAGE: &str = "pta [OPTIONS] <INPUT>";

fn make_options_parser() -> Command<'static> {
    Command::new("pta")
        .no_binary_name(true)
        .override_usage(USAGE)
        .arg(
            Arg::new("cs")
                .long("cs")
                .takes_value(true)
                .value_parser(["ci", "1-call", "2-call", "1-obj", "2-obj", "1-type", "2-type"])
                .default_value("1-obj")
                .help("The context-sensitivity policy to use."),
        )
        .arg(
            Arg::new("only-app")
                .long("only-app")
                .takes_value(false)
                .help("Restrict analysis entry points to application classes."),
        )
        .arg(
            Arg::new("merge-string-objects")
                .long("merge-string-objects")
                .takes_value(false)
                .help("Merge all `String` allocations into one object per type."),
        )
        .arg(
            Arg::new("merge-string-builders")
                .long("merge-string-builders")
                .takes_value(false)
                .help("Merge all `StringBuilder`/`StringBuffer` allocations into one object per type."),
        )
        .arg(
            Arg::new("merge-exception-objects")
                .long("merge-exception-objects")
                .takes_value(false)
                .help("Merge all exception-type allocations into one object per type."),
        )
        .arg(
            Arg::new("dump")
                .long("dump")
                .takes_value(true)
                .help("Write the context-sensitive dump to the given file."),
        )
        .arg(
            Arg::new("dump-ci")
                .long("dump-ci")
                .takes_value(true)
                .help("Write the context-insensitive dump to the given file."),
        )
        .arg(
            Arg::new("expected-file")
                .long("expected-file")
                .takes_value(true)
                .help("Compare the run's dump against a prior dump and report mismatches."),
        )
        .arg(
            Arg::new("taint-config")
                .long("taint-config")
                .takes_value(true)
                .help("Load taint sources/sinks from the given JSON file."),
        )
        .arg(
            Arg::new("plugins")
                .long("plugins")
                .takes_value(true)
                .use_value_delimiter(true)
                .value_parser(["method-type", "invokedynamic", "reflection", "taint", "result-processor"])
                .help("Comma-separated list of built-in plug-ins to enable."),
        )
        .arg(
            Arg::new("time-limit")
                .long("time-limit")
                .takes_value(true)
                .value_parser(clap::value_parser!(u64))
                .help("Abort the run after this many seconds, returning a partial result."),
        )
        .arg(Arg::new("INPUT").required(true).help("The input IR to be analyzed."))
}

/// Parsed, validated run options (spec §6).
#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    pub input: String,
    pub context_selector: ContextSelector,
    pub only_app: bool,
    pub heap_merge_policy: HeapMergePolicy,
    pub dump_output: Option<String>,
    pub dump_ci_output: Option<String>,
    pub expected_file: Option<String>,
    pub taint_config: Option<String>,
    pub plugins: Vec<String>,
    pub time_limit: Option<Duration>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            input: String::new(),
            context_selector: ContextSelector::KObject(1),
            only_app: false,
            heap_merge_policy: HeapMergePolicy::default(),
            dump_output: None,
            dump_ci_output: None,
            expected_file: None,
            taint_config: None,
            plugins: Vec::new(),
            time_limit: None,
        }
    }
}

fn parse_context_selector(value: &str) -> ContextSelector {
    match value {
        "ci" => ContextSelector::Insensitive,
        "1-call" => ContextSelector::KCallSite(1),
        "2-call" => ContextSelector::KCallSite(2),
        "1-obj" => ContextSelector::KObject(1),
        "2-obj" => ContextSelector::KObject(2),
        "1-type" => ContextSelector::KType(1),
        "2-type" => ContextSelector::KType(2),
        _ => unreachable!("value_parser restricts to the listed policy names"),
    }
}

impl AnalysisOptions {
    /// Parses options from a list of command-line arguments (spec §6).
    /// Exits the process on `--help`/`--version`/a malformed argument, the
    /// same as the teacher's `parse_from_args`.
    pub fn parse_from_args(args: &[String]) -> Result<Self, AnalysisError> {
        let matches = match make_options_parser().try_get_matches_from(args.iter()) {
            Ok(matches) => matches,
            Err(e) => e.exit(),
        };

        let mut options = AnalysisOptions::default();

        options.input = matches.get_one::<String>("INPUT").cloned().unwrap_or_default();

        if let Some(cs) = matches.get_one::<String>("cs") {
            options.context_selector = parse_context_selector(cs);
        }

        options.only_app = matches.contains_id("only-app");

        options.heap_merge_policy = HeapMergePolicy {
            merge_string_objects: matches.contains_id("merge-string-objects"),
            merge_string_builders: matches.contains_id("merge-string-builders"),
            merge_exception_objects: matches.contains_id("merge-exception-objects"),
        };

        options.dump_output = matches.get_one::<String>("dump").cloned();
        options.dump_ci_output = matches.get_one::<String>("dump-ci").cloned();
        options.expected_file = matches.get_one::<String>("expected-file").cloned();
        options.taint_config = matches.get_one::<String>("taint-config").cloned();

        if let Some(values) = matches.get_many::<String>("plugins") {
            options.plugins = values.cloned().collect();
        }
        if options.taint_config.is_some() && !options.plugins.iter().any(|p| p == "taint") {
            options.plugins.push("taint".to_string());
        }

        options.time_limit = matches.get_one::<u64>("time-limit").map(|secs| Duration::from_secs(*secs));

        Ok(options)
    }
}
