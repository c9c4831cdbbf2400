// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Comparison mode (`--expected-file`, spec §7 "Comparison mismatch",
//! scenario S6): parses a prior dump in the exact format of [`crate::dump`]
//! and reports `(pointer, expected, given)` mismatches.

use std::collections::BTreeMap;

use crate::dump;
use crate::error::{AnalysisError, Mismatch};
use crate::ir::IrProgram;
use crate::result::PtaResult;

const SEPARATOR: &str = " -> ";

/// Parses one pointer class's worth of `<pointer> -> [<obj1>,<obj2>,...]`
/// lines out of a dump, skipping section headers, blank lines, and the
/// taint-flow trailer (spec §6 "Dump format").
fn parse(text: &str) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        let Some((pointer, objs)) = line.split_once(SEPARATOR) else {
            continue;
        };
        let objs = objs.trim().trim_start_matches('[').trim_end_matches(']');
        let objs: Vec<String> = if objs.is_empty() {
            Vec::new()
        } else {
            objs.split(',').map(str::to_string).collect()
        };
        out.insert(pointer.to_string(), objs);
    }
    out
}

fn render(objs: &[String]) -> String {
    format!("[{}]", objs.join(","))
}

/// Diffs two dumps, returning one [`Mismatch`] per pointer whose points-to
/// set (or presence) differs (spec §7: `null` for absent sides).
pub fn diff(expected_dump: &str, actual_dump: &str) -> Vec<Mismatch> {
    let expected = parse(expected_dump);
    let actual = parse(actual_dump);

    let mut pointers: Vec<&String> = expected.keys().chain(actual.keys()).collect();
    pointers.sort();
    pointers.dedup();

    let mut mismatches = Vec::new();
    for pointer in pointers {
        let exp = expected.get(pointer);
        let act = actual.get(pointer);
        if exp == act {
            continue;
        }
        mismatches.push(Mismatch {
            pointer: pointer.clone(),
            expected: exp.map(|v| render(v)),
            given: act.map(|v| render(v)),
        });
    }
    mismatches
}

/// Dumps `result` and compares it against `expected_dump`, raising a single
/// aggregate [`AnalysisError::ComparisonMismatch`] if anything differs
/// (spec §6 "Exit codes": `1` on mismatch).
pub fn compare<P: IrProgram>(result: &PtaResult<P>, expected_dump: &str) -> Result<(), AnalysisError> {
    let actual_dump = dump::dump(result);
    let mismatches = diff(expected_dump, &actual_dump);
    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::ComparisonMismatch(mismatches))
    }
}
