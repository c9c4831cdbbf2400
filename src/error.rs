// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Error kinds classified by cause, not by source type (spec §7).

use std::fmt;

/// A mismatch between an expected dump line and what the run actually
/// produced, keyed by pointer textual form (spec §7 "Comparison mismatch").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub pointer: String,
    pub expected: Option<String>,
    pub given: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, expected: {}, given: {}",
            self.pointer,
            self.expected.as_deref().unwrap_or("null"),
            self.given.as_deref().unwrap_or("null"),
        )
    }
}

/// Fatal and soft-error categories the engine can raise (spec §7).
#[derive(Debug)]
pub enum AnalysisError {
    /// Missing class, unknown option value. Fatal at start-up.
    Configuration(String),
    /// An exception in a plug-in callback, wrapped with its identity.
    Plugin { plugin: String, source: Box<dyn std::error::Error + Send + Sync> },
    /// A structured aggregate of comparison mismatches (spec §7, scenario S6).
    ComparisonMismatch(Vec<Mismatch>),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            AnalysisError::Plugin { plugin, source } => {
                write!(f, "plug-in '{plugin}' failed: {source}")
            }
            AnalysisError::ComparisonMismatch(mismatches) => {
                writeln!(f, "found {} mismatch(es):", mismatches.len())?;
                for m in mismatches {
                    writeln!(f, "  {m}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Plugin { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Process exit codes (spec §6 "Exit codes").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Mismatch = 1,
    Configuration = 2,
    Internal = 3,
}

impl From<&AnalysisError> for ExitCode {
    fn from(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::Configuration(_) => ExitCode::Configuration,
            AnalysisError::ComparisonMismatch(_) => ExitCode::Mismatch,
            AnalysisError::Plugin { .. } => ExitCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display_uses_null_for_absent_sides() {
        let m = Mismatch {
            pointer: "x".to_string(),
            expected: None,
            given: Some("[o1]".to_string()),
        };
        assert_eq!(m.to_string(), "x, expected: null, given: [o1]");
    }

    #[test]
    fn exit_code_mapping_matches_spec() {
        assert_eq!(ExitCode::from(&AnalysisError::Configuration("x".into())), ExitCode::Configuration);
        assert_eq!(ExitCode::from(&AnalysisError::ComparisonMismatch(vec![])), ExitCode::Mismatch);
    }
}
