use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::OptionMap;

/// Errors that can occur while compiling a jotdown file on disk.
///
/// Parsing itself never fails; these cover the file-system glue only.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from parsing a `{key "value" ...}` option block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// The block held an odd number of tokens. `options` holds every complete
    /// pair; `dangling` is the trailing key that had no value.
    #[error("Option block has an unpaired key '{dangling}'")]
    UnpairedKey { dangling: String, options: OptionMap },
}

/// A diagnostic message produced during parsing.
///
/// Diagnostics are non-fatal: the parser continues and produces a best-effort
/// result even when diagnostics are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 0-based source line the diagnostic refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    pub(crate) fn error(line: usize, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line: Some(line),
            code: Some(code.into()),
        }
    }

    pub(crate) fn warning(line: usize, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: Some(line),
            code: Some(code.into()),
        }
    }

    pub(crate) fn info(line: usize, code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            line: Some(line),
            code: Some(code.into()),
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
