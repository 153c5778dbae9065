// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structured diagnostics collected during parsing and generation.
//!
//! Malformed constructs never abort a run; each one becomes a `Diagnostic`
//! and the scan moves on. Only terminal conditions (nothing discovered,
//! nothing patched) surface as hard errors.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// One recoverable finding, tied to the construct or file it came from.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// What the finding is about: a scoped type name, a file name, a path.
    pub context: String,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn error(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            context: context.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}]: {}", self.severity, self.context, self.message)
    }
}

/// Terminal failures of a whole run. Everything else degrades to diagnostics.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("no IDL types discovered under {0}")]
    NoTypesDiscovered(String),
    #[error("no target files were patched or up to date ({skipped} skipped)")]
    NothingPatched { skipped: usize },
}
