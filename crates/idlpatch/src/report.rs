// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Run reporting: human summary and optional JSON manifest.

use crate::diag::Diagnostic;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Outcome of one patch run over a target tree.
#[derive(Debug, Default, Serialize)]
pub struct PatchReport {
    pub processed: usize,
    pub patched: Vec<String>,
    pub up_to_date: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

impl PatchReport {
    pub fn skip(&mut self, file: String, reason: String) {
        self.skipped.push(SkippedFile { file, reason });
    }

    /// Files that are in the desired state after the run.
    pub fn touched(&self) -> usize {
        self.patched.len() + self.up_to_date.len()
    }

    /// Print the closing summary, including any collected diagnostics.
    pub fn summary(&self, diagnostics: &[Diagnostic]) {
        println!("\n{}", "=".repeat(60));
        println!("Patch run summary");
        println!("{}", "=".repeat(60));
        println!("  Files processed:  {}", self.processed);
        println!("  Patched:          {}", self.patched.len());
        println!("  Already current:  {}", self.up_to_date.len());
        println!("  Skipped:          {}", self.skipped.len());
        for entry in &self.skipped {
            println!("    [SKIP] {} ({})", entry.file, entry.reason);
        }
        if !diagnostics.is_empty() {
            println!("  Diagnostics:      {}", diagnostics.len());
            for diag in diagnostics {
                println!("    {diag}");
            }
        }
        println!("{}", "=".repeat(60));
        if self.touched() > 0 {
            println!("[OK] {} file(s) in desired state", self.touched());
        } else {
            println!("[ERROR] no files were patched");
        }
    }

    /// Write a machine-readable manifest of the run.
    pub fn write_manifest(&self, path: &Path, diagnostics: &[Diagnostic]) -> Result<()> {
        let manifest = serde_json::json!({
            "generated_date": chrono::Local::now().to_rfc3339(),
            "processed": self.processed,
            "patched": self.patched,
            "up_to_date": self.up_to_date,
            "skipped": self.skipped,
            "diagnostics": diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        });
        let body = serde_json::to_string_pretty(&manifest).context("Failed to encode manifest")?;
        fs::write(path, body)
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;
        tracing::info!("[OK] Wrote manifest {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_touched_counts_patched_and_current() {
        let mut report = PatchReport::default();
        assert_eq!(report.touched(), 0);
        report.patched.push("a.cxx".to_string());
        report.up_to_date.push("b.cxx".to_string());
        report.skip("c.cxx".to_string(), "no anchor".to_string());
        assert_eq!(report.touched(), 2);
    }

    #[test]
    fn test_manifest_written_as_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        let mut report = PatchReport::default();
        report.processed = 2;
        report.patched.push("a.cxx".to_string());
        report.skip("b.cxx".to_string(), "no anchor".to_string());
        report.write_manifest(&path, &[]).expect("manifest");

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["processed"], 2);
        assert_eq!(parsed["patched"][0], "a.cxx");
        assert_eq!(parsed["skipped"][0]["reason"], "no anchor");
        assert!(parsed["generated_date"].is_string());
    }
}
