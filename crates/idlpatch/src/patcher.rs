// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Marker-block injection into generated publisher sources.
//!
//! For each target file the patcher locates the publisher's initialization
//! anchor (the `/* Initialize your structure here */` comment followed by the
//! sample variable declaration), derives the struct type and module from the
//! declaration and file name, and injects generated assignments between
//! marker comments. Re-runs replace the previous marker block in place; a
//! byte-identical result short-circuits without touching the file.

use crate::codegen::CodeGenerator;
use crate::report::PatchReport;
use crate::scan::collect_files_with_suffix;
use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TARGET_SUFFIX: &str = "PublisherApp.cxx";
const DEFAULT_TOOL_TAG: &str = "v1";
const DEFAULT_INDENT: &str = "        ";

#[derive(Debug, Clone)]
pub struct PatcherOptions {
    /// File name suffix selecting patch targets.
    pub target_suffix: String,
    /// Tag embedded in the marker comments and the backup file suffix.
    pub tool_tag: String,
    /// Report what would change without writing anything.
    pub dry_run: bool,
}

impl Default for PatcherOptions {
    fn default() -> Self {
        Self {
            target_suffix: DEFAULT_TARGET_SUFFIX.to_string(),
            tool_tag: DEFAULT_TOOL_TAG.to_string(),
            dry_run: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PatchOutcome {
    Patched,
    UpToDate,
    Skipped(String),
}

pub struct FilePatcher<'a> {
    root: PathBuf,
    generator: CodeGenerator<'a>,
    options: PatcherOptions,
    anchor_re: Regex,
    fallback_re: Regex,
}

impl<'a> FilePatcher<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        generator: CodeGenerator<'a>,
        options: PatcherOptions,
    ) -> Self {
        // Anchor: placeholder comment, optional attribute tags, then the
        // sample declaration. The declaration char class cannot cross `;`.
        let anchor_re = Regex::new(
            r"(?s)(\s*/\*\s*Initialize your structure here\s*\*/\s*)((?:\[[\w@]+\]\s*)*)([\w:<>,\s]+?\s+(\w+);)",
        )
        .unwrap();
        // Fallback for files whose placeholder comment is already gone but
        // still carry a previous marker block before the declaration.
        let fallback_re = Regex::new(
            r"(// --- BEGIN AUTOGENERATED IDL PATCH[^\n]*\n)([\w:<>,\s]+?\s+(\w+);)",
        )
        .unwrap();
        Self {
            root: root.into(),
            generator,
            options,
            anchor_re,
            fallback_re,
        }
    }

    fn begin_marker(&self) -> String {
        format!(
            "// --- BEGIN AUTOGENERATED IDL PATCH ({}) ---",
            self.options.tool_tag
        )
    }

    fn end_marker(&self) -> String {
        format!(
            "// --- END AUTOGENERATED IDL PATCH ({}) ---",
            self.options.tool_tag
        )
    }

    fn backup_suffix(&self) -> String {
        format!(".idlpatch_{}.backup", self.options.tool_tag)
    }

    pub fn generator_mut(&mut self) -> &mut CodeGenerator<'a> {
        &mut self.generator
    }

    /// Patch every target file under the root. Per-file failures land in the
    /// report as skips; only the directory walk itself can fail hard.
    pub fn run(&mut self) -> Result<PatchReport> {
        tracing::info!(
            "Searching for *{} files under {}",
            self.options.target_suffix,
            self.root.display()
        );
        let files = collect_files_with_suffix(&self.root, &self.options.target_suffix)
            .with_context(|| format!("Failed to walk {}", self.root.display()))?;
        let mut report = PatchReport::default();
        if files.is_empty() {
            tracing::warn!("No *{} files found", self.options.target_suffix);
            return Ok(report);
        }
        tracing::info!("Found {} target file(s)", files.len());

        for path in files {
            report.processed += 1;
            let displayed = path.display().to_string();
            match self.patch_file(&path) {
                Ok(PatchOutcome::Patched) => {
                    tracing::info!("[OK] Patched {}", displayed);
                    report.patched.push(displayed);
                }
                Ok(PatchOutcome::UpToDate) => {
                    tracing::info!("Already up to date: {}", displayed);
                    report.up_to_date.push(displayed);
                }
                Ok(PatchOutcome::Skipped(reason)) => {
                    tracing::warn!("Skipping {}: {}", displayed, reason);
                    report.skip(displayed, reason);
                }
                Err(e) => {
                    tracing::error!("Failed to patch {}: {:#}", displayed, e);
                    report.skip(displayed, format!("{e:#}"));
                }
            }
        }
        Ok(report)
    }

    fn patch_file(&mut self, path: &Path) -> Result<PatchOutcome> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // Locate the anchor and the sample declaration.
        let (anchor_block, decl, var_name, decl_offset) =
            if let Some(caps) = self.anchor_re.captures(&content) {
                let whole = caps.get(0).map_or("", |m| m.as_str()).to_string();
                let decl_match = caps.get(3).expect("anchor group");
                (
                    whole,
                    decl_match.as_str().to_string(),
                    caps.get(4).map_or("", |m| m.as_str()).to_string(),
                    decl_match.start(),
                )
            } else if let Some(caps) = self.fallback_re.captures(&content) {
                let decl_match = caps.get(2).expect("fallback group");
                (
                    decl_match.as_str().to_string(),
                    decl_match.as_str().to_string(),
                    caps.get(3).map_or("", |m| m.as_str()).to_string(),
                    decl_match.start(),
                )
            } else {
                return Ok(PatchOutcome::Skipped(
                    "initialization anchor not found".to_string(),
                ));
            };

        // Derive type and module from the declaration and file name.
        let decl_trim = decl.trim();
        let expected_tail = format!("{var_name};");
        if !decl_trim.ends_with(&expected_tail) {
            return Ok(PatchOutcome::Skipped(format!(
                "could not isolate declaration of '{var_name}'"
            )));
        }
        let type_text = decl_trim[..decl_trim.len() - expected_tail.len()].trim();
        let Some(cpp_type) = type_text.split_whitespace().last() else {
            return Ok(PatchOutcome::Skipped(
                "declaration carries no type name".to_string(),
            ));
        };
        let struct_name = cpp_type.rsplit("::").next().unwrap_or(cpp_type);
        let module = if cpp_type.contains("::") {
            cpp_type.split("::").next().unwrap_or("").to_string()
        } else {
            module_from_file_name(path, &self.options.target_suffix)
        };
        tracing::info!(
            "Target found: variable='{}', struct='{}', module='{}'",
            var_name,
            struct_name,
            module
        );

        if self.generator.registry().get_struct(struct_name, &module).is_none() {
            return Ok(PatchOutcome::Skipped(format!(
                "no IDL definition for struct '{struct_name}' (module '{module}')"
            )));
        }

        let lines = self
            .generator
            .generate_assignments(struct_name, &module, &var_name);
        if lines.is_empty() || lines[0].starts_with("// ERROR") {
            return Ok(PatchOutcome::Skipped(format!(
                "code generation failed for '{struct_name}'"
            )));
        }

        let indent = indent_of_line_at(&content, decl_offset);
        let begin = self.begin_marker();
        let end = self.end_marker();
        let mut block = format!("\n{indent}{begin}\n{indent}");
        block.push_str(&lines.join(&format!("\n{indent}")));
        block.push_str(&format!("\n{indent}{end}\n"));
        let replacement = format!("{anchor_block}{block}");

        // Replace a previous marker block of any tag, or inject fresh.
        let old_block_pattern = format!(
            r"(?s){}\s*// --- BEGIN AUTOGENERATED IDL PATCH \([^)]*\) ---.*?// --- END AUTOGENERATED IDL PATCH \([^)]*\) ---\n?",
            regex::escape(&anchor_block)
        );
        let old_block_re = Regex::new(&old_block_pattern)
            .context("Failed to compile marker block pattern")?;
        let new_content = match old_block_re.replacen(&content, 1, NoExpand(&replacement)) {
            Cow::Owned(s) => s,
            Cow::Borrowed(_) => content.replacen(&anchor_block, &replacement, 1),
        };

        if new_content == content {
            return Ok(PatchOutcome::UpToDate);
        }
        if self.options.dry_run {
            tracing::info!("[DRY-RUN] Would patch {}", path.display());
            return Ok(PatchOutcome::Patched);
        }

        let backup_path = backup_path_for(path, &self.backup_suffix());
        fs::write(&backup_path, &content)
            .with_context(|| format!("Failed to write backup {}", backup_path.display()))?;
        fs::write(path, new_content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(PatchOutcome::Patched)
    }
}

/// Module name implied by the file name, e.g. `FooPublisherApp.cxx` -> `Foo`.
fn module_from_file_name(path: &Path, suffix: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(suffix))
        .unwrap_or("")
        .to_string()
}

fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Leading whitespace of the line containing `offset`; a sane default when
/// the declaration sits at column zero.
fn indent_of_line_at(content: &str, offset: usize) -> String {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let indent: String = content[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();
    if indent.is_empty() {
        DEFAULT_INDENT.to_string()
    } else {
        indent
    }
}
