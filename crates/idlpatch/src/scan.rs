// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Character-level text utilities shared by the parser and patcher.
//!
//! Brace matching is an explicit state machine rather than a regex: depth
//! counting must ignore braces inside string and character literals, and
//! must not backtrack on deeply nested or malformed input.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find the `}` matching the `{` at `open_idx`. Braces inside `"…"` or `'…'`
/// do not affect depth; `\` escapes the quote that follows it. Returns the
/// byte index of the closing brace, or `None` when the text ends first.
pub fn find_closing_brace(text: &str, open_idx: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut in_char = false;
    let mut i = open_idx;
    while i < bytes.len() {
        let b = bytes[i];
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        if b == b'"' && !escaped && !in_char {
            in_string = !in_string;
        } else if b == b'\'' && !escaped && !in_string {
            in_char = !in_char;
        } else if !in_string && !in_char {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    None
}

/// Skip whitespace from `start`, then take an identifier. Returns the
/// identifier (possibly empty) and the byte index just past it.
pub fn scan_identifier(text: &str, start: usize) -> (&str, usize) {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let name_start = i;
    while i < bytes.len() && is_ident_byte(bytes[i]) {
        i += 1;
    }
    (&text[name_start..i], i)
}

/// True when the occurrence of `keyword` at `idx` is a standalone token:
/// not preceded or followed by an identifier byte.
pub fn keyword_at(text: &str, idx: usize, keyword: &str) -> bool {
    let bytes = text.as_bytes();
    if idx > 0 && is_ident_byte(bytes[idx - 1]) {
        return false;
    }
    let end = idx + keyword.len();
    if end < bytes.len() && is_ident_byte(bytes[end]) {
        return false;
    }
    true
}

/// Strip `//` and `/* */` comments and `#` preprocessor lines, trim each
/// remaining line, drop blanks, and pad `=` with spaces so enum value
/// assignments tokenize cleanly.
pub fn strip_comments_and_directives(content: &str) -> String {
    // Block comments first so `/* // */` does not leave a dangling tail.
    let mut no_blocks = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("/*") {
        no_blocks.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(rel) => rest = &rest[start + 2 + rel + 2..],
            None => {
                // Unterminated block comment: drop the rest of the file.
                rest = "";
                break;
            }
        }
    }
    no_blocks.push_str(rest);

    let mut out = String::with_capacity(no_blocks.len());
    for line in no_blocks.lines() {
        let line = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        out.push_str(&line.replace('=', " = "));
        out.push('\n');
    }
    out
}

/// Recursively collect files under `root` whose name ends with `suffix`,
/// sorted for deterministic processing order. Unreadable subdirectories are
/// skipped rather than failing the walk.
pub fn collect_files_with_suffix(root: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("Skipping unreadable directory {:?}: {}", dir, err);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(suffix))
            {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
