// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Two-stage IDL parser.
//!
//! Stage 1 walks every `.idl` file, splits module bodies from global text and
//! registers a placeholder for each `struct`/`enum`/`union`/`typedef` header
//! it can see. Stage 2 re-walks the accumulated bodies and fills typedef base
//! types, enum values, struct fields and union cases, resolving typedef
//! chains to their final base via a bounded fixed-point pass.
//!
//! Malformed constructs produce diagnostics and the scan index is always
//! forced forward, so a broken declaration never stalls the run.

use crate::diag::Diagnostic;
use crate::model::{EnumDef, Field, IdlType, StructDef, TypedefDef, UnionCase, UnionDef};
use crate::registry::TypeRegistry;
use crate::scan::{
    collect_files_with_suffix, find_closing_brace, keyword_at, scan_identifier,
    strip_comments_and_directives,
};
use crate::values::clean_type_name;
use anyhow::Result;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Cap on typedef fixed-point rounds and resolution recursion depth. Chains
/// deeper than this (or cycles) degrade to a bare-name fallback plus a
/// warning diagnostic.
pub const MAX_TYPEDEF_PASSES: usize = 15;

struct ParserRegexes {
    discover_struct: Regex,
    discover_enum: Regex,
    discover_union: Regex,
    discover_typedef: Regex,
    typedef_stmt: Regex,
    enum_body: Regex,
    union_header: Regex,
    field_stmt: Regex,
    case_label: Regex,
    annotation: Regex,
    array_dim: Regex,
    string_type: Regex,
}

impl ParserRegexes {
    fn new() -> Self {
        // All literals are static, so compilation cannot fail.
        Self {
            discover_struct: Regex::new(r"\bstruct\s+(\w+)").unwrap(),
            discover_enum: Regex::new(r"\benum\s+(\w+)").unwrap(),
            discover_union: Regex::new(r"\bunion\s+(\w+)").unwrap(),
            discover_typedef: Regex::new(r"\btypedef\b.+?\s+([\w:]+)\s*(?:\[[^\]]*\]\s*)*;")
                .unwrap(),
            typedef_stmt: Regex::new(r"(?s)\btypedef\s+(.+?)\s+([\w:]+)\s*((?:\[.*?\]\s*)?);")
                .unwrap(),
            enum_body: Regex::new(r"(?ms)(?:^|;|\})\s*enum\s+(\w+)\s*\{([^}]*?)\}").unwrap(),
            union_header: Regex::new(r"(?s)union\s+(\w+)\s*switch\s*\(\s*(.+?)\s*\)\s*\{").unwrap(),
            field_stmt: Regex::new(r"(?s)^(.+?)\s+([\w:]+)\s*((?:\[[^\]]+\]\s*)*)$").unwrap(),
            case_label: Regex::new(r"(?i)case\s+[^:]+:|default\s*:").unwrap(),
            annotation: Regex::new(r"(?s)\[\[.*?\]\]").unwrap(),
            array_dim: Regex::new(r"\[([^\]]*)\]").unwrap(),
            string_type: Regex::new(r"^(?:std::)?(w?)string(?:\s*<\s*([^<>]+?)\s*>)?$").unwrap(),
        }
    }
}

pub struct IdlParser {
    registry: TypeRegistry,
    /// Accumulated body text per module; `""` holds the global scope.
    module_bodies: BTreeMap<String, String>,
    /// Cleaned primitive type names; never resolved further.
    primitives: HashSet<String>,
    diagnostics: Vec<Diagnostic>,
    regexes: ParserRegexes,
}

impl IdlParser {
    pub fn new(primitives: HashSet<String>) -> Self {
        Self {
            registry: TypeRegistry::new(),
            module_bodies: BTreeMap::new(),
            primitives,
            diagnostics: Vec::new(),
            regexes: ParserRegexes::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Consume the parser, keeping only the filled registry.
    pub fn into_registry(self) -> TypeRegistry {
        self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Parse every `.idl` file under `idl_root` in two stages. The registry
    /// is filled once and read-only afterwards.
    pub fn parse_dir(&mut self, idl_root: &Path) -> Result<()> {
        tracing::info!("Scanning IDL directory (recursive): {}", idl_root.display());
        let idl_files = collect_files_with_suffix(idl_root, ".idl")?;
        if idl_files.is_empty() {
            self.diagnostics.push(Diagnostic::warning(
                idl_root.display().to_string(),
                "no .idl files found",
            ));
            return Ok(());
        }

        tracing::info!("Stage 1/2: discovering IDL types ({} files)", idl_files.len());
        let mut global_body = String::new();
        let mut module_bodies: BTreeMap<String, String> = BTreeMap::new();
        for file in &idl_files {
            let file_label = file.display().to_string();
            let content = match std::fs::read_to_string(file) {
                Ok(c) => strip_comments_and_directives(&c),
                Err(e) => {
                    self.diagnostics
                        .push(Diagnostic::error(file_label, format!("read failed: {e}")));
                    continue;
                }
            };
            self.scan_modules(&content, &file_label, &mut global_body, &mut module_bodies);
        }

        self.discover_types(&global_body, "");
        for (name, body) in &module_bodies {
            self.discover_types(body, name);
        }
        self.module_bodies.insert(String::new(), global_body);
        self.module_bodies.extend(module_bodies);
        tracing::info!(
            "Found {} type headers (struct/enum/union/typedef)",
            self.registry.len()
        );

        tracing::info!("Stage 2/2: parsing struct/union/enum/typedef bodies");
        let bodies = std::mem::take(&mut self.module_bodies);
        for (module, body) in &bodies {
            self.parse_typedefs(body, module);
        }
        self.resolve_all_typedefs();
        for (module, body) in &bodies {
            self.parse_enum_bodies(body, module);
        }
        for (module, body) in &bodies {
            self.parse_struct_bodies(body, module);
            self.parse_union_bodies(body, module);
        }
        self.module_bodies = bodies;
        tracing::info!("IDL parsing completed: {} types", self.registry.len());
        Ok(())
    }

    /// Split one preprocessed file into module bodies and global text.
    /// Only top-level modules are guaranteed correct; nested `module`
    /// declarations are flagged as unsupported.
    fn scan_modules(
        &mut self,
        content: &str,
        file_label: &str,
        global_body: &mut String,
        module_bodies: &mut BTreeMap<String, String>,
    ) {
        const KW: &str = "module";
        let mut idx = 0;
        loop {
            let Some(rel) = content[idx..].find(KW) else {
                global_body.push_str(&content[idx..]);
                break;
            };
            let at = idx + rel;
            global_body.push_str(&content[idx..at]);
            if !keyword_at(content, at, KW) {
                // Part of a longer identifier: keep the text, move on.
                global_body.push_str(KW);
                idx = at + KW.len();
                continue;
            }
            let (name, name_end) = scan_identifier(content, at + KW.len());
            if name.is_empty() {
                idx = name_end;
                continue;
            }
            let Some(open_rel) = content[name_end..].find('{') else {
                idx = name_end;
                continue;
            };
            let open = name_end + open_rel;
            let Some(close) = find_closing_brace(content, open) else {
                self.diagnostics.push(Diagnostic::warning(
                    file_label.to_string(),
                    format!("closing brace not found for module '{name}'; skipping rest of file"),
                ));
                break;
            };
            let body = &content[open + 1..close];
            if self.contains_module_keyword(body) {
                self.diagnostics.push(Diagnostic::warning(
                    format!("{file_label}:{name}"),
                    "nested module declarations are unsupported; inner types keep the outer scope"
                        .to_string(),
                ));
            }
            let pool = module_bodies.entry(name.to_string()).or_default();
            pool.push_str(body);
            pool.push('\n');
            idx = close + 1;
        }
    }

    fn contains_module_keyword(&self, body: &str) -> bool {
        let mut idx = 0;
        while let Some(rel) = body[idx..].find("module") {
            let at = idx + rel;
            if keyword_at(body, at, "module") {
                return true;
            }
            idx = at + "module".len();
        }
        false
    }

    /// Stage 1: register a placeholder for every type header in `body`.
    fn discover_types(&mut self, body: &str, module: &str) {
        for caps in self.regexes.discover_struct.captures_iter(body) {
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            self.registry.register(
                module,
                &name,
                IdlType::Struct(StructDef {
                    name: name.clone(),
                    module: module.to_string(),
                    fields: Vec::new(),
                }),
            );
        }
        for caps in self.regexes.discover_enum.captures_iter(body) {
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            self.registry.register(
                module,
                &name,
                IdlType::Enum(EnumDef {
                    name: name.clone(),
                    module: module.to_string(),
                    values: Vec::new(),
                }),
            );
        }
        for caps in self.regexes.discover_union.captures_iter(body) {
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            self.registry.register(
                module,
                &name,
                IdlType::Union(UnionDef {
                    name: name.clone(),
                    module: module.to_string(),
                    discriminator_type: String::new(),
                    cases: Vec::new(),
                }),
            );
        }
        for caps in self.regexes.discover_typedef.captures_iter(body) {
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            self.registry.register(
                module,
                &name,
                IdlType::Typedef(TypedefDef {
                    name: name.clone(),
                    module: module.to_string(),
                    base_type_text: String::new(),
                    resolved_base_type: String::new(),
                }),
            );
        }
    }

    /// Stage 2: store cleaned typedef base texts. Idempotent: an already
    /// filled entry is left alone.
    fn parse_typedefs(&mut self, body: &str, module: &str) {
        let typedef_stmt = self.regexes.typedef_stmt.clone();
        for caps in typedef_stmt.captures_iter(body) {
            let base_raw = caps.get(1).map_or("", |m| m.as_str());
            let name = caps.get(2).map_or("", |m| m.as_str());
            let suffix = caps.get(3).map_or("", |m| m.as_str()).trim();
            let mut base: String = base_raw.split_whitespace().collect::<Vec<_>>().join(" ");
            if !suffix.is_empty() {
                base.push_str(suffix);
            }
            let key = TypeRegistry::scoped_key(module, name);
            if let Some(IdlType::Typedef(td)) = self.registry.entry_mut(&key) {
                if td.base_type_text.is_empty() {
                    td.base_type_text = base;
                }
            }
        }
    }

    /// Bounded fixed-point pass filling `resolved_base_type` for every
    /// typedef. A typedef whose base is itself an unresolved typedef is
    /// deferred to a later round; leftovers after the cap get a warning and
    /// fall back to their bare base name at resolution time.
    fn resolve_all_typedefs(&mut self) {
        tracing::info!("Resolving typedefs...");
        let mut typedef_keys: Vec<String> = self
            .registry
            .iter()
            .filter(|(_, t)| matches!(t, IdlType::Typedef(_)))
            .map(|(k, _)| k.clone())
            .collect();
        typedef_keys.sort();

        let mut changed = true;
        let mut passes = 0;
        while changed && passes < MAX_TYPEDEF_PASSES {
            changed = false;
            passes += 1;
            for key in &typedef_keys {
                let (base, module) = match self.registry.entry_mut(key) {
                    Some(IdlType::Typedef(td))
                        if td.resolved_base_type.is_empty() && !td.base_type_text.is_empty() =>
                    {
                        (td.base_type_text.clone(), td.module.clone())
                    }
                    _ => continue,
                };
                // Classify through a temporary field so sequence<> and
                // string<> wrappers reduce to their effective type name.
                let temp = self.field_from_decl("temp", &base, "", &module, false);
                let resolved = self.resolve_type_name(&temp.type_name, &module, 0);
                let blocked = matches!(
                    self.registry.get(&resolved, &module),
                    Some(IdlType::Typedef(td)) if td.resolved_base_type.is_empty()
                );
                if !blocked {
                    if let Some(IdlType::Typedef(td)) = self.registry.entry_mut(key) {
                        td.resolved_base_type = resolved;
                        changed = true;
                    }
                }
            }
        }

        for key in &typedef_keys {
            if let Some(IdlType::Typedef(td)) = self.registry.entry_mut(key) {
                if td.resolved_base_type.is_empty() && !td.base_type_text.is_empty() {
                    let base = td.base_type_text.clone();
                    self.diagnostics.push(Diagnostic::warning(
                        key.clone(),
                        format!("typedef could not be resolved (base '{base}'); using bare name"),
                    ));
                }
            }
        }
    }

    /// Stage 2: enum bodies. First successful parse wins; duplicates across
    /// files never overwrite a filled entry.
    fn parse_enum_bodies(&mut self, body: &str, module: &str) {
        let enum_body = self.regexes.enum_body.clone();
        for caps in enum_body.captures_iter(body) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let values_raw = caps.get(2).map_or("", |m| m.as_str());
            let key = TypeRegistry::scoped_key(module, name);
            if let Some(IdlType::Enum(ed)) = self.registry.entry_mut(&key) {
                if ed.values.is_empty() {
                    ed.values = values_raw
                        .split(',')
                        .filter(|v| !v.trim().is_empty())
                        .map(|v| v.split('=').next().unwrap_or("").trim().to_string())
                        .collect();
                }
            }
        }
    }

    /// Stage 2: struct bodies via keyword scan plus brace matching.
    fn parse_struct_bodies(&mut self, content: &str, module: &str) {
        const KW: &str = "struct";
        let mut idx = 0;
        while let Some(rel) = content[idx..].find(KW) {
            let at = idx + rel;
            if !keyword_at(content, at, KW) {
                idx = at + KW.len();
                continue;
            }
            let (name, name_end) = scan_identifier(content, at + KW.len());
            if name.is_empty() {
                idx = name_end;
                continue;
            }
            let Some(open_rel) = content[name_end..].find('{') else {
                idx = name_end;
                continue;
            };
            let open = name_end + open_rel;
            let key = TypeRegistry::scoped_key(module, name);
            let Some(close) = find_closing_brace(content, open) else {
                self.diagnostics.push(Diagnostic::error(
                    key,
                    "closing brace not found for struct; skipping".to_string(),
                ));
                idx = open + 1;
                continue;
            };
            let body = content[open + 1..close].to_string();
            let needs_fill = matches!(
                self.registry.entry_mut(&key),
                Some(IdlType::Struct(s)) if s.fields.is_empty()
            );
            if needs_fill {
                let fields = self.parse_fields(&body, module);
                if let Some(IdlType::Struct(s)) = self.registry.entry_mut(&key) {
                    s.fields = fields;
                }
            }
            idx = close + 1;
        }
    }

    /// Stage 2: union bodies (`union Name switch (Type) { … }`).
    fn parse_union_bodies(&mut self, content: &str, module: &str) {
        const KW: &str = "union";
        let union_header = self.regexes.union_header.clone();
        let mut idx = 0;
        while let Some(rel) = content[idx..].find(KW) {
            let at = idx + rel;
            if !keyword_at(content, at, KW) {
                idx = at + KW.len();
                continue;
            }
            let Some(caps) = union_header.captures(&content[at..]) else {
                idx = at + KW.len();
                continue;
            };
            let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let disc_raw = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            let open = at + caps.get(0).map_or(0, |m| m.end()) - 1;
            let key = TypeRegistry::scoped_key(module, &name);
            let Some(close) = find_closing_brace(content, open) else {
                self.diagnostics.push(Diagnostic::error(
                    key,
                    "closing brace not found for union; skipping".to_string(),
                ));
                idx = open + 1;
                continue;
            };
            let body = content[open + 1..close].to_string();
            let needs_fill = matches!(
                self.registry.entry_mut(&key),
                Some(IdlType::Union(u)) if u.discriminator_type.is_empty()
            );
            if needs_fill {
                let disc = self.resolve_type_name(&disc_raw, module, 0);
                let cases = self.parse_union_cases(&body, module);
                if let Some(IdlType::Union(u)) = self.registry.entry_mut(&key) {
                    u.discriminator_type = disc;
                    u.cases = cases;
                }
            }
            idx = close + 1;
        }
    }

    /// Parse the member declarations of a struct body.
    ///
    /// Nested `{ … }` spans are masked with opaque placeholders so splitting
    /// on `;` is not confused by embedded braces, then restored into each
    /// statement before classification.
    fn parse_fields(&mut self, body: &str, module: &str) -> Vec<Field> {
        let (masked, spans) = mask_brace_spans(body);
        let no_case = self.regexes.case_label.replace_all(&masked, "");
        let field_stmt = self.regexes.field_stmt.clone();
        let annotation = self.regexes.annotation.clone();

        let mut fields = Vec::new();
        for stmt in no_case.split(';') {
            let stmt = annotation.replace_all(stmt, "");
            let mut stmt = stmt.trim().to_string();
            if stmt.is_empty() {
                continue;
            }
            for (key, original) in &spans {
                if stmt.contains(key.as_str()) {
                    stmt = stmt.replace(key.as_str(), original);
                }
            }
            let Some(caps) = field_stmt.captures(&stmt) else {
                continue;
            };
            let type_text = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let name = caps.get(2).map_or("", |m| m.as_str()).to_string();
            let array_text = caps.get(3).map_or("", |m| m.as_str()).trim().to_string();
            fields.push(self.field_from_decl(&name, &type_text, &array_text, module, true));
        }
        fields
    }

    /// Parse union cases: consecutive `case`/`default` labels followed by one
    /// member declaration each.
    fn parse_union_cases(&mut self, body: &str, module: &str) -> Vec<UnionCase> {
        let label_re = self.regexes.case_label.clone();
        let field_stmt = self.regexes.field_stmt.clone();
        let annotation = self.regexes.annotation.clone();
        let labels: Vec<(usize, usize, String)> = label_re
            .find_iter(body)
            .map(|m| (m.start(), m.end(), m.as_str().trim().to_string()))
            .collect();

        let mut cases = Vec::new();
        let mut i = 0;
        while i < labels.len() {
            let mut case_labels = vec![labels[i].2.clone()];
            let mut seg_start = labels[i].1;
            let mut j = i + 1;
            // Stacked labels with nothing but whitespace between them share
            // one payload.
            while j < labels.len() && body[labels[j - 1].1..labels[j].0].trim().is_empty() {
                case_labels.push(labels[j].2.clone());
                seg_start = labels[j].1;
                j += 1;
            }
            let seg_end = if j < labels.len() {
                labels[j].0
            } else {
                body.len()
            };
            let segment = &body[seg_start..seg_end];
            let stmt_raw = segment.split(';').next().unwrap_or("").trim().to_string();
            let stmt = annotation.replace_all(&stmt_raw, "");
            let stmt = stmt.trim();
            if let Some(caps) = field_stmt.captures(stmt) {
                let type_text = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
                let name = caps.get(2).map_or("", |m| m.as_str()).to_string();
                let array_text = caps.get(3).map_or("", |m| m.as_str()).trim().to_string();
                let field = self.field_from_decl(&name, &type_text, &array_text, module, true);
                cases.push(UnionCase {
                    labels: case_labels,
                    field,
                });
            }
            i = j;
        }
        cases
    }

    /// Build a `Field` from its declared parts, classifying sequences,
    /// bounded strings and array suffixes, then (optionally) resolving the
    /// effective type name through typedefs.
    fn field_from_decl(
        &mut self,
        name: &str,
        type_text: &str,
        array_text: &str,
        module: &str,
        resolve: bool,
    ) -> Field {
        let full = if array_text.is_empty() {
            type_text.to_string()
        } else {
            format!("{type_text}{array_text}")
        };
        let mut field = Field::new(name, type_text, full, module);

        if !array_text.is_empty() {
            field.is_array = true;
            field.array_dims = self
                .regexes
                .array_dim
                .captures_iter(array_text)
                .map(|c| c.get(1).map_or("", |m| m.as_str()).trim().to_string())
                .collect();
        }

        if let Some((element, bound)) = split_sequence(type_text) {
            field.is_sequence = true;
            field.type_name = element;
            field.sequence_limit = bound;
        }

        // The declared type (or the sequence element) may be a bounded
        // string pseudo-type.
        let declared = field.type_name.clone();
        if let Some(caps) = self.regexes.string_type.captures(&declared) {
            let wide = !caps.get(1).map_or("", |m| m.as_str()).is_empty();
            field.type_name = if wide { "wstring" } else { "string" }.to_string();
            field.string_limit = caps.get(2).map(|m| m.as_str().trim().to_string());
        }

        if resolve {
            let resolved = self.resolve_type_name(&field.type_name.clone(), module, 0);
            field.type_name = resolved;
        }
        field
    }

    /// Resolve a raw type reference to its final non-typedef name.
    ///
    /// Primitives are returned unchanged. Scoped references use their
    /// explicit scope; unscoped ones try the current module first. Typedefs
    /// substitute their base repeatedly, bounded by `MAX_TYPEDEF_PASSES`;
    /// overflow (a cycle) degrades to the bare name with a warning.
    fn resolve_type_name(&mut self, raw: &str, current_module: &str, depth: usize) -> String {
        if depth > MAX_TYPEDEF_PASSES {
            tracing::warn!("Typedef resolution depth limit exceeded: {raw}");
            self.diagnostics.push(Diagnostic::warning(
                raw.to_string(),
                "typedef resolution depth limit exceeded; using bare name".to_string(),
            ));
            return raw.rsplit("::").next().unwrap_or(raw).to_string();
        }
        if self.primitives.contains(&clean_type_name(raw)) {
            return raw.to_string();
        }

        let parts: Vec<&str> = raw.split("::").collect();
        let name = parts.last().copied().unwrap_or(raw);
        let namespace = if parts.len() > 1 {
            parts[0]
        } else {
            current_module
        };

        if let Some(IdlType::Typedef(td)) = self.registry.get(name, namespace) {
            let base = if td.resolved_base_type.is_empty() {
                td.base_type_text.clone()
            } else {
                td.resolved_base_type.clone()
            };
            if base.is_empty() {
                return name.to_string();
            }
            let td_module = td.module.clone();
            return self.resolve_type_name(&base, &td_module, depth + 1);
        }
        name.to_string()
    }
}

/// Replace top-level balanced `{ … }` spans with opaque placeholder tokens.
/// Returns the masked text and the placeholder -> original span pairs.
fn mask_brace_spans(body: &str) -> (String, Vec<(String, String)>) {
    let bytes = body.as_bytes();
    let mut masked = String::with_capacity(body.len());
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut span_start = 0usize;
    let mut copied_until = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if depth == 0 {
                    masked.push_str(&body[copied_until..i]);
                    span_start = i;
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        let key = format!("__BRACE_SPAN_{}__", spans.len());
                        masked.push_str(&key);
                        spans.push((key, body[span_start..=i].to_string()));
                        copied_until = i + 1;
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth == 0 {
        masked.push_str(&body[copied_until..]);
    } else {
        // Unbalanced: keep the tail verbatim so nothing is lost.
        masked.push_str(&body[span_start..]);
    }
    (masked, spans)
}

/// Split a `sequence<T[, BOUND]>` declaration into element text and optional
/// bound. Angle depth is tracked explicitly so nested parameters do not
/// confuse the split.
fn split_sequence(type_text: &str) -> Option<(String, Option<String>)> {
    let trimmed = type_text.trim();
    let rest = trimmed.strip_prefix("sequence")?;
    let rest = rest.trim_start();
    let inner = rest.strip_prefix('<')?;

    let bytes = inner.as_bytes();
    let mut depth = 0i32;
    let mut comma_at: Option<usize> = None;
    let mut close_at: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => {
                if depth == 0 {
                    close_at = Some(i);
                    break;
                }
                depth -= 1;
            }
            b',' if depth == 0 && comma_at.is_none() => comma_at = Some(i),
            _ => {}
        }
    }
    let close = close_at?;
    match comma_at {
        Some(c) => {
            let element = inner[..c].trim().to_string();
            let bound = inner[c + 1..close].trim().to_string();
            let bound = if bound.is_empty() { None } else { Some(bound) };
            Some((element, bound))
        }
        None => Some((inner[..close].trim().to_string(), None)),
    }
}
