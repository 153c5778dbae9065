// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! C++ assignment generation for discovered struct types.
//!
//! Given a root struct and a variable name, the generator walks the field
//! tree and emits one deterministic assignment statement per reachable leaf.
//! Generated members are reached through setter calls (`path.field(value);`)
//! except where a raw lvalue is required (array elements, temporaries), which
//! use direct assignment (`path = value;`).
//!
//! Unknown or unresolved types degrade to an inline `// ERROR` comment plus a
//! diagnostic; generation never aborts mid-struct.

use crate::diag::Diagnostic;
use crate::model::{IdlType, StructDef, UnionDef};
use crate::registry::TypeRegistry;
use crate::values::ValueTable;

/// How a generated statement reaches its target member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Setter call: `path(value);`
    Member,
    /// Raw lvalue: `path = value;`
    Direct,
}

pub struct CodeGenerator<'a> {
    registry: &'a TypeRegistry,
    values: &'a ValueTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(registry: &'a TypeRegistry, values: &'a ValueTable) -> Self {
        Self {
            registry,
            values,
            diagnostics: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Generate the assignment statements for every field of `struct_name`,
    /// rooted at `var_name`. A missing definition yields a single `// ERROR`
    /// line so the caller can detect failure without special casing.
    pub fn generate_assignments(
        &mut self,
        struct_name: &str,
        module: &str,
        var_name: &str,
    ) -> Vec<String> {
        let registry = self.registry;
        let Some(def) = registry.get_struct(struct_name, module) else {
            self.diagnostics.push(Diagnostic::error(
                TypeRegistry::scoped_key(module, struct_name),
                "no struct definition found for code generation",
            ));
            return vec![format!(
                "// ERROR: no definition found for '{struct_name}' (module '{module}')"
            )];
        };
        let mut lines = Vec::new();
        self.emit_struct_fields(def, var_name, &mut lines);
        lines
    }

    fn emit_struct_fields(&mut self, def: &StructDef, base: &str, out: &mut Vec<String>) {
        for field in &def.fields {
            if field.is_array {
                // Populate the first element of each dimension only.
                let mut path = format!("{base}.{}()", field.name);
                for _ in &field.array_dims {
                    path.push_str("[0]");
                }
                out.push(format!("// Array assignment: {}", field.name));
                self.emit_assignment(
                    &field.type_name,
                    &path,
                    &field.name,
                    &def.module,
                    out,
                    AccessMode::Direct,
                    false,
                );
            } else if field.is_sequence {
                self.emit_sequence(field, base, &def.module, out);
            } else {
                let path = format!("{base}.{}", field.name);
                self.emit_assignment(
                    &field.type_name,
                    &path,
                    &field.name,
                    &def.module,
                    out,
                    AccessMode::Member,
                    false,
                );
            }
        }
    }

    /// Sequences always receive at least one element. Composite elements get
    /// a second, moved-in element so the sequence exercises growth.
    fn emit_sequence(
        &mut self,
        field: &crate::model::Field,
        base: &str,
        module: &str,
        out: &mut Vec<String>,
    ) {
        let registry = self.registry;
        let seq_path = format!("{base}.{}()", field.name);
        out.push(format!("// Sequence assignment: {}", field.name));

        let temp_base = base.replace("()", "").replace('.', "_");
        let temp_var = format!("{temp_base}_{}_item", field.name);
        let item_name = format!("{}_item", field.name);
        let mut temp_lines = Vec::new();
        let first = self.emit_assignment(
            &field.type_name,
            &temp_var,
            &item_name,
            module,
            &mut temp_lines,
            AccessMode::Direct,
            true,
        );
        out.extend(temp_lines);
        let Some(first) = first else {
            return;
        };
        out.push(format!("{seq_path}.push_back({first});"));

        let is_composite = matches!(
            registry.get(&field.type_name, module),
            Some(IdlType::Struct(_)) | Some(IdlType::Union(_))
        );
        let item2_name = format!("{}_item2", field.name);
        if is_composite {
            let temp_var2 = format!("{temp_var}2");
            let mut temp_lines2 = Vec::new();
            if let Some(second) = self.emit_assignment(
                &field.type_name,
                &temp_var2,
                &item2_name,
                module,
                &mut temp_lines2,
                AccessMode::Direct,
                true,
            ) {
                out.extend(temp_lines2);
                out.push(format!("{seq_path}.push_back(std::move({second}));"));
            }
        } else if let Some(second) = self.values.contextual_value(&field.type_name, &item2_name) {
            // A second element only when the name heuristics produce a
            // distinct value; duplicates add nothing.
            if second != first {
                out.push(format!("{seq_path}.push_back({second});"));
            }
        }
    }

    /// Emit the assignment(s) for one target. With `create_temp` the value is
    /// returned as an expression (declaring a temporary first when the type
    /// is composite) instead of being assigned; `None` means no usable value
    /// could be produced.
    #[allow(clippy::too_many_arguments)]
    fn emit_assignment(
        &mut self,
        type_name: &str,
        path: &str,
        field_name: &str,
        module: &str,
        out: &mut Vec<String>,
        access: AccessMode,
        create_temp: bool,
    ) -> Option<String> {
        let registry = self.registry;
        let values = self.values;

        // Primitive (or name-heuristic) literal.
        if let Some(value) = values.contextual_value(type_name, field_name) {
            if create_temp {
                return Some(value);
            }
            match access {
                AccessMode::Member => out.push(format!("{path}({value});")),
                AccessMode::Direct => out.push(format!("{path} = {value};")),
            }
            return None;
        }

        if let Some(def) = registry.get_enum(type_name, module) {
            let symbol = values
                .preferred_enum_symbol(field_name, &def.values)
                .or_else(|| def.values.first());
            let Some(symbol) = symbol else {
                self.diagnostics.push(Diagnostic::warning(
                    TypeRegistry::scoped_key(&def.module, &def.name),
                    "enum has no declared values; skipping assignment",
                ));
                out.push(format!(
                    "// WARNING: enum '{}' has no values (path: {path})",
                    def.name
                ));
                return None;
            };
            let qualified = qualify(&def.module, &def.name, symbol);
            if create_temp {
                return Some(qualified);
            }
            match access {
                AccessMode::Member => out.push(format!("{path}({qualified});")),
                AccessMode::Direct => out.push(format!("{path} = {qualified};")),
            }
            return None;
        }

        if let Some(def) = registry.get_struct(type_name, module) {
            if create_temp {
                let decl_type = scoped_type(&def.module, &def.name);
                out.push(format!("{decl_type} {path};"));
                self.emit_struct_fields(def, path, out);
                return Some(path.to_string());
            }
            let struct_path = match access {
                AccessMode::Member => format!("{path}()"),
                AccessMode::Direct => path.to_string(),
            };
            self.emit_struct_fields(def, &struct_path, out);
            return None;
        }

        if let Some(IdlType::Union(def)) = registry.get(type_name, module) {
            return self.emit_union(def, path, field_name, out, access, create_temp);
        }

        tracing::error!(
            "Unknown type '{}' at path '{}' (module '{}')",
            type_name,
            path,
            module
        );
        self.diagnostics.push(Diagnostic::error(
            path.to_string(),
            format!("unknown or unresolved type '{type_name}'"),
        ));
        out.push(format!(
            "// ERROR: cannot generate value, unknown or unresolved type '{type_name}' (path: {path})"
        ));
        if create_temp {
            return Some(format!("/* unknown type: {type_name} */"));
        }
        None
    }

    /// Exactly one union case is assigned. Selection order: a case whose
    /// payload name matches a configured field-name keyword, then the first
    /// non-default case, then the default case.
    fn emit_union(
        &mut self,
        def: &UnionDef,
        path: &str,
        field_name: &str,
        out: &mut Vec<String>,
        access: AccessMode,
        create_temp: bool,
    ) -> Option<String> {
        let values = self.values;
        let registry = self.registry;

        let union_path = if create_temp {
            let decl_type = scoped_type(&def.module, &def.name);
            out.push(format!("{decl_type} {path};"));
            path.to_string()
        } else {
            match access {
                AccessMode::Member => format!("{path}()"),
                AccessMode::Direct => path.to_string(),
            }
        };

        if def.cases.is_empty() {
            self.diagnostics.push(Diagnostic::warning(
                TypeRegistry::scoped_key(&def.module, &def.name),
                "union has no cases; skipping assignment",
            ));
            out.push(format!(
                "// WARNING: union '{}' has no cases (path: {path})",
                def.name
            ));
            return create_temp.then(|| path.to_string());
        }

        let field_lower = field_name.to_lowercase();
        let mut chosen = None;
        for keyword in &values.union_case_keywords {
            if field_lower.contains(keyword.as_str()) {
                chosen = def
                    .cases
                    .iter()
                    .find(|c| c.field.name.to_lowercase().contains(keyword.as_str()));
                if chosen.is_some() {
                    break;
                }
            }
        }
        let chosen = chosen
            .or_else(|| def.cases.iter().find(|c| !c.is_default()))
            .or_else(|| def.cases.first());
        let case = chosen?;

        let label = case.labels.first().map(String::as_str).unwrap_or_default();
        let discriminator = if case.is_default() && label.to_ascii_lowercase().starts_with("default")
        {
            "0 /* default case assumed */".to_string()
        } else {
            let literal = label
                .trim()
                .strip_prefix("case")
                .unwrap_or(label)
                .trim()
                .trim_end_matches(':')
                .trim()
                .to_string();
            // Qualify enum discriminator literals with their scope.
            match registry.get(&def.discriminator_type, &def.module) {
                Some(IdlType::Enum(ed)) => qualify(&ed.module, &ed.name, &literal),
                _ => literal,
            }
        };
        out.push(format!("{union_path}._d({discriminator});"));

        let case_path = format!("{union_path}.{}", case.field.name);
        self.emit_assignment(
            &case.field.type_name,
            &case_path,
            &case.field.name,
            &def.module,
            out,
            AccessMode::Member,
            false,
        );
        create_temp.then(|| path.to_string())
    }
}

fn scoped_type(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}

fn qualify(module: &str, enum_name: &str, symbol: &str) -> String {
    if module.is_empty() {
        format!("{enum_name}::{symbol}")
    } else {
        format!("{module}::{enum_name}::{symbol}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumDef, Field, StructDef, UnionCase, UnionDef};

    fn field(name: &str, type_name: &str, module: &str) -> Field {
        Field::new(name, type_name, type_name, module)
    }

    fn demo_registry() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        reg.register(
            "Demo",
            "Point",
            IdlType::Struct(StructDef {
                name: "Point".to_string(),
                module: "Demo".to_string(),
                fields: vec![
                    field("latitude", "double", "Demo"),
                    field("longitude", "double", "Demo"),
                ],
            }),
        );
        let mut samples = field("samples", "long", "Demo");
        samples.is_sequence = true;
        samples.sequence_limit = Some("4".to_string());
        let mut grid = field("grid", "long", "Demo");
        grid.is_array = true;
        grid.array_dims = vec!["2".to_string()];
        reg.register(
            "Demo",
            "Reading",
            IdlType::Struct(StructDef {
                name: "Reading".to_string(),
                module: "Demo".to_string(),
                fields: vec![
                    field("sensor_id", "string", "Demo"),
                    field("position", "Point", "Demo"),
                    samples,
                    grid,
                    field("has_error", "boolean", "Demo"),
                ],
            }),
        );
        reg
    }

    #[test]
    fn test_demo_reading_assignments() {
        let reg = demo_registry();
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Reading", "Demo", "m_data");

        assert!(lines.contains(&"m_data.sensor_id(\"DeviceID_123\");".to_string()));
        assert!(lines.contains(&"m_data.position().latitude(37.7749);".to_string()));
        assert!(lines.contains(&"m_data.position().longitude(-122.4194);".to_string()));
        assert!(lines.contains(&"m_data.samples().push_back(123456789L);".to_string()));
        assert!(lines.contains(&"m_data.grid()[0] = 123456789L;".to_string()));
        assert!(lines.contains(&"m_data.has_error(false);".to_string()));
        assert!(gen.diagnostics().is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let reg = demo_registry();
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let first = gen.generate_assignments("Reading", "Demo", "m_data");
        let second = gen.generate_assignments("Reading", "Demo", "m_data");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_struct_yields_error_line() {
        let reg = TypeRegistry::new();
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Nope", "Demo", "m_data");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("// ERROR"));
        assert_eq!(gen.diagnostics().len(), 1);
    }

    #[test]
    fn test_enum_topical_selection() {
        let mut reg = TypeRegistry::new();
        reg.register(
            "M",
            "Status",
            IdlType::Enum(EnumDef {
                name: "Status".to_string(),
                module: "M".to_string(),
                values: vec![
                    "IDLE".to_string(),
                    "PATROL".to_string(),
                    "ERROR".to_string(),
                ],
            }),
        );
        reg.register(
            "M",
            "Task",
            IdlType::Struct(StructDef {
                name: "Task".to_string(),
                module: "M".to_string(),
                fields: vec![field("task_status", "Status", "M"), field("mode", "Status", "M")],
            }),
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Task", "M", "m_data");
        // `status` in the name prefers IDLE/PATROL; other fields take the
        // first declared symbol.
        assert!(lines.contains(&"m_data.task_status(M::Status::IDLE);".to_string()));
        assert!(lines.contains(&"m_data.mode(M::Status::IDLE);".to_string()));
    }

    #[test]
    fn test_enum_without_preference_takes_first_value() {
        let mut reg = TypeRegistry::new();
        reg.register(
            "M",
            "Color",
            IdlType::Enum(EnumDef {
                name: "Color".to_string(),
                module: "M".to_string(),
                values: vec!["RED".to_string(), "GREEN".to_string()],
            }),
        );
        reg.register(
            "M",
            "S",
            IdlType::Struct(StructDef {
                name: "S".to_string(),
                module: "M".to_string(),
                fields: vec![field("paint", "Color", "M")],
            }),
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("S", "M", "m_data");
        assert_eq!(lines, vec!["m_data.paint(M::Color::RED);".to_string()]);
    }

    fn union_registry(cases: Vec<UnionCase>, disc: &str) -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        reg.register(
            "M",
            "Point",
            IdlType::Struct(StructDef {
                name: "Point".to_string(),
                module: "M".to_string(),
                fields: vec![field("latitude", "double", "M")],
            }),
        );
        reg.register(
            "M",
            "Payload",
            IdlType::Union(UnionDef {
                name: "Payload".to_string(),
                module: "M".to_string(),
                discriminator_type: disc.to_string(),
                cases,
            }),
        );
        reg.register(
            "M",
            "Msg",
            IdlType::Struct(StructDef {
                name: "Msg".to_string(),
                module: "M".to_string(),
                fields: vec![field("location", "Payload", "M")],
            }),
        );
        reg
    }

    #[test]
    fn test_union_first_non_default_case_selected() {
        let reg = union_registry(
            vec![
                UnionCase {
                    labels: vec!["default:".to_string()],
                    field: field("code", "long", "M"),
                },
                UnionCase {
                    labels: vec!["case 1:".to_string()],
                    field: field("gps_data", "Point", "M"),
                },
            ],
            "long",
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Msg", "M", "m_data");

        assert!(lines.contains(&"m_data.location()._d(1);".to_string()));
        assert!(lines.contains(&"m_data.location().gps_data().latitude(37.7749);".to_string()));
        // Exactly one case is assigned: the default arm stays untouched.
        assert!(!lines.iter().any(|l| l.contains("code")));
    }

    #[test]
    fn test_union_keyword_steering() {
        let reg = union_registry(
            vec![
                UnionCase {
                    labels: vec!["case 1:".to_string()],
                    field: field("gps_data", "Point", "M"),
                },
                UnionCase {
                    labels: vec!["case 2:".to_string()],
                    field: field("status_code", "long", "M"),
                },
            ],
            "long",
        );
        let table = ValueTable::default();
        let mut reg2 = reg;
        // Rename the rooting field so the `status` keyword steers selection.
        if let Some(IdlType::Struct(s)) = reg2.entry_mut("M::Msg") {
            s.fields[0].name = "unit_status".to_string();
        }
        let table2 = table;
        let mut gen = CodeGenerator::new(&reg2, &table2);
        let lines = gen.generate_assignments("Msg", "M", "m_data");
        assert!(lines.contains(&"m_data.unit_status()._d(2);".to_string()));
        assert!(lines.iter().any(|l| l.contains("status_code")));
        assert!(!lines.iter().any(|l| l.contains("gps_data")));
    }

    #[test]
    fn test_union_default_only_case() {
        let reg = union_registry(
            vec![UnionCase {
                labels: vec!["default:".to_string()],
                field: field("code", "long", "M"),
            }],
            "long",
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Msg", "M", "m_data");
        assert!(lines.contains(&"m_data.location()._d(0 /* default case assumed */);".to_string()));
        assert!(lines.contains(&"m_data.location().code(123456789L);".to_string()));
    }

    #[test]
    fn test_union_enum_discriminator_qualified() {
        let mut reg = union_registry(
            vec![UnionCase {
                labels: vec!["case ACTIVE:".to_string()],
                field: field("gps_data", "Point", "M"),
            }],
            "Kind",
        );
        reg.register(
            "M",
            "Kind",
            IdlType::Enum(EnumDef {
                name: "Kind".to_string(),
                module: "M".to_string(),
                values: vec!["ACTIVE".to_string()],
            }),
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Msg", "M", "m_data");
        assert!(lines.contains(&"m_data.location()._d(M::Kind::ACTIVE);".to_string()));
    }

    #[test]
    fn test_sequence_of_structs_gets_two_moved_elements() {
        let mut reg = TypeRegistry::new();
        reg.register(
            "M",
            "Point",
            IdlType::Struct(StructDef {
                name: "Point".to_string(),
                module: "M".to_string(),
                fields: vec![field("latitude", "double", "M")],
            }),
        );
        let mut pts = field("pts", "Point", "M");
        pts.is_sequence = true;
        reg.register(
            "M",
            "Track",
            IdlType::Struct(StructDef {
                name: "Track".to_string(),
                module: "M".to_string(),
                fields: vec![pts],
            }),
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("Track", "M", "m_data");

        assert!(lines.contains(&"M::Point m_data_pts_item;".to_string()));
        assert!(lines.contains(&"m_data_pts_item.latitude(37.7749);".to_string()));
        assert!(lines.contains(&"m_data.pts().push_back(m_data_pts_item);".to_string()));
        assert!(lines.contains(&"M::Point m_data_pts_item2;".to_string()));
        assert!(lines
            .contains(&"m_data.pts().push_back(std::move(m_data_pts_item2));".to_string()));
    }

    #[test]
    fn test_unknown_type_degrades_to_error_comment() {
        let mut reg = TypeRegistry::new();
        reg.register(
            "M",
            "S",
            IdlType::Struct(StructDef {
                name: "S".to_string(),
                module: "M".to_string(),
                fields: vec![field("mystery", "Ghost", "M")],
            }),
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("S", "M", "m_data");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("// ERROR"));
        assert!(lines[0].contains("Ghost"));
        assert_eq!(gen.diagnostics().len(), 1);
    }

    #[test]
    fn test_string_sequence_gets_single_element() {
        let mut reg = TypeRegistry::new();
        let mut tags = field("tags", "string", "M");
        tags.is_sequence = true;
        reg.register(
            "M",
            "S",
            IdlType::Struct(StructDef {
                name: "S".to_string(),
                module: "M".to_string(),
                fields: vec![tags],
            }),
        );
        let table = ValueTable::default();
        let mut gen = CodeGenerator::new(&reg, &table);
        let lines = gen.generate_assignments("S", "M", "m_data");
        let pushes: Vec<&String> = lines.iter().filter(|l| l.contains("push_back")).collect();
        // Both synthetic item names resolve to the same literal, so only one
        // element is pushed.
        assert_eq!(pushes.len(), 1);
        assert!(pushes[0].contains("\"Hello IDL\""));
    }
}
