// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! IDL type model: the data records the parser fills and the generator walks.

/// One member declaration inside a struct or union case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Declared member name.
    pub name: String,
    /// Effective type name after sequence/string classification and typedef
    /// resolution. For `sequence<T>` this is `T`, for bounded strings it is
    /// the pseudo-type `string`/`wstring`.
    pub type_name: String,
    /// Raw declared type text including any array suffix.
    pub full_type_text: String,
    /// Module the declaration was found in (empty for global scope).
    pub module: String,
    pub is_array: bool,
    /// Array dimension expressions, outermost first.
    pub array_dims: Vec<String>,
    pub is_sequence: bool,
    /// Optional sequence bound expression.
    pub sequence_limit: Option<String>,
    /// Optional bound for `string<N>` / `wstring<N>`.
    pub string_limit: Option<String>,
}

impl Field {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        full_type_text: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            full_type_text: full_type_text.into(),
            module: module.into(),
            is_array: false,
            array_dims: Vec::new(),
            is_sequence: false,
            sequence_limit: None,
            string_limit: None,
        }
    }
}

/// Struct definition. Field order is declaration order; the generator relies
/// on it for deterministic emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub module: String,
    pub fields: Vec<Field>,
}

/// Enum definition. The first declared symbol is the implicit default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub module: String,
    pub values: Vec<String>,
}

/// One `case`/`default` arm of a union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionCase {
    /// Raw label strings, e.g. `"case 1:"` or `"default:"`.
    pub labels: Vec<String>,
    pub field: Field,
}

impl UnionCase {
    pub fn is_default(&self) -> bool {
        self.labels
            .iter()
            .any(|l| l.to_ascii_lowercase().starts_with("default"))
    }
}

/// Union definition with resolved discriminator type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDef {
    pub name: String,
    pub module: String,
    pub discriminator_type: String,
    pub cases: Vec<UnionCase>,
}

/// Typedef definition. `resolved_base_type` is filled by the fixed-point
/// resolution pass and stays empty for unresolved chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefDef {
    pub name: String,
    pub module: String,
    /// Cleaned base type text, with any array suffix appended.
    pub base_type_text: String,
    pub resolved_base_type: String,
}

/// Closed variant set of everything the parser can register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdlType {
    Struct(StructDef),
    Enum(EnumDef),
    Union(UnionDef),
    Typedef(TypedefDef),
}

impl IdlType {
    pub fn name(&self) -> &str {
        match self {
            IdlType::Struct(s) => &s.name,
            IdlType::Enum(e) => &e.name,
            IdlType::Union(u) => &u.name,
            IdlType::Typedef(t) => &t.name,
        }
    }

    pub fn module(&self) -> &str {
        match self {
            IdlType::Struct(s) => &s.module,
            IdlType::Enum(e) => &e.module,
            IdlType::Union(u) => &u.module,
            IdlType::Typedef(t) => &t.module,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            IdlType::Struct(_) => "struct",
            IdlType::Enum(_) => "enum",
            IdlType::Union(_) => "union",
            IdlType::Typedef(_) => "typedef",
        }
    }
}
