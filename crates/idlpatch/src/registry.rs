// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scoped type registry filled by the parser and read by the generator.
//!
//! Entries are keyed `Module::Name` (bare `Name` for global scope). A name is
//! registered once per scope; re-declarations are ignored. A secondary
//! bare-name map records which module first declared each name and serves as
//! the fallback when resolving unscoped references.

use crate::model::{EnumDef, IdlType, StructDef};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, IdlType>,
    module_of: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry key for a name in a scope.
    pub fn scoped_key(module: &str, name: &str) -> String {
        if module.is_empty() {
            name.to_string()
        } else {
            format!("{module}::{name}")
        }
    }

    /// Register a placeholder entry. First discovery wins: returns `false`
    /// (and drops `ty`) when the scoped name already exists.
    pub fn register(&mut self, module: &str, name: &str, ty: IdlType) -> bool {
        self.module_of
            .entry(name.to_string())
            .or_insert_with(|| module.to_string());
        let key = Self::scoped_key(module, name);
        if self.types.contains_key(&key) {
            return false;
        }
        self.types.insert(key, ty);
        true
    }

    /// Look up a type by raw reference, prioritizing module context:
    /// explicit `Module::Name` scope, then the current module, then the
    /// bare-name fallback map, then an unscoped global entry.
    pub fn get(&self, raw_name: &str, current_module: &str) -> Option<&IdlType> {
        if raw_name.contains("::") {
            return self.types.get(raw_name);
        }
        if !current_module.is_empty() {
            if let Some(t) = self.types.get(&Self::scoped_key(current_module, raw_name)) {
                return Some(t);
            }
        }
        if let Some(module) = self.module_of.get(raw_name) {
            if let Some(t) = self.types.get(&Self::scoped_key(module, raw_name)) {
                return Some(t);
            }
        }
        match self.types.get(raw_name) {
            Some(t) if t.module().is_empty() => Some(t),
            _ => None,
        }
    }

    /// Type-narrowing lookup: `None` when the name resolves to a non-struct.
    pub fn get_struct(&self, raw_name: &str, current_module: &str) -> Option<&StructDef> {
        match self.get(raw_name, current_module) {
            Some(IdlType::Struct(s)) => Some(s),
            _ => None,
        }
    }

    /// Type-narrowing lookup: `None` when the name resolves to a non-enum.
    pub fn get_enum(&self, raw_name: &str, current_module: &str) -> Option<&EnumDef> {
        match self.get(raw_name, current_module) {
            Some(IdlType::Enum(e)) => Some(e),
            _ => None,
        }
    }

    /// Mutable access by exact scoped key, used during body parsing.
    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut IdlType> {
        self.types.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate all entries. Order is unspecified; callers that need
    /// determinism must sort.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IdlType)> {
        self.types.iter()
    }

    /// All scoped keys, sorted. Used where iteration order must be stable.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.types.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumDef, StructDef};

    fn strukt(name: &str, module: &str) -> IdlType {
        IdlType::Struct(StructDef {
            name: name.to_string(),
            module: module.to_string(),
            fields: Vec::new(),
        })
    }

    #[test]
    fn test_first_registration_wins() {
        let mut reg = TypeRegistry::new();
        assert!(reg.register("Core", "Point", strukt("Point", "Core")));
        assert!(!reg.register("Core", "Point", strukt("Point", "Core")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_lookup_prefers_current_module() {
        let mut reg = TypeRegistry::new();
        reg.register("A", "Point", strukt("Point", "A"));
        reg.register("B", "Point", strukt("Point", "B"));

        let got = reg.get("Point", "B").expect("lookup failed");
        assert_eq!(got.module(), "B");
    }

    #[test]
    fn test_bare_name_fallback_uses_first_declaring_module() {
        let mut reg = TypeRegistry::new();
        reg.register("A", "Point", strukt("Point", "A"));
        reg.register("B", "Point", strukt("Point", "B"));

        // No module context: the first writer of the bare name wins.
        let got = reg.get("Point", "").expect("lookup failed");
        assert_eq!(got.module(), "A");
    }

    #[test]
    fn test_global_entry_resolves_without_scope() {
        let mut reg = TypeRegistry::new();
        reg.register("", "Header", strukt("Header", ""));
        assert!(reg.get("Header", "").is_some());
        // And from inside a module that does not shadow it.
        assert!(reg.get("Header", "Core").is_some());
    }

    #[test]
    fn test_explicit_scope_bypasses_context() {
        let mut reg = TypeRegistry::new();
        reg.register("A", "Point", strukt("Point", "A"));
        assert!(reg.get("A::Point", "B").is_some());
        assert!(reg.get("B::Point", "B").is_none());
    }

    #[test]
    fn test_type_narrowing_wrappers() {
        let mut reg = TypeRegistry::new();
        reg.register("A", "Point", strukt("Point", "A"));
        reg.register(
            "A",
            "Status",
            IdlType::Enum(EnumDef {
                name: "Status".to_string(),
                module: "A".to_string(),
                values: vec!["IDLE".to_string()],
            }),
        );

        assert!(reg.get_struct("Point", "A").is_some());
        assert!(reg.get_enum("Point", "A").is_none());
        assert!(reg.get_enum("Status", "A").is_some());
        assert!(reg.get_struct("Status", "A").is_none());
    }
}
