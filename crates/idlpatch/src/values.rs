// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Synthetic value selection tables.
//!
//! The generator picks a literal for each primitive field through a fixed
//! cascade: string keyword rules, then name-based numeric/boolean rules, then
//! an exact type-name fallback table. The cascade order is the contract; the
//! literals themselves are data and can be overridden from a YAML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Case-insensitive substring rule: fires when the field name contains
/// `keyword`. Rules are tried in declared order; first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub value: String,
}

impl KeywordRule {
    fn new(keyword: &str, value: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            value: value.to_string(),
        }
    }
}

/// Preferred enum symbols for fields whose name contains `keyword`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumPreference {
    pub keyword: String,
    pub symbols: Vec<String>,
}

/// The complete, overridable value table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueTable {
    /// Sub-rules applied when a string field's name contains `id`.
    pub id_rules: Vec<KeywordRule>,
    /// Literal for string `id` fields no sub-rule matched.
    pub id_fallback: String,
    /// Rules for other string-typed fields.
    pub string_rules: Vec<KeywordRule>,
    /// Literal for string fields no rule matched.
    pub string_fallback: String,
    /// Name-based rules for numeric, timestamp and boolean fields, in
    /// priority order. These fire before any type-based dispatch.
    pub numeric_rules: Vec<KeywordRule>,
    /// Exact primitive type name -> literal. Consulted only when no
    /// name-based rule fired. Keys double as the primitive type set.
    pub fallback: BTreeMap<String, String>,
    /// Extra names treated as primitives without a fallback literal.
    pub extra_primitives: Vec<String>,
    /// Topical enum symbol preferences, e.g. `status` fields prefer `IDLE`.
    pub enum_preferences: Vec<EnumPreference>,
    /// Field-name keywords that steer union case selection.
    pub union_case_keywords: Vec<String>,
}

impl Default for ValueTable {
    fn default() -> Self {
        let fallback: BTreeMap<String, String> = [
            ("float", "10.5f"),
            ("double", "123.456"),
            ("long", "123456789L"),
            ("unsigned long", "123456789UL"),
            ("short", "90"),
            ("unsigned short", "100"),
            ("long long", "9876543210LL"),
            ("unsigned long long", "9876543210ULL"),
            ("long double", "123.456L"),
            ("int8_t", "10"),
            ("uint8_t", "20"),
            ("int16_t", "30"),
            ("uint16_t", "40"),
            ("int32_t", "50"),
            ("uint32_t", "60"),
            ("int64_t", "70"),
            ("uint64_t", "80"),
            ("int8", "10"),
            ("uint8", "20"),
            ("int16", "30"),
            ("uint16", "40"),
            ("int32", "50"),
            ("uint32", "60"),
            ("int64", "70"),
            ("uint64", "80"),
            ("char", "'A'"),
            ("wchar_t", "L'B'"),
            ("boolean", "true"),
            ("octet", "0x01"),
            ("string", "\"Fallback String\""),
            ("wstring", "L\"Fallback WString\""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            id_rules: vec![
                KeywordRule::new("sender", "\"Vehicle_Sender_01\""),
                KeywordRule::new("receiver", "\"Vehicle_Receiver_02\""),
                KeywordRule::new("target", "\"Target_789\""),
            ],
            id_fallback: "\"DeviceID_123\"".to_string(),
            string_rules: vec![
                KeywordRule::new("command", "\"Patrol\""),
                KeywordRule::new("description", "\"Detected person of interest\""),
                KeywordRule::new("link", "\"./data/raw.bin\""),
                KeywordRule::new("name", "\"DefaultName\""),
            ],
            string_fallback: "\"Hello IDL\"".to_string(),
            numeric_rules: vec![
                KeywordRule::new("latitude", "37.7749"),
                KeywordRule::new("longitude", "-122.4194"),
                KeywordRule::new("altitude", "100.0f"),
                KeywordRule::new("speed", "15.5f"),
                KeywordRule::new("confidence", "0.95f"),
                KeywordRule::new("signal", "-70.0f"),
                KeywordRule::new("seconds", "1678886400L"),
                KeywordRule::new("nano", "500000000UL"),
                KeywordRule::new("orientation", "180"),
                KeywordRule::new("battery", "80"),
                KeywordRule::new("error", "false"),
                KeywordRule::new("fail", "false"),
            ],
            fallback,
            extra_primitives: Vec::new(),
            enum_preferences: vec![
                EnumPreference {
                    keyword: "status".to_string(),
                    symbols: vec!["IDLE".to_string(), "PATROL".to_string()],
                },
                EnumPreference {
                    keyword: "type".to_string(),
                    symbols: vec!["PERSON".to_string(), "VEHICLE".to_string()],
                },
            ],
            union_case_keywords: vec![
                "status".to_string(),
                "detection".to_string(),
                "command".to_string(),
            ],
        }
    }
}

/// Type names compare with internal whitespace removed, so `unsigned  long`
/// and `unsigned long` are the same primitive.
pub fn clean_type_name(name: &str) -> String {
    name.split_whitespace().collect()
}

impl ValueTable {
    /// Load overrides from a YAML file. Missing sections keep their built-in
    /// defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read value table {}", path.display()))?;
        let table: ValueTable = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse value table {}", path.display()))?;
        Ok(table)
    }

    /// The primitive type name set, cleaned of internal whitespace.
    pub fn primitive_types(&self) -> HashSet<String> {
        self.fallback
            .keys()
            .map(|k| clean_type_name(k))
            .chain(self.extra_primitives.iter().map(|k| clean_type_name(k)))
            .collect()
    }

    pub fn is_primitive(&self, raw_type: &str) -> bool {
        let clean = clean_type_name(raw_type);
        self.fallback.keys().any(|k| clean_type_name(k) == clean)
            || self
                .extra_primitives
                .iter()
                .any(|k| clean_type_name(k) == clean)
    }

    /// Pick a literal for a primitive field, or `None` when the type is not
    /// primitive and no name-based rule fired.
    pub fn contextual_value(&self, type_name: &str, field_name: &str) -> Option<String> {
        let field_lower = field_name.to_lowercase();
        let clean = clean_type_name(type_name);

        // 1. String-typed fields: keyword rules, id sub-rules first.
        if clean == "string" {
            if field_lower.contains("id") {
                for rule in &self.id_rules {
                    if field_lower.contains(&rule.keyword) {
                        return Some(rule.value.clone());
                    }
                }
                return Some(self.id_fallback.clone());
            }
            for rule in &self.string_rules {
                if field_lower.contains(&rule.keyword) {
                    return Some(rule.value.clone());
                }
            }
            return Some(self.string_fallback.clone());
        }

        // 2-4. Name-based rules, regardless of declared type.
        for rule in &self.numeric_rules {
            if field_lower.contains(&rule.keyword) {
                return Some(rule.value.clone());
            }
        }

        // 5. Exact type-name fallback.
        self.fallback
            .iter()
            .find(|(k, _)| clean_type_name(k) == clean)
            .map(|(_, v)| v.clone())
    }

    /// Preferred enum symbol for a field name, if any preference keyword
    /// matches and the enum declares one of the preferred symbols.
    pub fn preferred_enum_symbol<'a>(
        &self,
        field_name: &str,
        declared: &'a [String],
    ) -> Option<&'a String> {
        let field_lower = field_name.to_lowercase();
        for pref in &self.enum_preferences {
            if field_lower.contains(&pref.keyword) {
                return declared.iter().find(|v| pref.symbols.contains(v));
            }
        }
        None
    }
}
