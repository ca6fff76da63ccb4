//! Enum Definitions
//!
//! Collects every enum among the resolved definitions and decides which ones
//! need their identifiers prefixed with the type name to stay unique in a
//! shared namespace.

use serde::Serialize;
use std::collections::HashSet;

use super::descriptor::{EnumValue, TypeDefinition};
use super::types::{Scalar, TypeExpr};
use crate::config::ResolverConfig;
use crate::names::uppercase_first;

/// An enum ready for emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDefinition {
    pub type_name: String,
    pub values: Vec<EnumValue>,
    /// Quote placed around literal values (`"` for string enums)
    pub value_wrapper: String,
    pub prefix_type_name: bool,
}

impl EnumDefinition {
    fn from_definition(def: &TypeDefinition<'_>) -> Self {
        let value_wrapper = if def.schema.target == TypeExpr::Scalar(Scalar::String) {
            "\""
        } else {
            ""
        };
        Self {
            type_name: def.type_name.clone(),
            values: def.schema.enum_values.clone(),
            value_wrapper: value_wrapper.to_string(),
            prefix_type_name: false,
        }
    }

    /// Emitted identifiers paired with their raw values
    pub fn values(&self) -> Vec<EnumValue> {
        self.values
            .iter()
            .map(|v| {
                let identifier = if self.prefix_type_name {
                    format!("{}{}", self.type_name, uppercase_first(&v.identifier))
                } else {
                    v.identifier.clone()
                };
                EnumValue::new(identifier, v.value.clone())
            })
            .collect()
    }

    fn has_identifier(&self, identifier: &str) -> bool {
        self.values.iter().any(|v| v.identifier == identifier)
    }

    fn shares_identifier_with(&self, other: &EnumDefinition) -> bool {
        self.values.iter().any(|v| other.has_identifier(&v.identifier))
    }
}

/// Gather enum definitions and mark the ones whose identifiers would clash.
///
/// An enum is prefixed when it shares an identifier with another enum, when
/// one of its identifiers equals a non-enum type name or its own type name,
/// or when `always_prefix_enum_values` is set.
pub fn collect_enum_definitions(
    types: &[TypeDefinition<'_>],
    config: &ResolverConfig,
) -> Vec<EnumDefinition> {
    let mut enums: Vec<EnumDefinition> = types
        .iter()
        .filter(|def| def.schema.is_enum())
        .map(EnumDefinition::from_definition)
        .collect();

    let other_type_names: HashSet<&str> = types
        .iter()
        .filter(|def| !def.schema.is_enum())
        .map(|def| def.type_name.as_str())
        .collect();

    let mut prefix = vec![config.compatibility.always_prefix_enum_values; enums.len()];

    for i in 0..enums.len() {
        for j in (i + 1)..enums.len() {
            if enums[i].shares_identifier_with(&enums[j]) {
                prefix[i] = true;
                prefix[j] = true;
            }
        }

        let e = &enums[i];
        if e.has_identifier(&e.type_name)
            || e.values
                .iter()
                .any(|v| other_type_names.contains(v.identifier.as_str()))
        {
            prefix[i] = true;
        }
    }

    for (e, prefixed) in enums.iter_mut().zip(prefix) {
        e.prefix_type_name = prefixed;
    }
    enums
}
