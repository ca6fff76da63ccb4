//! Enum composition
//!
//! Enums resolve like the primitive they wrap but always become a distinct
//! named type, so their values are not interchangeable with plain scalars.

use serde_json::Value;

use super::{child_path, primitive, registrar, SchemaResolver};
use crate::error::Result;
use crate::model::{EnumValue, TypeDescriptor};
use crate::names::{
    path_to_json_name, path_to_type_name, sanitize_enum_names, schema_name_to_type_name,
};
use crate::schema::extensions::{ENUM_DISPLAY_NAMES, TYPE_NAME};
use crate::schema::SchemaNode;

pub fn compose<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    path: &[String],
    out: &mut TypeDescriptor<'a>,
) -> Result<()> {
    primitive::translate(resolver, node, path, out)?;
    out.define_via_alias = false;

    let values: Vec<String> = node.enum_values.iter().map(literal).collect();
    let names = display_names(node, &values)?;
    let old_enum_conflicts = resolver.config().compatibility.old_enum_conflicts;

    out.enum_values = sanitize_enum_names(&names, &values)
        .into_iter()
        .map(|(identifier, value)| {
            let identifier = if identifier.is_empty() {
                "Empty".to_string()
            } else {
                identifier
            };
            let identifier = if old_enum_conflicts {
                schema_name_to_type_name(&path_to_type_name(&child_path(path, identifier)))
            } else {
                identifier
            };
            EnumValue::new(identifier, value)
        })
        .collect();

    // Top-level enums are named by their component; nested ones need their own type.
    if path.len() > 1 {
        let type_name = match TYPE_NAME.get(&node.extensions)? {
            Some(name) => name,
            None => schema_name_to_type_name(&path_to_type_name(path)),
        };
        registrar::register_as(out, type_name, path_to_json_name(path));
    }
    Ok(())
}

/// Enum value as text: strings verbatim, other literals in JSON form
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display names from the first hint present. Values past the end of a
/// short hint fall back to their raw text.
fn display_names(node: &SchemaNode, values: &[String]) -> Result<Vec<String>> {
    for directive in ENUM_DISPLAY_NAMES {
        if let Some(names) = directive.get(&node.extensions)? {
            return Ok(names);
        }
    }
    Ok(values.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::model::{Scalar, TypeExpr};
    use crate::schema::SchemaRef;
    use serde_json::json;

    fn identifiers(desc: &TypeDescriptor<'_>) -> Vec<String> {
        desc.enum_values.iter().map(|v| v.identifier.clone()).collect()
    }

    #[test]
    fn test_integer_enum_keeps_digits() {
        let config = ResolverConfig::default();
        let sref: SchemaRef = serde_json::from_value(json!({ "type": "integer", "enum": [1, 2, 3] })).unwrap();
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Level"]).unwrap();

        assert_eq!(identifiers(&desc), vec!["1", "2", "3"]);
        assert_eq!(desc.enum_values[0].value, "1");
        assert_eq!(desc.target, TypeExpr::Scalar(Scalar::Int));
        assert!(!desc.define_via_alias);
        assert!(desc.additional_types.is_empty());
    }

    #[test]
    fn test_display_name_hint() {
        let config = ResolverConfig::default();
        let sref: SchemaRef = serde_json::from_value(json!({
            "type": "integer",
            "enum": [1, 2, 3],
            "x-enum-varnames": ["One", "Two", "Three"]
        }))
        .unwrap();
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Level"]).unwrap();
        assert_eq!(identifiers(&desc), vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_short_hint_falls_back_to_values() {
        let config = ResolverConfig::default();
        let sref: SchemaRef = serde_json::from_value(json!({
            "type": "string",
            "enum": ["a", "b"],
            "x-enumNames": ["First"]
        }))
        .unwrap();
        let desc = SchemaResolver::new(&config)
            .resolve(Some(&sref), &["Letter"])
            .unwrap();
        assert_eq!(
            desc.enum_values,
            vec![EnumValue::new("First", "a"), EnumValue::new("B", "b")]
        );
    }

    #[test]
    fn test_empty_value_identifier() {
        let config = ResolverConfig::default();
        let sref: SchemaRef = serde_json::from_value(json!({ "type": "string", "enum": ["", "set"] })).unwrap();
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Flag"]).unwrap();
        assert_eq!(identifiers(&desc), vec!["Empty", "Set"]);
        assert_eq!(desc.enum_values[0].value, "");
    }

    #[test]
    fn test_nested_enum_registers_type() {
        let config = ResolverConfig::default();
        let sref: SchemaRef = serde_json::from_value(json!({ "type": "string", "enum": ["cat", "dog"] })).unwrap();
        let desc = SchemaResolver::new(&config)
            .resolve(Some(&sref), &["Pet", "kind"])
            .unwrap();

        assert_eq!(desc.ref_type.as_deref(), Some("PetKind"));
        assert_eq!(desc.additional_types.len(), 1);
        assert_eq!(desc.additional_types[0].type_name, "PetKind");
        assert_eq!(desc.additional_types[0].json_name, "Pet.kind");
        assert!(desc.additional_types[0].schema.is_enum());
    }

    #[test]
    fn test_nested_enum_honours_type_name() {
        let config = ResolverConfig::default();
        let sref: SchemaRef = serde_json::from_value(json!({
            "type": "string",
            "enum": ["cat"],
            "x-type-name": "Species"
        }))
        .unwrap();
        let desc = SchemaResolver::new(&config)
            .resolve(Some(&sref), &["Pet", "kind"])
            .unwrap();
        assert_eq!(desc.ref_type.as_deref(), Some("Species"));
    }

    #[test]
    fn test_old_enum_conflicts_prefixes_with_path() {
        let mut config = ResolverConfig::default();
        config.compatibility.old_enum_conflicts = true;
        let sref: SchemaRef = serde_json::from_value(json!({ "type": "string", "enum": ["cat"] })).unwrap();
        let desc = SchemaResolver::new(&config)
            .resolve(Some(&sref), &["Pet", "kind"])
            .unwrap();
        assert_eq!(identifiers(&desc), vec!["PetKindCat"]);
    }
}
