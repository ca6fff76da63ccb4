//! Union composition
//!
//! Resolves `oneOf` / `anyOf` alternatives into an ordered list of named
//! element types. Inline alternatives are named after their position
//! (`<path>_<index>`); referenced ones keep the referenced type name.

use std::collections::BTreeMap;

use super::{child_path, registrar, SchemaResolver};
use crate::error::{Result, ResultExt, TypeModelError};
use crate::model::{Discriminator, TypeDescriptor};
use crate::names::{
    path_to_json_name, path_to_type_name, ref_path_to_object_name, schema_name_to_type_name,
};
use crate::schema::{DiscriminatorSpec, SchemaRef};

/// Append the union alternatives in `elements` to `out`
pub fn compose<'a>(
    resolver: &SchemaResolver<'a>,
    out: &mut TypeDescriptor<'a>,
    elements: &'a [SchemaRef],
    discriminator: Option<&DiscriminatorSpec>,
    path: &[String],
) -> Result<()> {
    let mut mapping = discriminator.map(|_| BTreeMap::new());

    for (i, element) in elements.iter().enumerate() {
        let element_path = child_path(path, i.to_string());
        let mut element_desc = resolver
            .resolve_path(Some(element), &element_path)
            .context_with(|| format!("element {}", i))?;

        let reference = element.reference().filter(|_| element.is_type_reference());
        let type_name = match reference {
            None => {
                let name = schema_name_to_type_name(&path_to_type_name(&element_path));
                if element_desc.type_decl().as_named() != Some(name.as_str()) {
                    registrar::register_as(
                        &mut element_desc,
                        name.clone(),
                        path_to_json_name(&element_path),
                    );
                }
                out.additional_types.append(&mut element_desc.additional_types);
                name
            }
            Some(_) => element_desc.type_decl().to_string(),
        };

        if let (Some(spec), Some(mapping)) = (discriminator, mapping.as_mut()) {
            let key = match reference {
                None => {
                    if targets_inline(spec, &type_name) {
                        return Err(TypeModelError::AmbiguousDiscriminator(type_name));
                    }
                    String::new()
                }
                Some(reference) => spec
                    .mapping
                    .iter()
                    .find(|(_, target)| target.as_str() == reference)
                    .map(|(value, _)| value.clone())
                    .unwrap_or_else(|| ref_path_to_object_name(reference).to_string()),
            };
            mapping.insert(key, type_name.clone());
        }

        out.union_elements.push(type_name);
    }

    if let (Some(spec), Some(mapping)) = (discriminator, mapping) {
        if mapping.len() != elements.len() {
            return Err(TypeModelError::DiscriminatorIncomplete {
                property: spec.property_name.clone(),
                mapped: mapping.len(),
                elements: elements.len(),
            });
        }
        out.discriminator = Some(Discriminator {
            property: spec.property_name.clone(),
            mapping,
        });
    }
    Ok(())
}

/// An explicit mapping entry names an inline alternative by its synthesized name
fn targets_inline(spec: &DiscriminatorSpec, type_name: &str) -> bool {
    let suffix = format!("/{}", type_name);
    spec.mapping
        .values()
        .any(|target| target == type_name || target.ends_with(&suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::model::TypeExpr;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> SchemaRef {
        serde_json::from_value(value).unwrap()
    }

    fn resolve_error(value: serde_json::Value) -> TypeModelError {
        let sref = schema(value);
        let config = ResolverConfig::default();
        let resolver = SchemaResolver::new(&config);
        let result = resolver.resolve(Some(&sref), &["Pet"]);
        result.unwrap_err()
    }

    #[test]
    fn test_inline_elements_are_named_by_position() {
        let sref = schema(json!({
            "oneOf": [
                { "type": "object", "properties": { "bark": { "type": "boolean" } } },
                { "$ref": "#/components/schemas/Cat" }
            ]
        }));
        let config = ResolverConfig::default();
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Pet"]).unwrap();

        assert_eq!(desc.union_elements, vec!["Pet0", "Cat"]);
        assert_eq!(desc.additional_types.len(), 1);
        assert_eq!(desc.additional_types[0].type_name, "Pet0");
        assert!(desc.additional_types[0].schema.target.is_struct());
        assert!(matches!(&desc.target, TypeExpr::Struct(body) if body.union_storage));
    }

    #[test]
    fn test_duplicate_elements_are_kept() {
        let sref = schema(json!({
            "anyOf": [
                { "$ref": "#/components/schemas/Cat" },
                { "$ref": "#/components/schemas/Cat" }
            ]
        }));
        let config = ResolverConfig::default();
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Pet"]).unwrap();
        assert_eq!(desc.union_elements, vec!["Cat", "Cat"]);
    }

    #[test]
    fn test_explicit_and_implicit_mapping() {
        let sref = schema(json!({
            "oneOf": [
                { "$ref": "#/components/schemas/Cat" },
                { "$ref": "#/components/schemas/Dog" }
            ],
            "discriminator": {
                "propertyName": "kind",
                "mapping": { "kitty": "#/components/schemas/Cat" }
            }
        }));
        let config = ResolverConfig::default();
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Pet"]).unwrap();

        let discriminator = desc.discriminator.unwrap();
        assert_eq!(discriminator.property, "kind");
        assert_eq!(discriminator.mapping.get("kitty").map(String::as_str), Some("Cat"));
        assert_eq!(discriminator.mapping.get("Dog").map(String::as_str), Some("Dog"));
    }

    #[test]
    fn test_mapping_targeting_inline_element_is_ambiguous() {
        let err = resolve_error(json!({
            "oneOf": [
                { "type": "object", "properties": { "bark": { "type": "boolean" } } },
                { "$ref": "#/components/schemas/Cat" }
            ],
            "discriminator": {
                "propertyName": "kind",
                "mapping": { "dog": "#/components/schemas/Pet0" }
            }
        }));
        assert!(matches!(err.root_cause(), TypeModelError::AmbiguousDiscriminator(name) if name == "Pet0"));
    }

    #[test]
    fn test_unmapped_inline_elements_are_incomplete() {
        let err = resolve_error(json!({
            "oneOf": [
                { "type": "object", "properties": { "bark": { "type": "boolean" } } },
                { "type": "object", "properties": { "meow": { "type": "boolean" } } }
            ],
            "discriminator": {
                "propertyName": "kind",
                "mapping": { "dog": "#/components/schemas/Dog" }
            }
        }));
        assert!(matches!(
            err.root_cause(),
            TypeModelError::DiscriminatorIncomplete { mapped: 1, elements: 2, .. }
        ));
    }
}
