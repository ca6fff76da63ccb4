//! Object composition
//!
//! Resolves object-shaped nodes (declared `object` or no type at all):
//! generic maps, string-keyed maps of an additional-properties type, and
//! structs with declared properties, catch-all maps and union storage.

use tracing::debug;

use super::{child_path, fields, registrar, union, SchemaResolver};
use crate::error::{Result, ResultExt};
use crate::model::{Property, TypeDefinition, TypeDescriptor, TypeExpr};
use crate::names::path_to_json_name;
use crate::schema::extensions::TYPE_NAME;
use crate::schema::SchemaNode;

/// Compose an object node into `out`, honouring `x-type-name`.
///
/// `flatten` allows an object that only carries additional properties to
/// collapse into a plain map.
pub fn compose<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    path: &[String],
    out: TypeDescriptor<'a>,
    flatten: bool,
) -> Result<TypeDescriptor<'a>> {
    let mut out = compose_shape(resolver, node, path, out, flatten)?;

    // x-type-name: name the shape built above and refer to it by that name
    if let Some(type_name) = TYPE_NAME.get(&node.extensions)? {
        let description = out.description.clone();
        let mut additional_types = std::mem::take(&mut out.additional_types);
        additional_types.push(TypeDefinition {
            type_name: type_name.clone(),
            json_name: path_to_json_name(path),
            schema: out,
        });
        debug!(type_name = %type_name, "named object via x-type-name");

        out = TypeDescriptor::reference(type_name);
        out.description = description;
        out.additional_types = additional_types;
        out.source = Some(node);
    }

    Ok(out)
}

/// Compose an object node without applying `x-type-name`.
///
/// Merge parts use this with `flatten = false`: their properties and
/// catch-all schema must survive until the parts are combined.
pub fn compose_shape<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    path: &[String],
    mut out: TypeDescriptor<'a>,
    flatten: bool,
) -> Result<TypeDescriptor<'a>> {
    let config = resolver.config();

    if node.properties.is_empty() && !node.has_additional_properties() && !node.has_union() {
        out.target = if node.is_type("object") {
            TypeExpr::any_map()
        } else {
            TypeExpr::Any
        };
        out.define_via_alias = true;
    } else {
        out.define_via_alias = false;
        out.has_additional_properties = node.has_additional_properties();
        out.additional_properties_type = Some(Box::new(TypeDescriptor::default()));

        if let Some(additional) = node.additional_properties_schema() {
            let mut additional_desc = resolver
                .resolve_path(Some(additional), path)
                .context_with(|| "additional properties")?;
            if additional_desc.needs_name() {
                registrar::register_under_path(
                    &mut additional_desc,
                    &child_path(path, "AdditionalProperties"),
                );
            }
            out.additional_types.append(&mut additional_desc.additional_types);
            out.additional_properties_type = Some(Box::new(additional_desc));
        }

        let flatten = flatten && !config.compatibility.disable_flatten_additional_properties;
        if flatten && node.properties.is_empty() && !node.has_union() {
            // Plain map; no catch-all field or custom (un)marshalling needed
            out.has_additional_properties = false;
            out.target = TypeExpr::map(fields::additional_properties_type(&out));
            out.define_via_alias = true;
            debug!(path = %path_to_json_name(path), map = %out.target, "flattened object into map");
        } else {
            compose_properties(resolver, node, path, &mut out)?;

            if let Some(any_of) = &node.any_of {
                union::compose(resolver, &mut out, any_of, node.discriminator.as_ref(), path)
                    .context_with(|| "anyOf")?;
            }
            if let Some(one_of) = &node.one_of {
                union::compose(resolver, &mut out, one_of, node.discriminator.as_ref(), path)
                    .context_with(|| "oneOf")?;
            }

            out.target = TypeExpr::Struct(fields::struct_body(&out, config)?);
        }
    }

    Ok(out)
}

fn compose_properties<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    path: &[String],
    out: &mut TypeDescriptor<'a>,
) -> Result<()> {
    // BTreeMap iteration gives lexicographic property order
    for (name, property_ref) in &node.properties {
        let property_path = child_path(path, name.clone());
        let mut schema = resolver
            .resolve_path(Some(property_ref), &property_path)
            .context_with(|| format!("property '{}'", name))?;

        if schema.needs_name() && !schema.is_ref() {
            registrar::register_under_path(&mut schema, &property_path);
        }
        let mut nested = std::mem::take(&mut schema.additional_types);

        let property_node = resolver.property_node(property_ref);
        out.properties.push(Property {
            json_name: name.clone(),
            schema,
            required: node.is_required(name),
            nullable: property_node.is_nullable(),
            read_only: property_node.read_only,
            write_only: property_node.write_only,
            deprecated: property_node.deprecated,
            extensions: property_node.extensions.clone(),
            description: property_node.description.clone(),
        });
        out.additional_types.append(&mut nested);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::model::Scalar;
    use crate::schema::SchemaRef;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> SchemaRef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_object_is_generic_map() {
        let config = ResolverConfig::default();
        let sref = schema(json!({ "type": "object" }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Blob"]).unwrap();
        assert_eq!(desc.target, TypeExpr::any_map());
        assert!(desc.define_via_alias);

        let untyped = schema(json!({ "description": "anything" }));
        let desc = SchemaResolver::new(&config).resolve(Some(&untyped), &["Blob"]).unwrap();
        assert_eq!(desc.target, TypeExpr::Any);
        assert_eq!(desc.description.as_deref(), Some("anything"));
    }

    #[test]
    fn test_properties_sorted_and_required() {
        let config = ResolverConfig::default();
        let sref = schema(json!({
            "type": "object",
            "required": ["a"],
            "properties": {
                "b": { "type": "string" },
                "a": { "type": "string" }
            }
        }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Pair"]).unwrap();

        let names: Vec<&str> = desc.properties.iter().map(|p| p.json_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(desc.properties[0].required);
        assert!(!desc.properties[1].required);
        assert!(!desc.define_via_alias);
    }

    #[test]
    fn test_additional_properties_true_flattens_to_map() {
        let config = ResolverConfig::default();
        let sref = schema(json!({ "type": "object", "additionalProperties": true }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Bag"]).unwrap();

        assert_eq!(desc.target, TypeExpr::any_map());
        assert!(!desc.has_additional_properties);
        assert!(desc.define_via_alias);
    }

    #[test]
    fn test_flatten_disabled_keeps_struct() {
        let mut config = ResolverConfig::default();
        config.compatibility.disable_flatten_additional_properties = true;
        let sref = schema(json!({ "type": "object", "additionalProperties": true }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Bag"]).unwrap();

        assert!(desc.has_additional_properties);
        assert!(!desc.define_via_alias);
        match &desc.target {
            TypeExpr::Struct(body) => {
                assert!(body.fields.is_empty());
                assert_eq!(body.additional_properties.as_deref(), Some(&TypeExpr::Any));
            }
            other => panic!("Expected struct, got {}", other),
        }
    }

    #[test]
    fn test_nullable_additional_values_are_optional() {
        let config = ResolverConfig::default();
        let sref = schema(json!({
            "type": "object",
            "additionalProperties": { "type": "integer", "format": "int64", "nullable": true }
        }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Counts"]).unwrap();
        assert_eq!(
            desc.target,
            TypeExpr::map(TypeExpr::optional(TypeExpr::Scalar(Scalar::Int64)))
        );
    }

    #[test]
    fn test_property_with_catch_all_is_registered() {
        let config = ResolverConfig::default();
        let sref = schema(json!({
            "type": "object",
            "properties": {
                "labels": {
                    "type": "object",
                    "properties": { "team": { "type": "string" } },
                    "additionalProperties": { "type": "string" }
                }
            }
        }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Pet"]).unwrap();

        assert_eq!(desc.properties[0].schema.type_decl(), TypeExpr::named("Pet_Labels"));
        assert!(desc.properties[0].schema.additional_types.is_empty());
        let names: Vec<&str> = desc.additional_types.iter().map(|d| d.type_name.as_str()).collect();
        assert_eq!(names, vec!["Pet_Labels"]);
    }

    #[test]
    fn test_nested_additional_properties_type_is_registered() {
        let config = ResolverConfig::default();
        let sref = schema(json!({
            "type": "object",
            "properties": { "id": { "type": "string" } },
            "additionalProperties": {
                "type": "object",
                "properties": { "x": { "type": "string" } },
                "additionalProperties": true
            }
        }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Grid"]).unwrap();

        assert_eq!(desc.additional_types.len(), 1);
        assert_eq!(desc.additional_types[0].type_name, "Grid_AdditionalProperties");
        match &desc.target {
            TypeExpr::Struct(body) => assert_eq!(
                body.additional_properties.as_deref(),
                Some(&TypeExpr::named("Grid_AdditionalProperties"))
            ),
            other => panic!("Expected struct, got {}", other),
        }
    }

    #[test]
    fn test_type_name_wraps_object() {
        let config = ResolverConfig::default();
        let sref = schema(json!({
            "type": "object",
            "description": "Owner record",
            "properties": { "name": { "type": "string" } },
            "x-type-name": "OwnerRecord"
        }));
        let desc = SchemaResolver::new(&config)
            .resolve(Some(&sref), &["Pet", "owner"])
            .unwrap();

        assert_eq!(desc.type_decl(), TypeExpr::named("OwnerRecord"));
        assert!(desc.define_via_alias);
        assert_eq!(desc.description.as_deref(), Some("Owner record"));
        assert_eq!(desc.additional_types.len(), 1);
        assert_eq!(desc.additional_types[0].type_name, "OwnerRecord");
        assert!(desc.additional_types[0].schema.target.is_struct());
    }
}
