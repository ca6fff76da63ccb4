//! Primitive translation
//!
//! Maps a declared type and format to a scalar or sequence target.

use super::{child_path, registrar, SchemaResolver};
use crate::config::StructuralKind;
use crate::error::{Result, ResultExt, TypeModelError};
use crate::model::{Scalar, TypeDescriptor, TypeExpr};
use crate::schema::SchemaNode;

/// Translate a non-object node into `out`
pub fn translate<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    path: &[String],
    out: &mut TypeDescriptor<'a>,
) -> Result<()> {
    let Some(declared) = node.declared_type() else {
        return Err(TypeModelError::UnsupportedType("<none>".to_string()));
    };
    let format = node.format.as_str();

    if declared.is("array") {
        return translate_array(resolver, node, path, out);
    }

    let scalar = if declared.is("integer") {
        integer(format)
    } else if declared.is("number") {
        number(format)?
    } else if declared.is("boolean") {
        if !format.is_empty() {
            return Err(TypeModelError::InvalidFormat {
                kind: "boolean",
                format: format.to_string(),
            });
        }
        Scalar::Bool
    } else if declared.is("string") {
        let scalar = string(format);
        if scalar == Scalar::RawJson {
            out.skip_optional_pointer = true;
        }
        scalar
    } else {
        return Err(TypeModelError::UnsupportedType(declared.to_string()));
    };

    out.target = TypeExpr::Scalar(scalar);
    out.define_via_alias = true;
    Ok(())
}

fn translate_array<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    path: &[String],
    out: &mut TypeDescriptor<'a>,
) -> Result<()> {
    // Items resolve at the array's own path; only a registered name gets the
    // extra `Item` segment.
    let mut item = resolver
        .resolve_path(node.items.as_deref(), path)
        .context_with(|| "array items")?;

    if item.needs_name() && !item.is_ref() {
        registrar::register_under_path(&mut item, &child_path(path, "Item"));
    }

    out.additional_types.append(&mut item.additional_types);
    out.target = TypeExpr::sequence(item.type_decl());
    out.array_type = Some(Box::new(item));
    out.define_via_alias = !resolver.config().disables_alias_for(StructuralKind::Array);
    Ok(())
}

fn integer(format: &str) -> Scalar {
    match format {
        "int64" => Scalar::Int64,
        "int32" => Scalar::Int32,
        "int16" => Scalar::Int16,
        "int8" => Scalar::Int8,
        "uint64" => Scalar::Uint64,
        "uint32" => Scalar::Uint32,
        "uint16" => Scalar::Uint16,
        "uint8" => Scalar::Uint8,
        "uint" => Scalar::Uint,
        _ => Scalar::Int,
    }
}

fn number(format: &str) -> Result<Scalar> {
    match format {
        "double" => Ok(Scalar::Float64),
        "float" | "" => Ok(Scalar::Float32),
        other => Err(TypeModelError::InvalidFormat {
            kind: "number",
            format: other.to_string(),
        }),
    }
}

fn string(format: &str) -> Scalar {
    match format {
        "byte" => Scalar::Bytes,
        "email" => Scalar::Email,
        "date" => Scalar::Date,
        "date-time" => Scalar::DateTime,
        "json" => Scalar::RawJson,
        "uuid" => Scalar::Uuid,
        "binary" => Scalar::File,
        // Unrecognized formats are plain strings
        _ => Scalar::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::schema::SchemaRef;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> SchemaRef {
        serde_json::from_value(value).unwrap()
    }

    fn resolve_target(config: &ResolverConfig, value: serde_json::Value) -> Result<TypeExpr> {
        let sref = schema(value);
        let resolver = SchemaResolver::new(config);
        resolver.resolve(Some(&sref), &["Value"]).map(|d| d.target)
    }

    #[test]
    fn test_integer_formats() {
        assert_eq!(integer("int64"), Scalar::Int64);
        assert_eq!(integer("uint8"), Scalar::Uint8);
        assert_eq!(integer("int"), Scalar::Int);
        assert_eq!(integer("whatever"), Scalar::Int);
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(number("double").unwrap(), Scalar::Float64);
        assert_eq!(number("").unwrap(), Scalar::Float32);
        let err = number("decimal").unwrap_err();
        assert!(matches!(err, TypeModelError::InvalidFormat { kind: "number", .. }));
    }

    #[test]
    fn test_string_formats() {
        let config = ResolverConfig::default();
        assert_eq!(
            resolve_target(&config, json!({ "type": "string", "format": "uuid" })).unwrap(),
            TypeExpr::Scalar(Scalar::Uuid)
        );
        assert_eq!(
            resolve_target(&config, json!({ "type": "string", "format": "hostname" })).unwrap(),
            TypeExpr::Scalar(Scalar::String)
        );
    }

    #[test]
    fn test_json_format_skips_optional_pointer() {
        let config = ResolverConfig::default();
        let sref = schema(json!({ "type": "string", "format": "json" }));
        let desc = SchemaResolver::new(&config)
            .resolve(Some(&sref), &["Payload"])
            .unwrap();
        assert_eq!(desc.target, TypeExpr::Scalar(Scalar::RawJson));
        assert!(desc.skip_optional_pointer);
        assert!(desc.define_via_alias);
    }

    #[test]
    fn test_boolean_with_format_is_rejected() {
        let config = ResolverConfig::default();
        let err = resolve_target(&config, json!({ "type": "boolean", "format": "bogus" })).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            TypeModelError::InvalidFormat { kind: "boolean", format } if format == "bogus"
        ));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let config = ResolverConfig::default();
        let err = resolve_target(&config, json!({ "type": "decimal" })).unwrap_err();
        assert!(matches!(err.root_cause(), TypeModelError::UnsupportedType(t) if t == "decimal"));
    }

    #[test]
    fn test_array_without_items_is_list_of_any() {
        let config = ResolverConfig::default();
        assert_eq!(
            resolve_target(&config, json!({ "type": "array" })).unwrap(),
            TypeExpr::sequence(TypeExpr::Any)
        );
    }

    #[test]
    fn test_array_alias_can_be_disabled() {
        let mut config = ResolverConfig::default();
        config.output.disable_type_aliases_for_type = vec![StructuralKind::Array];

        let sref = schema(json!({ "type": "array", "items": { "type": "integer", "format": "int32" } }));
        let desc = SchemaResolver::new(&config).resolve(Some(&sref), &["Ids"]).unwrap();
        assert!(!desc.define_via_alias);
        assert_eq!(desc.target, TypeExpr::sequence(TypeExpr::Scalar(Scalar::Int32)));
    }
}
