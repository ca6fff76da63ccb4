//! Field layout
//!
//! Lays out the properties of an object as struct fields: generated name,
//! declared type (optional or nullable wrapping), serialization tags and
//! deprecation notes. Field-level extensions are read here.

use std::collections::BTreeMap;

use crate::config::ResolverConfig;
use crate::error::{Result, ResultExt};
use crate::model::{Property, StructBody, StructField, TypeDescriptor, TypeExpr};
use crate::names::schema_name_to_type_name;
use crate::schema::extensions::{
    DEPRECATION_REASON, EXTRA_TAGS, FIELD_NAME, JSON_IGNORE, OMIT_EMPTY, ONLY_HONOUR_FIELD_NAME,
    SKIP_OPTIONAL_POINTER,
};

/// Identifier for a property's field
pub fn field_name(property: &Property<'_>, config: &ResolverConfig) -> Result<String> {
    let name = FIELD_NAME
        .get(&property.extensions)?
        .unwrap_or_else(|| property.json_name.clone());

    if config.compatibility.allow_unexported_struct_field_names
        && ONLY_HONOUR_FIELD_NAME.get(&property.extensions)? == Some(true)
    {
        return Ok(name);
    }
    Ok(schema_name_to_type_name(&name))
}

/// Declared type of a property's field
pub fn field_type(property: &Property<'_>, config: &ResolverConfig) -> Result<TypeExpr> {
    let decl = property.schema.type_decl();
    if config.output.nullable_type && property.nullable {
        return Ok(TypeExpr::nullable(decl));
    }

    let skip_optional_pointer = SKIP_OPTIONAL_POINTER
        .get(&property.extensions)?
        .unwrap_or(property.schema.skip_optional_pointer);
    let read_only_pointer = property.read_only
        && (!property.required || !config.compatibility.disable_required_read_only_as_pointer);

    if !skip_optional_pointer
        && (!property.required || property.nullable || read_only_pointer || property.write_only)
    {
        Ok(TypeExpr::optional(decl))
    } else {
        Ok(decl)
    }
}

/// Whether the field is left out of serialized output when empty
pub fn omit_empty(property: &Property<'_>, config: &ResolverConfig) -> Result<bool> {
    let required = property.required;
    let should_omit = (!required || property.read_only || property.write_only)
        && (!required
            || !property.read_only
            || !config.compatibility.disable_required_read_only_as_pointer);

    let omit = if property.nullable && !config.output.nullable_type {
        false
    } else {
        should_omit
    };

    Ok(OMIT_EMPTY.get(&property.extensions)?.unwrap_or(omit))
}

/// Serialization tags, keyed by tag name
pub fn field_tags(
    property: &Property<'_>,
    config: &ResolverConfig,
) -> Result<BTreeMap<String, String>> {
    let mut tags = BTreeMap::new();

    let json = if omit_empty(property, config)? {
        format!("{},omitempty", property.json_name)
    } else {
        property.json_name.clone()
    };
    tags.insert("json".to_string(), json);

    if JSON_IGNORE.get(&property.extensions)? == Some(true) {
        tags.insert("json".to_string(), "-".to_string());
    }

    if let Some(extra) = EXTRA_TAGS.get(&property.extensions)? {
        tags.extend(extra);
    }
    Ok(tags)
}

pub fn layout_field(property: &Property<'_>, config: &ResolverConfig) -> Result<StructField> {
    let deprecation_reason = if property.deprecated {
        DEPRECATION_REASON.get(&property.extensions)?
    } else {
        None
    };

    Ok(StructField {
        name: field_name(property, config)?,
        json_name: property.json_name.clone(),
        type_expr: field_type(property, config)?,
        tags: field_tags(property, config)?,
        description: property.description.clone(),
        deprecated: property.deprecated,
        deprecation_reason,
    })
}

/// Element type of a catch-all map. Values whose schema is nullable are
/// optional.
pub fn additional_properties_type(desc: &TypeDescriptor<'_>) -> TypeExpr {
    match &desc.additional_properties_type {
        None => TypeExpr::Any,
        Some(additional) => {
            let decl = additional.type_decl();
            if additional.source.is_some_and(|node| node.is_nullable()) {
                TypeExpr::optional(decl)
            } else {
                decl
            }
        }
    }
}

/// Struct body for an object descriptor
pub fn struct_body(desc: &TypeDescriptor<'_>, config: &ResolverConfig) -> Result<StructBody> {
    let fields = desc
        .properties
        .iter()
        .map(|p| layout_field(p, config).context_with(|| format!("field '{}'", p.json_name)))
        .collect::<Result<Vec<_>>>()?;

    let additional_properties = desc
        .has_additional_properties
        .then(|| Box::new(additional_properties_type(desc)));

    Ok(StructBody {
        fields,
        additional_properties,
        union_storage: !desc.union_elements.is_empty(),
    })
}
