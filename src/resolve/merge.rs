//! Schema merging (`allOf`)
//!
//! Every `allOf` member is dereferenced and flattened into a list of object
//! parts, which are resolved at the parent's path and combined into a single
//! struct. Member references are looked up in the resolver's component table.

use std::collections::HashSet;

use tracing::debug;

use super::{fields, object, SchemaResolver};
use crate::error::{Result, ResultExt, TypeModelError};
use crate::model::{TypeDescriptor, TypeExpr};
use crate::names::path_to_json_name;
use crate::schema::{SchemaNode, SchemaRef};

pub fn merge<'a>(
    resolver: &SchemaResolver<'a>,
    node: &'a SchemaNode,
    all_of: &'a [SchemaRef],
    path: &[String],
) -> Result<TypeDescriptor<'a>> {
    // A lone reference is a distinct type over the referenced one
    if let [only] = all_of {
        if only.is_type_reference() {
            let mut desc = resolver.resolve_path(Some(only), path)?;
            desc.define_via_alias = false;
            if node.description.is_some() {
                desc.description = node.description.clone();
            }
            desc.source = Some(node);
            return Ok(desc);
        }
    }

    let mut parts = Vec::new();
    collect_parts(resolver, all_of, &mut Vec::new(), &mut parts)?;
    debug!(path = %path_to_json_name(path), parts = parts.len(), "merging allOf");

    let required: HashSet<&'a str> = parts
        .iter()
        .copied()
        .flat_map(|part| part.required.iter().map(String::as_str))
        .collect();

    let mut out = TypeDescriptor {
        description: node.description.clone(),
        source: Some(node),
        ..Default::default()
    };

    for part in parts {
        if let Some(declared) = part.declared_type() {
            if !declared.is("object") {
                return Err(TypeModelError::UnsupportedShape {
                    path: path_to_json_name(path),
                    reason: format!("allOf member of type {} cannot be merged", declared),
                });
            }
        }

        let part_out = TypeDescriptor {
            source: Some(part),
            ..Default::default()
        };
        let mut resolved = object::compose_shape(resolver, part, path, part_out, false)?;

        for mut property in resolved.properties.drain(..) {
            property.required |= required.contains(property.json_name.as_str());
            out.add_property(property)?;
        }

        if resolved.has_additional_properties {
            if out.has_additional_properties {
                let ours = fields::additional_properties_type(&out);
                let theirs = fields::additional_properties_type(&resolved);
                if ours != theirs {
                    return Err(TypeModelError::UnsupportedShape {
                        path: path_to_json_name(path),
                        reason: format!(
                            "additional properties in allOf have incompatible types ({} and {})",
                            ours, theirs
                        ),
                    });
                }
            } else {
                out.has_additional_properties = true;
                out.additional_properties_type = resolved.additional_properties_type.take();
            }
        }

        out.union_elements.append(&mut resolved.union_elements);
        if out.discriminator.is_none() {
            out.discriminator = resolved.discriminator.take();
        }

        // Parts that share an equal property register the same auxiliary type
        for def in resolved.additional_types.drain(..) {
            let seen = out
                .additional_types
                .iter()
                .any(|d| d.type_name == def.type_name && d.json_name == def.json_name);
            if !seen {
                out.additional_types.push(def);
            }
        }
    }

    out.target = TypeExpr::Struct(fields::struct_body(&out, resolver.config())?);
    Ok(out)
}

/// Flatten `elements` into object parts, following local references and
/// nested `allOf` lists. `stack` holds the references being expanded.
fn collect_parts<'a>(
    resolver: &SchemaResolver<'a>,
    elements: &'a [SchemaRef],
    stack: &mut Vec<&'a str>,
    parts: &mut Vec<&'a SchemaNode>,
) -> Result<()> {
    for element in elements {
        match element.reference().filter(|_| element.is_type_reference()) {
            Some(reference) => {
                if stack.contains(&reference) {
                    return Err(TypeModelError::MergeCycle(reference.to_string()));
                }
                let target = resolver.lookup(reference)?;
                stack.push(reference);
                collect_parts(resolver, std::slice::from_ref(target), stack, parts)
                    .context_with(|| format!("expanding {}", reference))?;
                stack.pop();
            }
            None => {
                let node = &element.node;
                if let Some(nested) = &node.all_of {
                    collect_parts(resolver, nested, stack, parts)?;
                }
                parts.push(node);
            }
        }
    }
    Ok(())
}
