//! Schema Resolution
//!
//! Turns schema nodes into [`TypeDescriptor`]s. [`SchemaResolver`] owns the
//! dispatch order; the composers in the submodules handle one shape each and
//! recurse back into the resolver for nested nodes:
//! - `object`: properties, catch-all maps, map flattening, union embedding
//! - `union`: `oneOf` / `anyOf` alternatives and discriminators
//! - `enums`: enum tables
//! - `primitive`: scalars and sequences
//! - `merge`: `allOf`
//!
//! Every auxiliary definition found while resolving a node ends up in the
//! returned descriptor's `additional_types`, so one call yields the root
//! descriptor together with everything it needs named.

pub mod enums;
pub mod fields;
pub mod merge;
pub mod object;
pub mod primitive;
pub mod registrar;
pub mod union;

use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::error::{Result, ResultExt, TypeModelError};
use crate::model::{Scalar, TypeDefinition, TypeDescriptor, TypeExpr};
use crate::names::{path_to_json_name, ref_path_to_type_name, schema_name_to_type_name};
use crate::schema::extensions::{SKIP_OPTIONAL_POINTER, TYPE_OVERRIDE};
use crate::schema::{Components, Parameter, SchemaNode, SchemaRef};

/// Resolves schema nodes against a borrowed configuration.
///
/// The resolver holds no mutable state; one instance can serve any number of
/// calls, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
    config: &'a ResolverConfig,
    components: Option<&'a Components>,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self {
            config,
            components: None,
        }
    }

    /// Component table used to dereference `allOf` members and referenced
    /// property schemas
    pub fn with_components(mut self, components: &'a Components) -> Self {
        self.components = Some(components);
        self
    }

    pub fn config(&self) -> &'a ResolverConfig {
        self.config
    }

    /// Resolve the schema at `path`.
    ///
    /// `None` stands for a missing schema (e.g. an array without `items`)
    /// and resolves to an untyped alias.
    pub fn resolve<S: AsRef<str>>(
        &self,
        schema: Option<&'a SchemaRef>,
        path: &[S],
    ) -> Result<TypeDescriptor<'a>> {
        let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
        self.resolve_path(schema, &path)
    }

    pub(crate) fn resolve_path(
        &self,
        schema: Option<&'a SchemaRef>,
        path: &[String],
    ) -> Result<TypeDescriptor<'a>> {
        let Some(schema) = schema else {
            return Ok(TypeDescriptor::alias(TypeExpr::Any));
        };

        // References stay opaque; the target is never inlined, so cycles
        // through references terminate here.
        if let Some(reference) = schema.reference().filter(|_| schema.is_type_reference()) {
            let type_name = ref_path_to_type_name(reference, &self.config.import_mapping)
                .context_with(|| {
                    format!("error turning reference ({}) into a type name", reference)
                })?;
            debug!(reference = %reference, type_name = %type_name, "aliased reference");

            let mut desc = TypeDescriptor::reference(type_name);
            desc.description = schema.node.description.clone();
            desc.source = Some(&schema.node);
            return Ok(desc);
        }

        self.resolve_node(&schema.node, path)
    }

    fn resolve_node(&self, node: &'a SchemaNode, path: &[String]) -> Result<TypeDescriptor<'a>> {
        trace!(path = %path_to_json_name(path), "resolving schema");

        if let Some(all_of) = &node.all_of {
            return merge::merge(self, node, all_of, path).context_with(|| "merging allOf");
        }

        let mut out = TypeDescriptor {
            description: node.description.clone(),
            source: Some(node),
            ..Default::default()
        };

        if let Some(type_name) = TYPE_OVERRIDE.get(&node.extensions)? {
            out.target = TypeExpr::named(type_name);
            out.define_via_alias = true;
            return Ok(out);
        }

        if let Some(skip) = SKIP_OPTIONAL_POINTER.get(&node.extensions)? {
            out.skip_optional_pointer = skip;
        }

        match node.declared_type() {
            None => object::compose(self, node, path, out, true),
            Some(declared) if declared.is("object") => object::compose(self, node, path, out, true),
            Some(_) if !node.enum_values.is_empty() => {
                enums::compose(self, node, path, &mut out)?;
                Ok(out)
            }
            Some(_) => {
                primitive::translate(self, node, path, &mut out)?;
                Ok(out)
            }
        }
    }

    /// Resolve an operation parameter at `path`.
    ///
    /// A `schema` resolves like any other node. Otherwise a single
    /// `application/json` content entry supplies the schema; any other
    /// content leaves the parameter as a plain string carrying its
    /// description.
    pub fn resolve_parameter<S: AsRef<str>>(
        &self,
        param: &'a Parameter,
        path: &[S],
    ) -> Result<TypeDescriptor<'a>> {
        let path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();

        if let Some(schema) = &param.schema {
            return self.resolve_path(Some(schema), &path);
        }
        let Some(content) = &param.content else {
            return Err(TypeModelError::ParameterWithoutSchema(param.name.clone()));
        };

        match content.get("application/json") {
            Some(media) if content.len() == 1 => self.resolve_path(media.schema.as_ref(), &path),
            _ => {
                debug!(parameter = %param.name, "parameter content kept as string");
                let mut desc = TypeDescriptor::alias(TypeExpr::Scalar(Scalar::String));
                desc.description = param.description.clone();
                Ok(desc)
            }
        }
    }

    /// Look up a local component reference
    pub(crate) fn lookup(&self, reference: &str) -> Result<&'a SchemaRef> {
        if !reference.starts_with("#/components/schemas/") {
            return Err(TypeModelError::UnresolvableRef {
                reference: reference.to_string(),
                reason: "only local component references can be merged".to_string(),
            });
        }
        let components = self.components.ok_or_else(|| TypeModelError::UnresolvableRef {
            reference: reference.to_string(),
            reason: "no component table to resolve against".to_string(),
        })?;
        components
            .lookup(reference)
            .ok_or_else(|| TypeModelError::UnresolvableRef {
                reference: reference.to_string(),
                reason: "not found in components".to_string(),
            })
    }

    /// Node that carries a property's flags: the referenced component when it
    /// can be found, the property's own body otherwise
    pub(crate) fn property_node(&self, property: &'a SchemaRef) -> &'a SchemaNode {
        property
            .reference()
            .and_then(|reference| self.components?.lookup(reference))
            .map(|target| &target.node)
            .unwrap_or(&property.node)
    }
}

/// `path` extended by one segment
pub(crate) fn child_path(path: &[String], segment: impl Into<String>) -> Vec<String> {
    let mut child = Vec::with_capacity(path.len() + 1);
    child.extend_from_slice(path);
    child.push(segment.into());
    child
}

/// Resolve every component schema, in name order.
///
/// Each component yields its own definition followed by the auxiliary
/// definitions discovered while resolving it.
pub fn generate_types<'a>(
    components: &'a Components,
    config: &'a ResolverConfig,
) -> Result<Vec<TypeDefinition<'a>>> {
    let resolver = SchemaResolver::new(config).with_components(components);
    let mut types = Vec::new();

    for (name, schema) in &components.schemas {
        let mut desc = resolver
            .resolve(Some(schema), &[name.as_str()])
            .context_with(|| format!("error converting schema {} to a type", name))?;
        let additional_types = std::mem::take(&mut desc.additional_types);

        types.push(TypeDefinition {
            type_name: schema_name_to_type_name(name),
            json_name: name.clone(),
            schema: desc,
        });
        types.extend(additional_types);
    }

    debug!(count = types.len(), "generated type definitions");
    Ok(types)
}
