//! Resolution results
//!
//! A [`TypeDescriptor`] is what one schema node resolves to. Descriptors borrow
//! the node they came from, so a resolved tree lives no longer than the
//! document it was resolved from.

use serde::Serialize;
use std::collections::BTreeMap;

use super::types::TypeExpr;
use crate::config::ResolverConfig;
use crate::error::{Result, TypeModelError};
use crate::schema::{Extensions, SchemaNode};

// =============================================================================
// Type Descriptor
// =============================================================================

/// The resolved form of one schema node
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeDescriptor<'a> {
    /// Target type expression
    pub target: TypeExpr,

    /// Set when this descriptor only points at a type named elsewhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,

    /// Element descriptor for sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_type: Option<Box<TypeDescriptor<'a>>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValue>,

    /// Declared properties in layout order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property<'a>>,

    pub has_additional_properties: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties_type: Option<Box<TypeDescriptor<'a>>>,

    /// Named definitions discovered while resolving this node
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_types: Vec<TypeDefinition<'a>>,

    /// Optional fields of this type are emitted without a pointer
    pub skip_optional_pointer: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Type names of the union alternatives, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub union_elements: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    /// Emitted as an alias of its target rather than a distinct type
    pub define_via_alias: bool,

    /// Node this descriptor was resolved from
    #[serde(skip)]
    pub source: Option<&'a SchemaNode>,
}

impl<'a> TypeDescriptor<'a> {
    /// Alias-defined descriptor for a target expression
    pub fn alias(target: TypeExpr) -> Self {
        Self {
            target,
            define_via_alias: true,
            ..Default::default()
        }
    }

    /// Alias to a type known by name
    pub fn reference(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            target: TypeExpr::named(type_name.clone()),
            ref_type: Some(type_name),
            define_via_alias: true,
            ..Default::default()
        }
    }

    pub fn is_ref(&self) -> bool {
        self.ref_type.is_some()
    }

    /// Reference into another package (`pkg.Type`)
    pub fn is_external_ref(&self) -> bool {
        self.ref_type.as_deref().is_some_and(|r| r.contains('.'))
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// What a field or element of this type is declared as
    pub fn type_decl(&self) -> TypeExpr {
        match &self.ref_type {
            Some(name) => TypeExpr::named(name.clone()),
            None => self.target.clone(),
        }
    }

    /// Types that carry methods (catch-all maps, union accessors) cannot stay
    /// anonymous and must be registered under a name
    pub fn needs_name(&self) -> bool {
        self.has_additional_properties || !self.union_elements.is_empty()
    }

    /// Add a property, merging with an existing one of the same JSON name.
    ///
    /// An equal duplicate is dropped; a different one is a conflict.
    pub fn add_property(&mut self, property: Property<'a>) -> Result<()> {
        match self
            .properties
            .iter()
            .find(|existing| existing.json_name == property.json_name)
        {
            Some(existing) if *existing == property => Ok(()),
            Some(_) => Err(TypeModelError::PropertyConflict(property.json_name)),
            None => {
                self.properties.push(property);
                Ok(())
            }
        }
    }
}

// =============================================================================
// Property
// =============================================================================

/// One declared property of an object
#[derive(Debug, Clone, Default, Serialize)]
pub struct Property<'a> {
    pub json_name: String,
    pub schema: TypeDescriptor<'a>,
    pub required: bool,
    pub nullable: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: Extensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PartialEq for Property<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.json_name == other.json_name
            && self.schema.type_decl() == other.schema.type_decl()
            && self.required == other.required
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// A named type produced by resolution
#[derive(Debug, Clone, Serialize)]
pub struct TypeDefinition<'a> {
    pub type_name: String,
    /// Dotted document path (or component name) this type came from
    pub json_name: String,
    pub schema: TypeDescriptor<'a>,
}

impl TypeDefinition<'_> {
    pub fn is_alias(&self, config: &ResolverConfig) -> bool {
        !config.compatibility.old_aliasing && self.schema.define_via_alias
    }
}

/// Discriminator property and its value -> type name mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discriminator {
    pub property: String,
    pub mapping: BTreeMap<String, String>,
}

/// One enum member: identifier fragment and raw value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub identifier: String,
    pub value: String,
}

impl EnumValue {
    pub fn new(identifier: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            value: value.into(),
        }
    }
}
