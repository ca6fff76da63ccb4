//! Input Schema Model
//!
//! The subset of an OpenAPI 3 schema object that resolution consumes,
//! deserialized with serde from JSON or YAML. Nodes are borrowed by the
//! resolver and never modified.

pub mod extensions;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

/// Raw `x-*` extensions, plus any keyword this model does not interpret
pub type Extensions = BTreeMap<String, Value>;

/// Declared `type`: a single name or a list of names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Many(Vec<String>),
}

impl TypeSet {
    /// Declared names, with `"null"` removed
    pub fn names(&self) -> Vec<&str> {
        match self {
            TypeSet::Single(name) => vec![name.as_str()],
            TypeSet::Many(names) => names.iter().map(String::as_str).collect(),
        }
        .into_iter()
        .filter(|name| *name != "null")
        .collect()
    }

    /// True when the set names exactly `kind` (ignoring a `"null"` companion)
    pub fn is(&self, kind: &str) -> bool {
        matches!(self.names().as_slice(), [only] if *only == kind)
    }

    pub fn contains_null(&self) -> bool {
        match self {
            TypeSet::Single(name) => name == "null",
            TypeSet::Many(names) => names.iter().any(|n| n == "null"),
        }
    }
}

impl std::fmt::Display for TypeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSet::Single(name) => write!(f, "{}", name),
            TypeSet::Many(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

/// `additionalProperties`: either a flag or a schema for the values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaRef>),
}

/// Discriminator as written in the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorSpec {
    pub property_name: String,
    /// Discriminator value -> `$ref` of the alternative
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
}

/// A schema position: either a `$ref` or an inline schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(flatten)]
    pub node: SchemaNode,
}

impl SchemaRef {
    pub fn inline(node: SchemaNode) -> Self {
        Self { reference: None, node }
    }

    pub fn to(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            node: SchemaNode::default(),
        }
    }

    /// The `$ref` string, if non-empty
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    /// A reference that names a type (`doc#pointer`), as opposed to a
    /// whole-document reference without a fragment.
    pub fn is_type_reference(&self) -> bool {
        self.reference().is_some_and(|r| r.contains('#'))
    }
}

/// Inline schema body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<DiscriminatorSpec>,

    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,
    #[serde(default)]
    pub deprecated: bool,

    #[serde(flatten)]
    pub extensions: Extensions,
}

impl SchemaNode {
    /// Declared type set, treating an empty list as undeclared
    pub fn declared_type(&self) -> Option<&TypeSet> {
        self.schema_type.as_ref().filter(|t| !t.names().is_empty())
    }

    pub fn is_type(&self, kind: &str) -> bool {
        self.declared_type().is_some_and(|t| t.is(kind))
    }

    /// `nullable: true`, or `"null"` listed among the declared types
    pub fn is_nullable(&self) -> bool {
        self.nullable
            || self
                .schema_type
                .as_ref()
                .is_some_and(TypeSet::contains_null)
    }

    /// Whether values beyond the declared properties are allowed
    pub fn has_additional_properties(&self) -> bool {
        matches!(
            self.additional_properties,
            Some(AdditionalProperties::Bool(true)) | Some(AdditionalProperties::Schema(_))
        )
    }

    pub fn additional_properties_schema(&self) -> Option<&SchemaRef> {
        match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(schema),
            _ => None,
        }
    }

    pub fn has_union(&self) -> bool {
        self.any_of.is_some() || self.one_of.is_some()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// One media type entry of a parameter's `content`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
}

/// Operation parameter, described by `schema` or by `content`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in", default)]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,

    /// Media type -> schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

/// `components` section of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaRef>,
}

impl Components {
    /// Look up a local `#/components/schemas/<Name>` reference
    pub fn lookup(&self, reference: &str) -> Option<&SchemaRef> {
        let name = reference.strip_prefix("#/components/schemas/")?;
        self.schemas.get(name)
    }
}

/// The parts of an OpenAPI document this crate reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub components: Components,
}

impl Document {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a document, choosing YAML or JSON by file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_reference() {
        let sref: SchemaRef =
            serde_json::from_value(json!({ "$ref": "#/components/schemas/Pet" })).unwrap();
        assert!(sref.is_type_reference());
        assert_eq!(sref.reference(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn test_whole_document_reference_is_not_a_type_reference() {
        let sref = SchemaRef::to("common.yaml");
        assert!(!sref.is_type_reference());
    }

    #[test]
    fn test_deserialize_object_with_extensions() {
        let sref: SchemaRef = serde_json::from_value(json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "integer", "format": "int64" },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "additionalProperties": false,
            "x-type-name": "PetRecord"
        }))
        .unwrap();

        let node = &sref.node;
        assert!(node.is_type("object"));
        assert!(node.is_required("id"));
        assert!(!node.has_additional_properties());
        assert_eq!(node.properties.len(), 2);
        assert_eq!(node.extensions.get("x-type-name"), Some(&json!("PetRecord")));
    }

    #[test]
    fn test_type_list_with_null() {
        let node: SchemaNode = serde_json::from_value(json!({ "type": ["string", "null"] })).unwrap();
        assert!(node.is_type("string"));
        assert!(node.is_nullable());
    }

    #[test]
    fn test_additional_properties_schema() {
        let node: SchemaNode = serde_json::from_value(json!({
            "additionalProperties": { "type": "string" }
        }))
        .unwrap();
        assert!(node.has_additional_properties());
        assert!(node.additional_properties_schema().is_some());
    }

    #[test]
    fn test_components_lookup() {
        let doc = Document::from_yaml_str(
            "components:\n  schemas:\n    Pet:\n      type: object\n",
        )
        .unwrap();
        assert!(doc.components.lookup("#/components/schemas/Pet").is_some());
        assert!(doc.components.lookup("#/components/schemas/Owner").is_none());
        assert!(doc.components.lookup("other.yaml#/components/schemas/Pet").is_none());
    }
}
