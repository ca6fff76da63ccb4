//! Target Type Expressions
//!
//! Language-agnostic description of what a schema becomes. Emitters lower
//! these into concrete syntax; nothing here knows about a target language.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Scalar target types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    /// Default signed width
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Default unsigned width
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Bool,
    String,
    /// Raw byte sequence (`format: byte`)
    Bytes,
    Email,
    Date,
    DateTime,
    Uuid,
    /// Binary payload (`format: binary`)
    File,
    /// Uninterpreted JSON payload; already models absence
    RawJson,
}

impl Scalar {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Email => "email",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Uuid => "uuid",
            Self::File => "file",
            Self::RawJson => "json",
        }
    }

    /// Wrapper types an emitter takes from its runtime type library
    pub fn is_well_known(&self) -> bool {
        matches!(self, Self::Email | Self::Date | Self::Uuid | Self::File)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a schema resolves to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// Untyped value
    #[default]
    Any,
    Scalar(Scalar),
    /// A type known by name: a reference, an override or a registered definition
    Named(String),
    Sequence(Box<TypeExpr>),
    /// String-keyed map
    Map(Box<TypeExpr>),
    /// Inline structure, named by whatever definition holds it
    Struct(StructBody),
    /// May be absent
    Optional(Box<TypeExpr>),
    /// Explicit nullable wrapper
    Nullable(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn sequence(item: TypeExpr) -> Self {
        Self::Sequence(Box::new(item))
    }

    pub fn map(value: TypeExpr) -> Self {
        Self::Map(Box::new(value))
    }

    pub fn optional(inner: TypeExpr) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn nullable(inner: TypeExpr) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Generic map of untyped values
    pub fn any_map() -> Self {
        Self::map(Self::Any)
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Scalar(scalar) => write!(f, "{}", scalar),
            Self::Named(name) => f.write_str(name),
            Self::Sequence(item) => write!(f, "list<{}>", item),
            Self::Map(value) => write!(f, "map<string, {}>", value),
            Self::Struct(body) => write!(f, "{}", body),
            Self::Optional(inner) => write!(f, "optional<{}>", inner),
            Self::Nullable(inner) => write!(f, "nullable<{}>", inner),
        }
    }
}

/// Fields of an inline structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructBody {
    pub fields: Vec<StructField>,
    /// Element type of the catch-all map for undeclared properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<TypeExpr>>,
    /// Raw storage for the active union member
    pub union_storage: bool,
}

impl fmt::Display for StructBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct {")?;
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            let s = if first { " " } else { ", " };
            first = false;
            f.write_str(s)
        };
        for field in &self.fields {
            sep(f)?;
            write!(f, "{}: {}", field.name, field.type_expr)?;
        }
        if let Some(additional) = &self.additional_properties {
            sep(f)?;
            write!(f, "AdditionalProperties: map<string, {}>", additional)?;
        }
        if self.union_storage {
            sep(f)?;
            f.write_str("union: json")?;
        }
        f.write_str(" }")
    }
}

/// One laid-out field of a structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructField {
    /// Identifier in generated code
    pub name: String,
    /// Name on the wire
    pub json_name: String,
    pub type_expr: TypeExpr,
    /// Serialization tags, e.g. `json` -> `id,omitempty`
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}
