//! Extension Directives
//!
//! Typed accessors for the `x-*` keys that steer resolution. Each directive
//! pairs a key with a conversion function; a value of the wrong JSON shape
//! fails with an [`ExtensionError`] attributed to that key.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use super::Extensions;
use crate::error::{Result, TypeModelError};

/// Shape mismatch while converting an extension value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("failed to convert type: expected {expected}, found {found}")]
    Conversion {
        expected: &'static str,
        found: &'static str,
    },
}

/// A single extension key together with its expected value shape
#[derive(Debug, Clone, Copy)]
pub struct Directive<T> {
    pub key: &'static str,
    parse: fn(&Value) -> std::result::Result<T, ExtensionError>,
}

impl<T> Directive<T> {
    /// Look the directive up in an extension map.
    ///
    /// `Ok(None)` when absent, an `Extension` error naming the key when the
    /// value has the wrong shape.
    pub fn get(&self, extensions: &Extensions) -> Result<Option<T>> {
        match extensions.get(self.key) {
            None => Ok(None),
            Some(value) => (self.parse)(value)
                .map(Some)
                .map_err(|source| TypeModelError::Extension {
                    key: self.key,
                    source,
                }),
        }
    }

    /// Convert a raw value without a map lookup.
    pub fn parse(&self, value: &Value) -> std::result::Result<T, ExtensionError> {
        (self.parse)(value)
    }
}

/// Replaces the resolved type with the given literal type name
pub const TYPE_OVERRIDE: Directive<String> = Directive {
    key: "x-type",
    parse: parse_string,
};

/// Gives a generated type an explicit name
pub const TYPE_NAME: Directive<String> = Directive {
    key: "x-type-name",
    parse: parse_string,
};

/// Optional fields of this type are not wrapped in an optional pointer
pub const SKIP_OPTIONAL_POINTER: Directive<bool> = Directive {
    key: "x-type-skip-optional-pointer",
    parse: parse_bool,
};

/// Overrides the generated field name of a property
pub const FIELD_NAME: Directive<String> = Directive {
    key: "x-field-name",
    parse: parse_string,
};

pub const OMIT_EMPTY: Directive<bool> = Directive {
    key: "x-omitempty",
    parse: parse_bool,
};

pub const JSON_IGNORE: Directive<bool> = Directive {
    key: "x-json-ignore",
    parse: parse_bool,
};

/// Additional serialization tags, merged after the `json` tag
pub const EXTRA_TAGS: Directive<BTreeMap<String, String>> = Directive {
    key: "x-extra-tags",
    parse: parse_string_map,
};

pub const ENUM_VAR_NAMES: Directive<Vec<String>> = Directive {
    key: "x-enum-varnames",
    parse: parse_string_list,
};

pub const ENUM_NAMES: Directive<Vec<String>> = Directive {
    key: "x-enumNames",
    parse: parse_string_list,
};

/// Both accepted spellings of the enum display-name hint, in priority order
pub const ENUM_DISPLAY_NAMES: [Directive<Vec<String>>; 2] = [ENUM_VAR_NAMES, ENUM_NAMES];

pub const DEPRECATION_REASON: Directive<String> = Directive {
    key: "x-deprecated-reason",
    parse: parse_string,
};

/// Use `x-field-name` verbatim, without identifier conversion
pub const ONLY_HONOUR_FIELD_NAME: Directive<bool> = Directive {
    key: "x-only-honour-field-name",
    parse: parse_bool,
};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &'static str, value: &Value) -> ExtensionError {
    ExtensionError::Conversion {
        expected,
        found: json_kind(value),
    }
}

fn parse_string(value: &Value) -> std::result::Result<String, ExtensionError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch("string", value))
}

fn parse_bool(value: &Value) -> std::result::Result<bool, ExtensionError> {
    value.as_bool().ok_or_else(|| mismatch("bool", value))
}

fn parse_string_list(value: &Value) -> std::result::Result<Vec<String>, ExtensionError> {
    let items = value.as_array().ok_or_else(|| mismatch("array", value))?;
    items.iter().map(parse_string).collect()
}

fn parse_string_map(value: &Value) -> std::result::Result<BTreeMap<String, String>, ExtensionError> {
    let entries = value.as_object().ok_or_else(|| mismatch("object", value))?;
    entries
        .iter()
        .map(|(k, v)| parse_string(v).map(|s| (k.clone(), s)))
        .collect()
}
