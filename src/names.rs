//! Name Derivation
//!
//! Turns schema names, document paths and `$ref` strings into type names.
//! Every function here is pure: the same input always yields the same name,
//! which is what makes auxiliary type names deterministic.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{Result, TypeModelError};

/// Package value in an import mapping meaning "the package being generated"
pub const CURRENT_PACKAGE: &str = "-";

/// Characters that end a word when camel-casing
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '-' | '#' | '@' | '!' | '$' | '&' | '=' | '.' | '+' | ':' | ';' | '_' | '~' | ' ' | '('
            | ')' | '[' | ']' | '{' | '}' | '<' | '>' | '/' | '\\' | '|' | ','
    )
}

/// Convert to CamelCase, dropping separators and any other punctuation.
///
/// Upper-case letters and digits are kept as-is; a lower-case letter is
/// capitalized when it starts the string or follows a separator.
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.trim_matches(' ').chars() {
        if c.is_uppercase() || c.is_numeric() {
            result.push(c);
        } else if c.is_lowercase() {
            if capitalize_next {
                result.extend(c.to_uppercase());
            } else {
                result.push(c);
            }
        }
        capitalize_next = is_separator(c);
    }

    result
}

pub fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Type name for a schema name: CamelCase, never starting with a digit
pub fn schema_name_to_type_name(name: &str) -> String {
    if name == "$" {
        return "DollarSign".to_string();
    }
    let camel = to_camel_case(name);
    if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("N{}", camel)
    } else {
        camel
    }
}

/// Type name for a document path: each segment camel-cased, joined with `_`
pub fn path_to_type_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| to_camel_case(segment.as_ref()))
        .collect::<Vec<_>>()
        .join("_")
}

/// JSON path string for a document path
pub fn path_to_json_name<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

/// Last `/` segment of a reference: `#/components/schemas/Pet` -> `Pet`
pub fn ref_path_to_object_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Resolve a `$ref` to the type name it denotes.
///
/// Local references must point four levels deep (`#/components/<kind>/<Name>`).
/// Remote references (`doc#/pointer`) need an import mapping entry for `doc`;
/// a mapping to [`CURRENT_PACKAGE`] resolves in the current package, any other
/// package name qualifies the type as `pkg.TypeName`.
pub fn ref_path_to_type_name(
    reference: &str,
    import_mapping: &BTreeMap<String, String>,
) -> Result<String> {
    if reference.starts_with('#') {
        return local_ref_to_type_name(reference, true);
    }

    let Some((document, pointer)) = reference.split_once('#') else {
        return Err(unresolvable(reference, "unsupported reference"));
    };
    if pointer.contains('#') {
        return Err(unresolvable(reference, "unsupported reference"));
    }

    let package = import_mapping.get(document).ok_or_else(|| {
        unresolvable(
            reference,
            format!(
                "unrecognized external reference '{}'; add it to the import mapping",
                document
            ),
        )
    })?;

    let type_name = local_ref_to_type_name(&format!("#{}", pointer), false)?;
    if package == CURRENT_PACKAGE {
        Ok(type_name)
    } else {
        Ok(format!("{}.{}", package, type_name))
    }
}

fn local_ref_to_type_name(reference: &str, local: bool) -> Result<String> {
    let parts: Vec<&str> = reference.split('/').collect();
    let depth = parts.len();
    let depth_ok = if local { depth == 4 } else { depth == 4 || depth == 2 };
    if !depth_ok {
        return Err(unresolvable(
            reference,
            format!("unexpected reference depth: {} (local: {})", depth, local),
        ));
    }
    Ok(schema_name_to_type_name(parts[depth - 1]))
}

fn unresolvable(reference: &str, reason: impl Into<String>) -> TypeModelError {
    TypeModelError::UnresolvableRef {
        reference: reference.to_string(),
        reason: reason.into(),
    }
}

/// Pair enum display names with their values and turn the names into
/// identifier fragments.
///
/// Display names that repeat are dropped (first one wins); identifiers that
/// collide after sanitizing get a numeric suffix. Output order follows the
/// input, so identifier and value lists stay parallel.
pub fn sanitize_enum_names(names: &[String], values: &[String]) -> Vec<(String, String)> {
    let mut seen_names: HashSet<&str> = HashSet::with_capacity(values.len());
    let mut deduped: Vec<(&str, &str)> = Vec::with_capacity(values.len());

    for (i, value) in values.iter().enumerate() {
        let name = names.get(i).map(String::as_str).unwrap_or(value.as_str());
        if seen_names.insert(name) {
            deduped.push((name, value.as_str()));
        }
    }

    let mut counts: HashMap<String, usize> = HashMap::with_capacity(deduped.len());
    deduped
        .into_iter()
        .map(|(name, value)| {
            let ident = to_camel_case(name);
            let count = counts.entry(ident.clone()).or_insert(0);
            let unique = if *count == 0 {
                ident
            } else {
                format!("{}{}", ident, count)
            };
            *count += 1;
            (unique, value.to_string())
        })
        .collect()
}
