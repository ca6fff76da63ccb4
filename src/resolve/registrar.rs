//! Auxiliary type registration
//!
//! Anonymous shapes that cannot stay inline (catch-all maps, unions, nested
//! enums, explicitly named objects) are turned into named definitions here.
//! The definition is appended to the descriptor's own auxiliary list and the
//! descriptor is pointed at the new name; callers move those lists upward so
//! the root ends up with every definition discovered below it.

use tracing::debug;

use crate::model::{TypeDefinition, TypeDescriptor, TypeExpr};
use crate::names::{path_to_json_name, path_to_type_name};

/// Snapshot a descriptor as a definition. Nested auxiliary definitions stay
/// with the descriptor rather than being copied into the snapshot.
pub fn define<'a>(
    desc: &mut TypeDescriptor<'a>,
    type_name: impl Into<String>,
    json_name: impl Into<String>,
) -> TypeDefinition<'a> {
    let nested = std::mem::take(&mut desc.additional_types);
    let schema = desc.clone();
    desc.additional_types = nested;

    TypeDefinition {
        type_name: type_name.into(),
        json_name: json_name.into(),
        schema,
    }
}

/// Register `desc` under `type_name` and point it at that name
pub fn register_as<'a>(
    desc: &mut TypeDescriptor<'a>,
    type_name: impl Into<String>,
    json_name: impl Into<String>,
) {
    let def = define(desc, type_name, json_name);
    debug!(type_name = %def.type_name, json_name = %def.json_name, "registered auxiliary type");

    desc.ref_type = Some(def.type_name.clone());
    desc.target = TypeExpr::named(def.type_name.clone());
    desc.additional_types.push(def);
}

/// Register `desc` under the name derived from its document path
pub fn register_under_path(desc: &mut TypeDescriptor<'_>, path: &[String]) {
    register_as(desc, path_to_type_name(path), path_to_json_name(path));
}
