//! Type Model
//!
//! The language-agnostic output of resolution:
//! - `types`: target type expressions ([`TypeExpr`], [`Scalar`], struct bodies)
//! - `descriptor`: per-node results ([`TypeDescriptor`], [`Property`], [`TypeDefinition`])
//! - `enums`: enum definitions with identifier conflict handling

pub mod descriptor;
pub mod enums;
pub mod types;

pub use descriptor::{Discriminator, EnumValue, Property, TypeDefinition, TypeDescriptor};
pub use enums::{collect_enum_definitions, EnumDefinition};
pub use types::{Scalar, StructBody, StructField, TypeExpr};
