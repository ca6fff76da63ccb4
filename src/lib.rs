//! Schema Type Model
//!
//! Resolves OpenAPI / JSON Schema trees into a language-agnostic type model
//! that code generators can lower into strongly-typed source.
//!
//! ## Features
//!
//! - **Deterministic Naming**: anonymous nested shapes get names derived from their document path
//! - **Opaque References**: `$ref`s become named pointers, so reference cycles never recurse
//! - **Composition**: `allOf` merging, `oneOf`/`anyOf` unions with discriminators, enums
//! - **Map Flattening**: objects that only carry additional properties become plain maps
//! - **Extension Directives**: `x-type`, `x-type-name`, field-level overrides
//!
//! ## Architecture
//!
//! ```text
//! schema::SchemaRef ──► resolve::SchemaResolver ──► model::TypeDescriptor
//!                          │                            └── additional_types: Vec<TypeDefinition>
//!                          ├── object    (properties, catch-all maps)
//!                          ├── union     (oneOf / anyOf)
//!                          ├── enums     (enum tables)
//!                          ├── primitive (scalars, sequences)
//!                          └── merge     (allOf)
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod names;
pub mod resolve;
pub mod schema;

pub use config::ResolverConfig;
pub use error::{Result, TypeModelError};
pub use model::{
    collect_enum_definitions, EnumDefinition, Property, TypeDefinition, TypeDescriptor, TypeExpr,
};
pub use resolve::{generate_types, SchemaResolver};
pub use schema::{Components, Document, Parameter, SchemaNode, SchemaRef};
