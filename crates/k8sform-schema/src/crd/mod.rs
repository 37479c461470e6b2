//! CustomResourceDefinition handling
//!
//! - **Schema representation** (`schema`): Structured types for CRD schemas
//! - **Parsing** (`parser`): Parse CRD YAML into schema structures
//!
//! Only the parts of a CRD that shape the provider's attribute tree are kept:
//! names, scope, served versions and the OpenAPI v3 validation schema.

mod parser;
mod schema;

pub use parser::CrdParser;
pub use schema::{
    AdditionalProperties, CrdNames, CrdSchema, CrdScope, CrdVersionSchema, OpenApiSchema,
    PropertyType, SchemaProperty,
};
