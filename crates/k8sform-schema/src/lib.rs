//! k8sform Schema - the data model shared by every CRD-backed type
//!
//! This crate turns CustomResourceDefinition documents into the attribute
//! schemas served by the provider:
//! - `crd`: Structured CRD representation and the YAML parser
//! - `attribute`: Attribute tree, modes and attribute paths
//! - `validators`: Enum, pattern, length and range checks plus metadata rules
//! - `convert`: OpenAPI property -> attribute conversion
//! - `mapping`: snake_case model <-> Kubernetes object mapping
//! - `validate`: Config validation against an attribute tree
//! - `naming`: snake_case and provider type names

pub mod attribute;
pub mod convert;
pub mod crd;
pub mod error;
pub mod mapping;
pub mod naming;
pub mod suggestions;
pub mod validate;
pub mod validators;

pub use attribute::{Attribute, AttributeKind, AttributeMode, AttributePath, PathStep, Schema};
pub use convert::{attribute_from_property, kind_from_property, validators_for};
pub use crd::{CrdParser, CrdSchema, CrdScope, CrdVersionSchema, PropertyType, SchemaProperty};
pub use error::{Result, SchemaError};
pub use mapping::{from_kubernetes, object_from_kubernetes, object_to_kubernetes, to_kubernetes};
pub use naming::{snake_case, type_name};
pub use suggestions::{MAX_SUGGESTION_DISTANCE, Suggestion, did_you_mean, find_closest_matches};
pub use validate::{Violation, validate_object, validate_state};
pub use validators::Validator;
