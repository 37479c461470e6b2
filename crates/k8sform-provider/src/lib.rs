//! k8sform Provider - Kubernetes custom resources as managed resources
//!
//! Every served version of every catalog CRD yields two types:
//! - `k8s_<group>_<kind>_<version>`: a resource applied with server-side apply
//! - `k8s_<group>_<kind>_<version>_manifest`: a data source rendering YAML offline
//!
//! Modules:
//! - `catalog`: CRD definitions and type-name lookup
//! - `schema`: Provider, resource and data source schemas
//! - `manifest`: Model <-> Kubernetes object conversion and YAML rendering
//! - `resource` / `data_source`: The generic implementations of both kinds
//! - `provider`: Configuration and cluster connection
//! - `generator`: Example configuration files per type

pub mod catalog;
pub mod config;
pub mod data_source;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod import;
pub mod manifest;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod traits;

pub use catalog::{Catalog, CrdDefinition, MANIFEST_SUFFIX, PROVIDER_NAME};
pub use config::ProviderConfig;
pub use data_source::ManifestDataSource;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{ProviderError, Result};
pub use generator::{ExampleFile, generate_examples, missing_examples, write_examples};
pub use import::{ImportId, parse_import_id};
pub use manifest::{build_object, render_yaml};
pub use provider::Provider;
pub use resource::{ApplyDefaults, CrdResource};
pub use schema::ProviderSchema;
pub use traits::{DataSource, OpResult, PlanResult, Resource};
