//! k8sform Kube - the Kubernetes side of every CRD-backed resource
//!
//! This crate provides:
//! - **Object client seam** (`ObjectClient`): GET, server-side apply and DELETE
//!   on unstructured objects addressed by group/version/plural
//! - **kube-rs implementation** (`KubeObjectClient`): `Api<DynamicObject>`
//!   with field manager, force and strict field validation
//! - **Mock client** (`MockObjectClient`): in-memory objects for tests
//! - **Client settings** (`ClientSettings`): kubeconfig/context loading

pub mod client;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod mock;
pub mod target;

pub use client::{ApplyOptions, DeleteOptions, ObjectClient, Propagation};
pub use config::ClientSettings;
pub use dynamic::KubeObjectClient;
pub use error::{KubeError, Result};
pub use mock::{MockObjectClient, OperationCounts, Verb};
pub use target::{ApiTarget, ObjectRef};
