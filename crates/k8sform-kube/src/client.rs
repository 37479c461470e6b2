//! Object client seam
//!
//! Every resource operation is exactly one call on an `ObjectClient`.
//! Implementations must be Send + Sync for use across async tasks.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::target::ObjectRef;

/// Field manager used when neither the resource nor the provider sets one
pub const DEFAULT_FIELD_MANAGER: &str = "k8sform";

/// Server-side apply options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Field manager recorded in managedFields
    pub field_manager: String,
    /// Take ownership of fields owned by other managers
    pub force: bool,
    /// Validate and default without persisting
    pub dry_run: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            force: false,
            dry_run: false,
        }
    }
}

/// Deletion propagation policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Propagation {
    #[default]
    Background,
    Foreground,
    Orphan,
}

impl Propagation {
    pub const VALUES: [&'static str; 3] = ["Background", "Foreground", "Orphan"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Background" => Some(Self::Background),
            "Foreground" => Some(Self::Foreground),
            "Orphan" => Some(Self::Orphan),
            _ => None,
        }
    }
}

/// Delete options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub propagation: Propagation,
}

/// Unstructured access to Kubernetes objects
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Fetch an object; `None` when it does not exist
    async fn get(&self, object: &ObjectRef) -> Result<Option<Value>>;

    /// Server-side apply `manifest` and return the object the server persisted
    async fn apply(&self, object: &ObjectRef, manifest: &Value, options: &ApplyOptions)
    -> Result<Value>;

    /// Delete an object; `false` when it was already gone
    async fn delete(&self, object: &ObjectRef, options: &DeleteOptions) -> Result<bool>;
}
