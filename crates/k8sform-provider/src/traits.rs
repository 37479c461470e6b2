//! The seam between a provider host and the types it serves
//!
//! Plans and states are JSON objects keyed by attribute name. Every
//! operation either succeeds or returns the diagnostics explaining why not.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use k8sform_schema::{AttributePath, Schema};

use crate::diagnostics::Diagnostics;

/// Result type of resource and data source operations
pub type OpResult<T> = std::result::Result<T, Diagnostics>;

/// Outcome of planning a resource change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResult {
    /// The state expected after apply; computed values still unknown are null
    pub planned_state: Value,
    /// Attributes whose change forces the object to be replaced
    pub requires_replace: Vec<AttributePath>,
    /// Top-level attributes that differ from the prior state
    pub changed: Vec<String>,
}

impl PlanResult {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    pub fn requires_replace(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

/// A managed resource type
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &str;

    fn schema(&self) -> &Schema;

    /// Check a configuration without contacting the cluster
    fn validate(&self, config: &Value) -> Diagnostics;

    /// Compute the planned state from the prior state and the configuration
    fn plan(&self, prior: Option<&Value>, config: &Value) -> OpResult<PlanResult>;

    async fn create(&self, planned: &Value) -> OpResult<Value>;

    /// Refresh a state; `None` when the object no longer exists
    async fn read(&self, state: &Value) -> OpResult<Option<Value>>;

    async fn update(&self, prior: &Value, planned: &Value) -> OpResult<Value>;

    async fn delete(&self, state: &Value) -> OpResult<()>;

    /// Seed a state from an import identifier
    async fn import_state(&self, id: &str) -> OpResult<Value>;
}

/// A read-only data source type
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &str;

    fn schema(&self) -> &Schema;

    fn validate(&self, config: &Value) -> Diagnostics;

    async fn read(&self, config: &Value) -> OpResult<Value>;
}
