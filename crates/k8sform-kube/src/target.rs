//! Addressing of unstructured objects

use std::fmt;

/// REST coordinates of a resource type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiTarget {
    /// API group, empty for the core group
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Plural used in REST paths
    pub plural: String,
    pub namespaced: bool,
}

impl ApiTarget {
    /// `apiVersion` value: `group/version`, or `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Address a named object of this type
    pub fn object(&self, namespace: Option<&str>, name: impl Into<String>) -> ObjectRef {
        ObjectRef {
            api: self.clone(),
            namespace: if self.namespaced {
                namespace.map(String::from)
            } else {
                None
            },
            name: name.into(),
        }
    }
}

/// A single object: type coordinates plus namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub api: ApiTarget,
    pub namespace: Option<String>,
    pub name: String,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.api.kind, ns, self.name),
            None => write!(f, "{} {}", self.api.kind, self.name),
        }
    }
}
