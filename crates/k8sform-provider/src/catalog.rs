//! Catalog of CRD versions served by the provider
//!
//! Each served version of each CRD becomes one `CrdDefinition`, addressed by
//! its resource type name. The built-in CRDs are embedded in the binary;
//! more can be added from YAML at start-up.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use walkdir::WalkDir;

use k8sform_kube::ApiTarget;
use k8sform_schema::{
    Attribute, CrdParser, CrdSchema, CrdScope, attribute_from_property, find_closest_matches,
    type_name,
};

use crate::error::{ProviderError, Result};

/// Prefix of every type name
pub const PROVIDER_NAME: &str = "k8s";

/// Suffix distinguishing manifest data sources from resources
pub const MANIFEST_SUFFIX: &str = "_manifest";

const BUILTIN_CRDS: &[(&str, &str)] = &[
    (
        "autoscaling.k8s.io_verticalpodautoscalers.yaml",
        include_str!("../crds/autoscaling.k8s.io_verticalpodautoscalers.yaml"),
    ),
    (
        "cert-manager.io_certificates.yaml",
        include_str!("../crds/cert-manager.io_certificates.yaml"),
    ),
    (
        "config.openshift.io_infrastructures.yaml",
        include_str!("../crds/config.openshift.io_infrastructures.yaml"),
    ),
    (
        "config.openshift.io_oauths.yaml",
        include_str!("../crds/config.openshift.io_oauths.yaml"),
    ),
];

/// One served version of a CRD
#[derive(Debug, Clone, PartialEq)]
pub struct CrdDefinition {
    /// Resource type name, e.g. `k8s_cert_manager_io_certificate_v1`
    pub type_name: String,
    /// Full CRD name, e.g. `certificates.cert-manager.io`
    pub crd_name: String,
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub scope: CrdScope,
    pub description: Option<String>,
    pub deprecation_warning: Option<String>,
    /// Attributes for the top-level object body (usually just `spec`)
    pub body: Vec<Attribute>,
}

impl CrdDefinition {
    /// One definition per served version that carries a schema
    pub fn from_crd(crd: &CrdSchema) -> Vec<CrdDefinition> {
        crd.served_versions()
            .filter_map(|version| {
                let Some(schema) = version.schema.as_ref() else {
                    tracing::warn!(crd = %crd.name, version = %version.name, "skipping version without schema");
                    return None;
                };

                let body = schema
                    .body_properties()
                    .map(|(name, prop)| attribute_from_property(name, prop, schema.is_required(name)))
                    .collect();

                let deprecation_warning = version.deprecated.then(|| {
                    version.deprecation_warning.clone().unwrap_or_else(|| {
                        format!("{} is deprecated", crd.api_version(&version.name))
                    })
                });

                Some(CrdDefinition {
                    type_name: type_name(PROVIDER_NAME, &crd.group, &crd.names.kind, &version.name),
                    crd_name: crd.name.clone(),
                    group: crd.group.clone(),
                    version: version.name.clone(),
                    kind: crd.names.kind.clone(),
                    plural: crd.names.plural.clone(),
                    scope: crd.scope,
                    description: schema.description.clone(),
                    deprecation_warning,
                    body,
                })
            })
            .collect()
    }

    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope.is_namespaced()
    }

    /// Type name of the matching manifest data source
    pub fn data_source_name(&self) -> String {
        format!("{}{}", self.type_name, MANIFEST_SUFFIX)
    }

    /// REST coordinates for the dynamic client
    pub fn api_target(&self) -> ApiTarget {
        ApiTarget {
            group: self.group.clone(),
            version: self.version.clone(),
            kind: self.kind.clone(),
            plural: self.plural.clone(),
            namespaced: self.is_namespaced(),
        }
    }
}

/// All definitions, keyed by resource type name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, Arc<CrdDefinition>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the CRDs embedded in the binary
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for (file, yaml) in BUILTIN_CRDS {
            tracing::trace!(file, "loading embedded CRD");
            catalog.add_yaml(yaml)?;
        }
        Ok(catalog)
    }

    /// Register every served version of a CRD, returning the new type names
    pub fn add_crd(&mut self, crd: &CrdSchema) -> Result<Vec<String>> {
        let definitions = CrdDefinition::from_crd(crd);
        if definitions.is_empty() {
            return Err(ProviderError::NoServedVersions {
                crd: crd.name.clone(),
            });
        }

        for definition in &definitions {
            if let Some(existing) = self.entries.get(&definition.type_name) {
                return Err(ProviderError::DuplicateType {
                    name: definition.type_name.clone(),
                    existing: existing.crd_name.clone(),
                });
            }
        }

        let mut added = Vec::with_capacity(definitions.len());
        for definition in definitions {
            tracing::debug!(type_name = %definition.type_name, "registered CRD version");
            added.push(definition.type_name.clone());
            self.entries
                .insert(definition.type_name.clone(), Arc::new(definition));
        }
        Ok(added)
    }

    /// Register all CRDs in a (multi-document) YAML string
    pub fn add_yaml(&mut self, yaml: &str) -> Result<Vec<String>> {
        let mut added = Vec::new();
        for crd in CrdParser::parse_all(yaml)? {
            added.extend(self.add_crd(&crd)?);
        }
        Ok(added)
    }

    /// Register CRDs from a file, or from every YAML file below a directory
    pub fn add_path(&mut self, path: &Path) -> Result<Vec<String>> {
        let mut added = Vec::new();
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| ProviderError::Io(e.into()))?;
                let is_yaml = entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml");
                if entry.file_type().is_file() && is_yaml {
                    added.extend(self.add_path(entry.path())?);
                }
            }
        } else {
            tracing::debug!(path = %path.display(), "loading CRD file");
            let content = std::fs::read_to_string(path)?;
            added.extend(self.add_yaml(&content)?);
        }
        Ok(added)
    }

    pub fn get(&self, type_name: &str) -> Option<&Arc<CrdDefinition>> {
        self.entries.get(type_name)
    }

    /// Look up a resource type, suggesting close names when unknown
    pub fn resource(&self, type_name: &str) -> Result<&Arc<CrdDefinition>> {
        self.get(type_name).ok_or_else(|| ProviderError::UnknownType {
            category: "resource",
            name: type_name.to_string(),
            suggestion: match type_name.strip_suffix(MANIFEST_SUFFIX) {
                Some(resource) if self.get(resource).is_some() => {
                    Some(format!("Did you mean \"{}\"?", resource))
                }
                _ => self.suggest(type_name, self.resource_names()),
            },
        })
    }

    /// Look up a data source type (`<resource type>_manifest`)
    pub fn data_source(&self, name: &str) -> Result<&Arc<CrdDefinition>> {
        name.strip_suffix(MANIFEST_SUFFIX)
            .and_then(|type_name| self.get(type_name))
            .ok_or_else(|| ProviderError::UnknownType {
                category: "data source",
                name: name.to_string(),
                suggestion: if self.get(name).is_some() {
                    Some(format!("Did you mean \"{}{}\"?", name, MANIFEST_SUFFIX))
                } else {
                    self.suggest(name, self.data_source_names())
                },
            })
    }

    fn suggest(&self, input: &str, candidates: Vec<String>) -> Option<String> {
        let matches = find_closest_matches(input, candidates.iter().map(String::as_str), 3);
        match matches.as_slice() {
            [] => None,
            [only] => Some(format!("Did you mean \"{}\"?", only.text)),
            many => Some(format!(
                "Did you mean one of: {}?",
                many.iter()
                    .map(|m| format!("\"{}\"", m.text))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }

    pub fn resource_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn data_source_names(&self) -> Vec<String> {
        self.entries.values().map(|d| d.data_source_name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CrdDefinition>> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
