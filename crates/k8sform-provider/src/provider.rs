//! The provider: catalog, configuration and cluster connection

use std::sync::Arc;

use k8sform_kube::{KubeObjectClient, ObjectClient};

use crate::catalog::Catalog;
use crate::config::ProviderConfig;
use crate::data_source::ManifestDataSource;
use crate::error::Result;
use crate::resource::{ApplyDefaults, CrdResource};
use crate::schema::ProviderSchema;

/// Provider instance serving every catalog entry
pub struct Provider {
    catalog: Arc<Catalog>,
    config: ProviderConfig,
    client: Option<Arc<dyn ObjectClient>>,
}

impl Provider {
    /// An unconfigured provider; resources report it as offline until
    /// `configure` succeeds
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: ProviderConfig::default(),
            client: None,
        }
    }

    /// Use an existing object client instead of connecting
    pub fn with_client(mut self, client: Arc<dyn ObjectClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Apply the provider block and, unless offline, connect to the cluster
    pub async fn configure(&mut self, config: ProviderConfig) -> Result<()> {
        if config.offline {
            tracing::debug!("provider configured offline");
            self.client = None;
        } else if self.client.is_none() {
            let client = config.client_settings().connect().await?;
            self.client = Some(Arc::new(KubeObjectClient::new(client)));
        }
        self.config = config;
        Ok(())
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema::for_catalog(&self.catalog)
    }

    /// Resource for a type name
    pub fn resource(&self, type_name: &str) -> Result<CrdResource> {
        let definition = self.catalog.resource(type_name)?.clone();
        Ok(CrdResource::new(
            definition,
            self.client.clone(),
            ApplyDefaults::from(&self.config),
        ))
    }

    /// Manifest data source for a type name
    pub fn data_source(&self, type_name: &str) -> Result<ManifestDataSource> {
        let definition = self.catalog.data_source(type_name)?.clone();
        Ok(ManifestDataSource::new(definition))
    }
}
