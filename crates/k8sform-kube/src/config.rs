//! Cluster connection settings

use std::path::PathBuf;

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};

use crate::error::Result;

/// How to reach the cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    /// Explicit kubeconfig file; otherwise the usual inference applies
    pub kubeconfig: Option<PathBuf>,
    /// Context to use instead of the current one
    pub context: Option<String>,
}

impl ClientSettings {
    pub fn new(kubeconfig: Option<PathBuf>, context: Option<String>) -> Self {
        Self {
            kubeconfig,
            context,
        }
    }

    fn options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            ..Default::default()
        }
    }

    /// Resolve the client configuration
    ///
    /// An explicit kubeconfig wins; a context alone selects from the default
    /// kubeconfig; with neither, in-cluster and `KUBECONFIG` inference is used.
    pub async fn config(&self) -> Result<Config> {
        let config = match &self.kubeconfig {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(kubeconfig, &self.options()).await?
            }
            None if self.context.is_some() => Config::from_kubeconfig(&self.options()).await?,
            None => Config::infer().await?,
        };
        Ok(config)
    }

    /// Build a connected client
    pub async fn connect(&self) -> Result<Client> {
        let config = self.config().await?;
        tracing::debug!(cluster_url = %config.cluster_url, "connecting to cluster");
        Ok(Client::try_from(config)?)
    }
}
