use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use k8s_openapi::api::core::v1::Secret;
use kube::core::ErrorResponse;
use tokio::time::sleep;

use crate::api::registry_entry::ClusterRegistryEntry;
use crate::api::remote_cluster::{RemoteCluster, RemoteClusterCondition, RemoteClusterStatus};
use crate::manifest::ClusterFields;

use super::watch::READY_CONDITION;
use super::{
    CreateResourceError, CreateResourceResult, RegistrationClient, UpdateResourceError,
    UpdateResourceResult,
};

pub(crate) fn fields(name: &str) -> ClusterFields {
    ClusterFields {
        name: name.into(),
        url: "https://host".into(),
        token: "abc".into(),
        require_ssl: true,
        ca_bundle: None,
        azure_resource_group: None,
    }
}

fn denied() -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".into(),
        message: "denied".into(),
        reason: "Forbidden".into(),
        code: 403,
    })
}

/// Echoes created resources back, with optional per-kind delays and injected
/// faults. Successful descriptor fetches are counted in `polls`.
#[derive(Clone, Default)]
pub(crate) struct MockClient {
    pub fail_registry_entry: bool,
    pub fail_token_secret: bool,
    pub fail_remote_cluster: bool,
    pub fail_update: bool,
    pub fail_poll: bool,
    pub entry_delay: Option<Duration>,
    pub secret_delay: Option<Duration>,
    pub cluster_delay: Option<Duration>,
    /// Report a `Ready` condition once this many fetches have been served.
    pub ready_after_polls: Option<usize>,
    pub polls: Arc<AtomicUsize>,
}

impl RegistrationClient for MockClient {
    fn create_registry_entry(
        &self,
        entry: &ClusterRegistryEntry,
    ) -> impl Future<Output = CreateResourceResult<ClusterRegistryEntry>> + Send {
        let this = self.clone();
        let entry = entry.clone();
        async move {
            if let Some(delay) = this.entry_delay {
                sleep(delay).await;
            }
            if this.fail_registry_entry {
                return Err(CreateResourceError::Create(denied()));
            }
            Ok(entry)
        }
    }

    fn create_token_secret(
        &self,
        secret: &Secret,
    ) -> impl Future<Output = CreateResourceResult<Secret>> + Send {
        let this = self.clone();
        let secret = secret.clone();
        async move {
            if let Some(delay) = this.secret_delay {
                sleep(delay).await;
            }
            if this.fail_token_secret {
                return Err(CreateResourceError::Create(denied()));
            }
            Ok(secret)
        }
    }

    fn create_remote_cluster(
        &self,
        cluster: &RemoteCluster,
    ) -> impl Future<Output = CreateResourceResult<RemoteCluster>> + Send {
        let this = self.clone();
        let cluster = cluster.clone();
        async move {
            if let Some(delay) = this.cluster_delay {
                sleep(delay).await;
            }
            if this.fail_remote_cluster {
                return Err(CreateResourceError::Create(denied()));
            }
            Ok(cluster)
        }
    }

    fn update_token_secret(
        &self,
        secret: &Secret,
    ) -> impl Future<Output = UpdateResourceResult<Secret>> + Send {
        let this = self.clone();
        let secret = secret.clone();
        async move {
            if this.fail_update {
                return Err(UpdateResourceError::Update(denied()));
            }
            Ok(secret)
        }
    }

    fn update_remote_cluster(
        &self,
        cluster: &RemoteCluster,
    ) -> impl Future<Output = UpdateResourceResult<RemoteCluster>> + Send {
        let this = self.clone();
        let cluster = cluster.clone();
        async move {
            if this.fail_update {
                return Err(UpdateResourceError::Update(denied()));
            }
            Ok(cluster)
        }
    }

    fn get_remote_cluster(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<RemoteCluster, kube::Error>> + Send {
        let this = self.clone();
        let namespace = namespace.to_string();
        let name = name.to_string();
        async move {
            if this.fail_poll {
                return Err(denied());
            }
            let served = this.polls.fetch_add(1, Ordering::SeqCst) + 1;

            let mut cluster = RemoteCluster::new(&name, Default::default());
            cluster.metadata.namespace = Some(namespace);
            if this.ready_after_polls.is_some_and(|ready_at| served >= ready_at) {
                cluster.status = Some(RemoteClusterStatus {
                    conditions: Some(vec![RemoteClusterCondition {
                        type_: READY_CONDITION.into(),
                        status: "True".into(),
                        message: None,
                    }]),
                });
            }
            Ok(cluster)
        }
    }
}
