use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, Patch, PatchParams, PostParams};
use kube::client::Client;
use kube::runtime::events::{Event, EventType};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::api::registry_entry::ClusterRegistryEntry;
use crate::api::remote_cluster::RemoteCluster;
use crate::state::Diagnostics;

use super::{CreateResourceError, CreateResourceResult, UpdateResourceError, UpdateResourceResult};

pub static REGISTRAR_MANAGER: &str = "cluster-registrar";

/// Typed resource operations the registrar performs against the store.
/// Implemented by [`Context`] for a live cluster; tests substitute their own
/// implementation.
pub trait RegistrationClient {
    fn create_registry_entry(
        &self,
        entry: &ClusterRegistryEntry,
    ) -> impl Future<Output = CreateResourceResult<ClusterRegistryEntry>> + Send;

    fn create_token_secret(
        &self,
        secret: &Secret,
    ) -> impl Future<Output = CreateResourceResult<Secret>> + Send;

    fn create_remote_cluster(
        &self,
        cluster: &RemoteCluster,
    ) -> impl Future<Output = CreateResourceResult<RemoteCluster>> + Send;

    fn update_token_secret(
        &self,
        secret: &Secret,
    ) -> impl Future<Output = UpdateResourceResult<Secret>> + Send;

    fn update_remote_cluster(
        &self,
        cluster: &RemoteCluster,
    ) -> impl Future<Output = UpdateResourceResult<RemoteCluster>> + Send;

    fn get_remote_cluster(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<RemoteCluster, kube::Error>> + Send;
}

// Context for the registrar
#[derive(Clone)]
pub struct Context {
    /// Kubernetes client
    pub client: Client,
    /// Diagnostics read by the web server
    pub diagnostics: Arc<RwLock<Diagnostics>>,
}

impl Context {
    async fn create_resource<R>(&self, res: &R) -> CreateResourceResult<R>
    where
        R: Clone + Serialize + DeserializeOwned + Debug,
        R: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        let ns = res.namespace().unwrap_or(String::from("default"));
        let api: Api<R> = Api::namespaced(self.client.clone(), &ns);

        let created = api
            .create(&PostParams::default(), res)
            .await
            .map_err(CreateResourceError::Create)?;

        info!("Created registration object");
        self.diagnostics
            .read()
            .await
            .recorder(self.client.clone())
            .publish(
                &Event {
                    type_: EventType::Normal,
                    reason: "Created".into(),
                    note: Some(format!(
                        "Created registration object `{}` in `{ns}`",
                        res.name_any()
                    )),
                    action: "Creating".into(),
                    secondary: None,
                },
                &res.object_ref(&()),
            )
            .await?;

        Ok(created)
    }

    async fn update_resource<R>(&self, res: &R) -> UpdateResourceResult<R>
    where
        R: Clone + Serialize + DeserializeOwned + Debug,
        R: Resource<DynamicType = (), Scope = NamespaceResourceScope>,
    {
        let ns = res.namespace().unwrap_or(String::from("default"));
        let api: Api<R> = Api::namespaced(self.client.clone(), &ns);

        let updated = api
            .patch(
                &res.name_any(),
                &PatchParams::apply(REGISTRAR_MANAGER),
                &Patch::Merge(res),
            )
            .await
            .map_err(UpdateResourceError::Update)?;

        info!("Updated registration object");
        self.diagnostics
            .read()
            .await
            .recorder(self.client.clone())
            .publish(
                &Event {
                    type_: EventType::Normal,
                    reason: "Updated".into(),
                    note: Some(format!(
                        "Updated registration object `{}` in `{ns}`",
                        res.name_any()
                    )),
                    action: "Updating".into(),
                    secondary: None,
                },
                &res.object_ref(&()),
            )
            .await?;

        Ok(updated)
    }
}

impl RegistrationClient for Context {
    fn create_registry_entry(
        &self,
        entry: &ClusterRegistryEntry,
    ) -> impl Future<Output = CreateResourceResult<ClusterRegistryEntry>> + Send {
        self.create_resource(entry)
    }

    fn create_token_secret(
        &self,
        secret: &Secret,
    ) -> impl Future<Output = CreateResourceResult<Secret>> + Send {
        self.create_resource(secret)
    }

    fn create_remote_cluster(
        &self,
        cluster: &RemoteCluster,
    ) -> impl Future<Output = CreateResourceResult<RemoteCluster>> + Send {
        self.create_resource(cluster)
    }

    fn update_token_secret(
        &self,
        secret: &Secret,
    ) -> impl Future<Output = UpdateResourceResult<Secret>> + Send {
        self.update_resource(secret)
    }

    fn update_remote_cluster(
        &self,
        cluster: &RemoteCluster,
    ) -> impl Future<Output = UpdateResourceResult<RemoteCluster>> + Send {
        self.update_resource(cluster)
    }

    fn get_remote_cluster(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<RemoteCluster, kube::Error>> + Send {
        let api: Api<RemoteCluster> = Api::namespaced(self.client.clone(), namespace);
        let name = name.to_string();
        async move { api.get(&name).await }
    }
}
