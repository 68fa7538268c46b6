use k8s_openapi::api::core::v1::Secret;
use thiserror::Error;

use crate::add_edit::AddEditStatus;
use crate::api::registry_entry::ClusterRegistryEntry;
use crate::api::remote_cluster::RemoteCluster;
use crate::manifest::ClusterFields;

pub mod client;
pub mod cluster;
pub mod dispatch;
pub mod watch;

#[cfg(test)]
pub(crate) mod fixtures;

pub use client::{Context, RegistrationClient};
pub use dispatch::run;
pub use watch::RaceOutcome;

pub static CLUSTER_CREATE_FAILED_MESSAGE: &str = "Cluster failed creation";
pub static CLUSTER_UPDATE_FAILED_MESSAGE: &str = "Cluster failed update";

/// Requests consumed by the registrar dispatcher.
#[derive(Clone, Debug)]
pub enum RegistrarSignal {
    AddClusterRequested(ClusterFields),
    UpdateClusterRequested(ClusterFields),
    WatchClusterAddEditStatusRequested { cluster_name: String },
    CancelWatchClusterAddEditStatusRequested,
}

/// Notifications emitted towards the store layer. The only outward
/// communication points of the registrar.
#[derive(Clone, Debug)]
pub enum RegistrarEvent {
    AddClusterSucceeded(CreationResult),
    UpdateClusterSucceeded(UpdateResult),
    AddClusterFailed { message: String },
    UpdateClusterFailed { message: String },
    ClusterAddEditStatusChanged(AddEditStatus),
    WatchAddClusterRequested { cluster_name: String },
}

/// The three resources created for one registration, one field per kind.
/// Assigned positionally from the three create calls, independent of their
/// completion order.
#[derive(Clone, Debug)]
pub struct CreationResult {
    pub registry_entry: ClusterRegistryEntry,
    pub token_secret: Secret,
    pub remote_cluster: RemoteCluster,
}

/// The resources touched by an update of an existing registration.
#[derive(Clone, Debug)]
pub struct UpdateResult {
    pub token_secret: Secret,
    pub remote_cluster: RemoteCluster,
}

#[derive(Error, Debug)]
pub enum CreateError {
    #[error("Registry entry create error: {0}")]
    RegistryEntry(#[source] CreateResourceError),

    #[error("Token secret create error: {0}")]
    TokenSecret(#[source] CreateResourceError),

    #[error("Remote cluster create error: {0}")]
    RemoteCluster(#[source] CreateResourceError),
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Token secret update error: {0}")]
    TokenSecret(#[source] UpdateResourceError),

    #[error("Remote cluster update error: {0}")]
    RemoteCluster(#[source] UpdateResourceError),
}

#[derive(Error, Debug)]
pub enum CreateResourceError {
    #[error("Create error: {0}")]
    Create(#[source] kube::Error),

    #[error("Diagnostics error: {0}")]
    Event(#[from] kube::Error),
}

#[derive(Error, Debug)]
pub enum UpdateResourceError {
    #[error("Update error: {0}")]
    Update(#[source] kube::Error),

    #[error("Diagnostics error: {0}")]
    Event(#[from] kube::Error),
}

pub type CreateResourceResult<T> = std::result::Result<T, CreateResourceError>;
pub type UpdateResourceResult<T> = std::result::Result<T, UpdateResourceError>;
