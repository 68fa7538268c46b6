use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The cluster descriptor: the top level resource representing a cluster's
/// registration with the management plane. References the credential secret
/// by name and namespace.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "registration.registrar.dev",
    version = "v1alpha1",
    kind = "RemoteCluster",
    plural = "remoteclusters"
)]
#[kube(namespaced)]
#[kube(status = "RemoteClusterStatus")]
#[kube(derive = "Default")]
#[serde(rename_all = "camelCase")]
pub struct RemoteClusterSpec {
    pub url: String,
    pub service_account_secret_ref: SecretRef,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_resource_group: Option<String>,
    #[serde(default)]
    pub is_host_cluster: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    pub name: String,
    pub namespace: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoteClusterStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<RemoteClusterCondition>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
pub struct RemoteClusterCondition {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
