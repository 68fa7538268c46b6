use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Records the existence and location of a remote cluster, distinct from its
/// credentials.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[kube(
    group = "registration.registrar.dev",
    version = "v1alpha1",
    kind = "ClusterRegistryEntry",
    plural = "clusterregistryentries"
)]
#[kube(namespaced)]
#[kube(derive = "Default")]
#[serde(rename_all = "camelCase")]
pub struct ClusterRegistryEntrySpec {
    pub kubernetes_api_endpoints: KubernetesApiEndpoints,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesApiEndpoints {
    pub server_endpoints: Vec<ServerEndpoint>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerEndpoint {
    pub server_address: String,
}
