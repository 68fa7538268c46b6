use std::collections::BTreeMap;

use base64::prelude::*;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use serde::Deserialize;

use crate::api::registry_entry::{
    ClusterRegistryEntry, ClusterRegistryEntrySpec, KubernetesApiEndpoints, ServerEndpoint,
};
use crate::api::remote_cluster::{RemoteCluster, RemoteClusterSpec, SecretRef};

pub static SA_TOKEN_KEY: &str = "saToken";

/// Field values for a cluster registration, as submitted by the caller.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterFields {
    pub name: String,
    pub url: String,
    pub token: String,
    #[serde(default = "default_require_ssl")]
    pub require_ssl: bool,
    #[serde(default)]
    pub ca_bundle: Option<String>,
    #[serde(default)]
    pub azure_resource_group: Option<String>,
}

fn default_require_ssl() -> bool {
    true
}

/// Registry entry pointing at the cluster API endpoint.
pub fn registry_entry(name: &str, namespace: &str, url: &str) -> ClusterRegistryEntry {
    let mut entry = ClusterRegistryEntry::new(
        name,
        ClusterRegistryEntrySpec {
            kubernetes_api_endpoints: KubernetesApiEndpoints {
                server_endpoints: vec![ServerEndpoint {
                    server_address: url.into(),
                }],
            },
        },
    );
    entry.metadata.namespace = Some(namespace.into());
    entry
}

/// Opaque secret carrying the service account token. `ByteString` serializes
/// base64 encoded on the wire.
pub fn token_secret(name: &str, namespace: &str, token: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            SA_TOKEN_KEY.to_string(),
            ByteString(token.as_bytes().to_vec()),
        )])),
        type_: Some("Opaque".into()),
        ..Default::default()
    }
}

/// Cluster descriptor referencing the credential secret by name and
/// namespace. The secret must be the one built by [`token_secret`] for the
/// same registration.
pub fn remote_cluster(fields: &ClusterFields, namespace: &str, token_secret: &Secret) -> RemoteCluster {
    let mut cluster = RemoteCluster::new(
        &fields.name,
        RemoteClusterSpec {
            url: fields.url.clone(),
            service_account_secret_ref: SecretRef {
                name: token_secret.metadata.name.clone().unwrap_or_default(),
                namespace: token_secret.metadata.namespace.clone().unwrap_or_default(),
            },
            insecure: !fields.require_ssl,
            ca_bundle: fields
                .ca_bundle
                .as_deref()
                .map(|ca| BASE64_STANDARD.encode(ca)),
            azure_resource_group: fields.azure_resource_group.clone(),
            is_host_cluster: false,
        },
    );
    cluster.metadata.namespace = Some(namespace.into());
    cluster
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ClusterFields {
        ClusterFields {
            name: "c1".into(),
            url: "https://host".into(),
            token: "abc".into(),
            require_ssl: true,
            ca_bundle: None,
            azure_resource_group: None,
        }
    }

    #[test]
    fn token_secret_encodes_token() {
        let secret = token_secret("c1", "registrar-config", "abc");
        let value = serde_json::to_value(&secret).unwrap();
        assert_eq!(value["data"]["saToken"], "YWJj");
        assert_eq!(value["type"], "Opaque");
        assert_eq!(value["metadata"]["namespace"], "registrar-config");
    }

    #[test]
    fn remote_cluster_references_token_secret() {
        let secret = token_secret("c1", "registrar-config", "abc");
        let cluster = remote_cluster(&fields(), "registrar-system", &secret);
        assert_eq!(cluster.spec.service_account_secret_ref.name, "c1");
        assert_eq!(
            cluster.spec.service_account_secret_ref.namespace,
            "registrar-config"
        );
        assert_eq!(cluster.metadata.namespace.as_deref(), Some("registrar-system"));
        assert_eq!(cluster.spec.url, "https://host");
        assert!(!cluster.spec.insecure);
        assert!(!cluster.spec.is_host_cluster);
    }

    #[test]
    fn remote_cluster_encodes_ca_bundle() {
        let mut fields = fields();
        fields.require_ssl = false;
        fields.ca_bundle = Some("ca-pem".into());
        let secret = token_secret("c1", "registrar-config", "abc");
        let cluster = remote_cluster(&fields, "registrar-system", &secret);
        assert!(cluster.spec.insecure);
        assert_eq!(
            cluster.spec.ca_bundle.as_deref(),
            Some(BASE64_STANDARD.encode("ca-pem").as_str())
        );
    }

    #[test]
    fn registry_entry_records_server_address() {
        let entry = registry_entry("c1", "registrar-system", "https://host");
        assert_eq!(
            entry.spec.kubernetes_api_endpoints.server_endpoints,
            vec![ServerEndpoint {
                server_address: "https://host".into()
            }]
        );
        assert_eq!(entry.metadata.name.as_deref(), Some("c1"));
    }
}
