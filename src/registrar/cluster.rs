use tracing::instrument;

use crate::manifest::{self, ClusterFields};
use crate::settings::Settings;
use crate::telemetry;

use super::{CreateError, CreationResult, RegistrationClient, UpdateError, UpdateResult};

/// Registers a cluster by creating the registry entry, the token secret and
/// the cluster descriptor. The three creates are issued concurrently and all
/// of them settle before the result is aggregated; no ordering is assumed
/// between them. Nothing is rolled back when a subset of the creates
/// succeeds.
#[instrument(skip_all, fields(trace_id = display(telemetry::get_trace_id()), name = %fields.name))]
pub(crate) async fn add_cluster<C: RegistrationClient>(
    client: C,
    settings: Settings,
    fields: ClusterFields,
) -> Result<CreationResult, CreateError> {
    let entry = manifest::registry_entry(&fields.name, &settings.namespace, &fields.url);
    let secret = manifest::token_secret(&fields.name, &settings.config_namespace, &fields.token);
    let cluster = manifest::remote_cluster(&fields, &settings.namespace, &secret);

    let (entry, secret, cluster) = tokio::join!(
        client.create_registry_entry(&entry),
        client.create_token_secret(&secret),
        client.create_remote_cluster(&cluster),
    );

    Ok(CreationResult {
        registry_entry: entry.map_err(CreateError::RegistryEntry)?,
        token_secret: secret.map_err(CreateError::TokenSecret)?,
        remote_cluster: cluster.map_err(CreateError::RemoteCluster)?,
    })
}

/// Updates an existing registration: the token secret and the descriptor are
/// patched concurrently with the desired state rebuilt from the field values.
/// The registry entry is left untouched.
#[instrument(skip_all, fields(trace_id = display(telemetry::get_trace_id()), name = %fields.name))]
pub(crate) async fn update_cluster<C: RegistrationClient>(
    client: C,
    settings: Settings,
    fields: ClusterFields,
) -> Result<UpdateResult, UpdateError> {
    let secret = manifest::token_secret(&fields.name, &settings.config_namespace, &fields.token);
    let cluster = manifest::remote_cluster(&fields, &settings.namespace, &secret);

    let (secret, cluster) = tokio::join!(
        client.update_token_secret(&secret),
        client.update_remote_cluster(&cluster),
    );

    Ok(UpdateResult {
        token_secret: secret.map_err(UpdateError::TokenSecret)?,
        remote_cluster: cluster.map_err(UpdateError::RemoteCluster)?,
    })
}
