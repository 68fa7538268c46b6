use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::add_edit::{AddEditMode, AddEditState, AddEditStatus};
use crate::api::remote_cluster::RemoteCluster;
use crate::settings::Settings;
use crate::telemetry;

use super::RegistrationClient;

pub static READY_CONDITION: &str = "Ready";
pub static CRITICAL_CONDITION: &str = "Critical";

/// The single outcome of one watch race.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaceOutcome {
    StatusUpdate(AddEditStatus),
    TimedOut,
    Cancelled,
}

impl RemoteCluster {
    /// Resolved add/edit status of the descriptor, if its conditions carry a
    /// terminal one. `Critical` is inspected before `Ready`.
    pub fn add_edit_status(&self) -> Option<AddEditStatus> {
        let conditions = self.status.as_ref()?.conditions.as_deref()?;
        let holds = |type_: &str| {
            conditions
                .iter()
                .any(|c| c.type_ == type_ && c.status == "True")
        };

        if holds(CRITICAL_CONDITION) {
            return Some(AddEditStatus::new(AddEditState::Critical, AddEditMode::Edit));
        }
        if holds(READY_CONDITION) {
            return Some(AddEditStatus::new(AddEditState::Ready, AddEditMode::Edit));
        }
        None
    }
}

/// Supervises one cluster registration: races the status poll loop against
/// the watch timeout and an explicit cancellation. Exactly one outcome is
/// produced per invocation; on a tie the precedence is cancel over timeout
/// over poll result.
#[instrument(skip_all, fields(trace_id = display(telemetry::get_trace_id()), name = %cluster_name))]
pub(crate) async fn watch_race<C: RegistrationClient>(
    client: C,
    settings: Settings,
    cluster_name: String,
    cancel: broadcast::Receiver<()>,
) -> (String, RaceOutcome) {
    let poll = poll_add_edit_status(&client, &settings, &cluster_name);
    tokio::pin!(poll);

    let outcome = tokio::select! {
        biased;
        () = cancelled(cancel) => RaceOutcome::Cancelled,
        () = sleep(settings.watch_timeout) => RaceOutcome::TimedOut,
        status = &mut poll => RaceOutcome::StatusUpdate(status),
    };

    debug!(outcome = ?outcome, "watch race finished");
    (cluster_name.clone(), outcome)
}

/// Fetches the descriptor status on a fixed interval until it resolves. A
/// failed fetch ends the polling; the enclosing race then resolves through
/// its timeout or cancellation arm instead.
async fn poll_add_edit_status<C: RegistrationClient>(
    client: &C,
    settings: &Settings,
    cluster_name: &str,
) -> AddEditStatus {
    loop {
        match client
            .get_remote_cluster(&settings.namespace, cluster_name)
            .await
        {
            Ok(cluster) => {
                if let Some(status) = cluster.add_edit_status() {
                    return status;
                }
            }
            Err(error) => {
                debug!(name = %cluster_name, %error, "status poll ended");
                futures::future::pending::<()>().await;
            }
        }

        sleep(settings.poll_interval).await;
    }
}

async fn cancelled(mut cancel: broadcast::Receiver<()>) {
    loop {
        match cancel.recv().await {
            // A lagged receiver still observed a cancellation.
            Ok(()) | Err(RecvError::Lagged(_)) => return,
            Err(RecvError::Closed) => futures::future::pending::<()>().await,
        }
    }
}
