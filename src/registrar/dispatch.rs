use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::broadcast;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::add_edit::AddEditStatus;
use crate::settings::Settings;

use super::cluster::{add_cluster, update_cluster};
use super::watch::{watch_race, RaceOutcome};
use super::{
    CreateError, CreationResult, RegistrarEvent, RegistrarSignal, RegistrationClient, UpdateError,
    UpdateResult, CLUSTER_CREATE_FAILED_MESSAGE, CLUSTER_UPDATE_FAILED_MESSAGE,
};

type Task<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Pending<T> = Option<(String, Task<T>)>;

enum Step {
    Signal(Option<RegistrarSignal>),
    Added(String, Result<CreationResult, CreateError>),
    Updated(String, Result<UpdateResult, UpdateError>),
    Race(String, RaceOutcome),
}

/// The registrar event loop. Consumes signals, drives at most one in-flight
/// add and one in-flight update, and supervises the active watch races.
///
/// A new add or update request supersedes the in-flight one of the same kind:
/// the pending task is dropped, so a superseded result is never observed. A
/// new watch request does not cancel an active race; only the explicit cancel
/// signal does, and it applies to every active race.
pub async fn run<C>(
    client: C,
    settings: Settings,
    mut signals: UnboundedReceiver<RegistrarSignal>,
    events: UnboundedSender<RegistrarEvent>,
) where
    C: RegistrationClient + Clone + Send + Sync + 'static,
{
    let (cancel_tx, _) = broadcast::channel::<()>(16);
    let mut pending_add: Pending<Result<CreationResult, CreateError>> = None;
    let mut pending_update: Pending<Result<UpdateResult, UpdateError>> = None;
    let mut races: FuturesUnordered<Task<(String, RaceOutcome)>> = FuturesUnordered::new();

    loop {
        let step = tokio::select! {
            biased;
            signal = signals.recv() => Step::Signal(signal),
            (name, result) = settled(&mut pending_add), if pending_add.is_some() => {
                Step::Added(name, result)
            }
            (name, result) = settled(&mut pending_update), if pending_update.is_some() => {
                Step::Updated(name, result)
            }
            Some((name, outcome)) = races.next(), if !races.is_empty() => Step::Race(name, outcome),
        };

        match step {
            Step::Signal(None) => break,

            Step::Signal(Some(RegistrarSignal::AddClusterRequested(fields))) => {
                if pending_add.is_some() {
                    debug!(name = %fields.name, "superseding in-flight cluster creation");
                }
                let name = fields.name.clone();
                let task = Box::pin(add_cluster(client.clone(), settings.clone(), fields));
                pending_add = Some((name, task));
            }

            Step::Signal(Some(RegistrarSignal::UpdateClusterRequested(fields))) => {
                if pending_update.is_some() {
                    debug!(name = %fields.name, "superseding in-flight cluster update");
                }
                let name = fields.name.clone();
                let task = Box::pin(update_cluster(client.clone(), settings.clone(), fields));
                pending_update = Some((name, task));
            }

            Step::Signal(Some(RegistrarSignal::WatchClusterAddEditStatusRequested {
                cluster_name,
            })) => {
                races.push(Box::pin(watch_race(
                    client.clone(),
                    settings.clone(),
                    cluster_name,
                    cancel_tx.subscribe(),
                )));
            }

            Step::Signal(Some(RegistrarSignal::CancelWatchClusterAddEditStatusRequested)) => {
                let _ = cancel_tx.send(());
            }

            Step::Added(cluster_name, Ok(result)) => {
                pending_add = None;
                let _ = events.send(RegistrarEvent::AddClusterSucceeded(result));
                let _ = events.send(RegistrarEvent::ClusterAddEditStatusChanged(
                    AddEditStatus::watching(),
                ));
                let _ = events.send(RegistrarEvent::WatchAddClusterRequested {
                    cluster_name: cluster_name.clone(),
                });
                races.push(Box::pin(watch_race(
                    client.clone(),
                    settings.clone(),
                    cluster_name,
                    cancel_tx.subscribe(),
                )));
            }

            Step::Added(cluster_name, Err(error)) => {
                pending_add = None;
                // Already created resources are left in place.
                warn!(name = %cluster_name, %error, "cluster creation failed");
                let _ = events.send(RegistrarEvent::AddClusterFailed {
                    message: CLUSTER_CREATE_FAILED_MESSAGE.into(),
                });
            }

            Step::Updated(cluster_name, Ok(result)) => {
                pending_update = None;
                let _ = events.send(RegistrarEvent::UpdateClusterSucceeded(result));
                let _ = events.send(RegistrarEvent::ClusterAddEditStatusChanged(
                    AddEditStatus::watching(),
                ));
                let _ = events.send(RegistrarEvent::WatchAddClusterRequested {
                    cluster_name: cluster_name.clone(),
                });
                races.push(Box::pin(watch_race(
                    client.clone(),
                    settings.clone(),
                    cluster_name,
                    cancel_tx.subscribe(),
                )));
            }

            Step::Updated(cluster_name, Err(error)) => {
                pending_update = None;
                warn!(name = %cluster_name, %error, "cluster update failed");
                let _ = events.send(RegistrarEvent::UpdateClusterFailed {
                    message: CLUSTER_UPDATE_FAILED_MESSAGE.into(),
                });
            }

            Step::Race(cluster_name, RaceOutcome::Cancelled) => {
                // Cancellation concludes the race without a status change.
                debug!(name = %cluster_name, "watch cancelled");
            }

            Step::Race(cluster_name, RaceOutcome::TimedOut) => {
                debug!(name = %cluster_name, "watch timed out");
                let _ = events.send(RegistrarEvent::ClusterAddEditStatusChanged(
                    AddEditStatus::timed_out(),
                ));
            }

            Step::Race(cluster_name, RaceOutcome::StatusUpdate(status)) => {
                debug!(name = %cluster_name, state = ?status.state, "watch resolved");
                let _ = events.send(RegistrarEvent::ClusterAddEditStatusChanged(status));
            }
        }
    }
}

async fn settled<T>(slot: &mut Pending<T>) -> (String, T) {
    match slot.as_mut() {
        Some((name, task)) => {
            let result = task.as_mut().await;
            (name.clone(), result)
        }
        // Guarded out by the select precondition.
        None => futures::future::pending().await,
    }
}
