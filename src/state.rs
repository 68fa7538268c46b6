use std::sync::Arc;

use chrono::{DateTime, Utc};
use kube::client::Client;
use kube::runtime::events::{Recorder, Reporter};
use kube::ResourceExt;
use serde::Serialize;
use tokio::sync::mpsc::{error::SendError, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::add_edit::AddEditStatus;
use crate::registrar::{Context, RegistrarEvent, RegistrarSignal};
use crate::Metrics;

/// Diagnostics to be exposed by the web server
#[derive(Clone, Serialize)]
pub struct Diagnostics {
    pub last_event: DateTime<Utc>,
    #[serde(skip)]
    pub reporter: Reporter,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            last_event: Utc::now(),
            reporter: "cluster-registrar".into(),
        }
    }
}

impl Diagnostics {
    pub(crate) fn recorder(&self, client: Client) -> Recorder {
        Recorder::new(client, self.reporter.clone())
    }
}

/// State shared between the registrar and the web server. Holds the single
/// mutable add/edit status, replaced wholesale by the event apply loop.
#[derive(Clone)]
pub struct State {
    diagnostics: Arc<RwLock<Diagnostics>>,
    status: Arc<RwLock<AddEditStatus>>,
    registry: prometheus::Registry,
    metrics: Metrics,
    signals: UnboundedSender<RegistrarSignal>,
}

impl State {
    pub fn new(signals: UnboundedSender<RegistrarSignal>) -> Self {
        let registry = prometheus::Registry::default();
        let metrics = Metrics::default().register(&registry).unwrap();
        Self {
            diagnostics: Arc::new(RwLock::new(Diagnostics::default())),
            status: Arc::new(RwLock::new(AddEditStatus::default())),
            registry,
            metrics,
            signals,
        }
    }

    /// Metrics getter
    pub fn metrics(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// State getter
    pub async fn diagnostics(&self) -> Diagnostics {
        self.diagnostics.read().await.clone()
    }

    pub async fn add_edit_status(&self) -> AddEditStatus {
        *self.status.read().await
    }

    /// Hand a signal to the registrar dispatcher.
    pub fn submit(&self, signal: RegistrarSignal) -> Result<(), SendError<RegistrarSignal>> {
        self.signals.send(signal)
    }

    // Create a registrar Context that can update State diagnostics
    pub fn to_context(&self, client: Client) -> Context {
        Context {
            client,
            diagnostics: self.diagnostics.clone(),
        }
    }

    /// The store side of the registrar: applies emitted events to the shared
    /// state and records them in the metrics.
    pub async fn apply_events(&self, mut events: UnboundedReceiver<RegistrarEvent>) {
        while let Some(event) = events.recv().await {
            self.diagnostics.write().await.last_event = Utc::now();
            match event {
                RegistrarEvent::AddClusterSucceeded(result) => {
                    info!(name = %result.remote_cluster.name_any(), "cluster registered");
                    self.metrics.registration("succeeded");
                }
                RegistrarEvent::UpdateClusterSucceeded(result) => {
                    info!(name = %result.remote_cluster.name_any(), "cluster registration updated");
                    self.metrics.registration("updated");
                }
                RegistrarEvent::AddClusterFailed { message } => {
                    warn!(%message, "cluster registration failed");
                    self.metrics.registration("failed");
                }
                RegistrarEvent::UpdateClusterFailed { message } => {
                    warn!(%message, "cluster registration update failed");
                    self.metrics.registration("update_failed");
                }
                RegistrarEvent::ClusterAddEditStatusChanged(status) => {
                    self.metrics.status_change(&status);
                    *self.status.write().await = status;
                }
                RegistrarEvent::WatchAddClusterRequested { cluster_name } => {
                    debug!(name = %cluster_name, "watching cluster registration");
                }
            }
        }
    }
}
