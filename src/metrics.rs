use prometheus::{IntCounterVec, Opts, Registry};

use crate::add_edit::AddEditStatus;

#[derive(Clone)]
pub struct Metrics {
    pub registrations: IntCounterVec,
    pub status_changes: IntCounterVec,
}

impl Default for Metrics {
    fn default() -> Self {
        let registrations = IntCounterVec::new(
            Opts::new(
                "registrar_cluster_registrations_total",
                "Cluster registration attempts by outcome",
            ),
            &["outcome"],
        )
        .unwrap();
        let status_changes = IntCounterVec::new(
            Opts::new(
                "registrar_add_edit_status_changes_total",
                "Add/edit status transitions by resulting state",
            ),
            &["state"],
        )
        .unwrap();
        Self {
            registrations,
            status_changes,
        }
    }
}

impl Metrics {
    /// Register API metrics to start tracking them.
    pub fn register(self, registry: &Registry) -> Result<Self, prometheus::Error> {
        registry.register(Box::new(self.registrations.clone()))?;
        registry.register(Box::new(self.status_changes.clone()))?;
        Ok(self)
    }

    pub fn registration(&self, outcome: &str) {
        self.registrations.with_label_values(&[outcome]).inc();
    }

    pub fn status_change(&self, status: &AddEditStatus) {
        self.status_changes
            .with_label_values(&[status.state.metric_label().as_str()])
            .inc();
    }
}
