/// Add/edit status values shared with the store layer
pub mod add_edit;
pub mod api;
pub mod manifest;
pub mod registrar;
pub mod settings;
pub mod state;

/// Log and trace integrations
pub mod telemetry;

/// Metrics
mod metrics;
pub use metrics::Metrics;
