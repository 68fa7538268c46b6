use std::env;
use std::time::Duration;

use crate::add_edit::{ADD_EDIT_POLL_INTERVAL, ADD_EDIT_WATCH_TIMEOUT};

/// Namespace context and watch timing for the registrar.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Namespace holding registry entries and cluster descriptors
    pub namespace: String,
    /// Namespace holding credential secrets
    pub config_namespace: String,
    pub poll_interval: Duration,
    pub watch_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            namespace: String::from("registrar-system"),
            config_namespace: String::from("registrar-config"),
            poll_interval: ADD_EDIT_POLL_INTERVAL,
            watch_timeout: ADD_EDIT_WATCH_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            namespace: env::var("REGISTRAR_NAMESPACE").unwrap_or(defaults.namespace),
            config_namespace: env::var("REGISTRAR_CONFIG_NAMESPACE")
                .unwrap_or(defaults.config_namespace),
            poll_interval: duration_var("REGISTRAR_POLL_INTERVAL_SECS")
                .unwrap_or(defaults.poll_interval),
            watch_timeout: duration_var("REGISTRAR_WATCH_TIMEOUT_SECS")
                .unwrap_or(defaults.watch_timeout),
        }
    }
}

fn duration_var(key: &str) -> Option<Duration> {
    env::var(key).ok()?.parse().ok().map(Duration::from_secs)
}
