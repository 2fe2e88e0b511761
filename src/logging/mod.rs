//! Structured logging for the sprint core.
//!
//! Provides tracing initialization with level-based filtering plus the
//! injected debug-sink contract the gameplay systems report errors through
//! (no global engine singletons).

use std::sync::{Arc, Mutex, Once};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Configuration for tracing initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: String,
    pub module_filters: Vec<(String, String)>,
    pub show_targets: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            module_filters: vec![
                ("sprint_core::progression".to_string(), "info".to_string()),
                ("sprint_core::grapple".to_string(), "warn".to_string()),
            ],
            show_targets: true,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.clone()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{module}={level}"));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing with default settings (idempotent — safe to call multiple times)
pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Initialize tracing with custom config (idempotent — first call wins)
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let with_targets = config.show_targets;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(with_targets)
            .compact();

        // Ignore error if a global subscriber is already set (e.g., by Bevy)
        let _ = subscriber.try_init();
    });
}

/// On-screen/debug error sink. The duration hint mirrors host-engine debug
/// overlays that display a message for a number of seconds; sinks without a
/// screen are free to ignore it.
pub trait DebugSink: Send + Sync {
    fn log_error(&self, message: &str, duration_hint_secs: f32);
}

/// Default sink routing errors into tracing
#[derive(Debug, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn log_error(&self, message: &str, duration_hint_secs: f32) {
        tracing::error!(
            target: "sprint_core",
            duration_hint_secs,
            "{message}"
        );
    }
}

/// Recording sink for assertions in tests and headless diagnostics
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink poisoned").clone()
    }
}

impl DebugSink for MemorySink {
    fn log_error(&self, message: &str, _duration_hint_secs: f32) {
        self.messages
            .lock()
            .expect("sink poisoned")
            .push(message.to_string());
    }
}
