//! Shared logging utilities for consistent tracing across binaries and bus instances

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{error, info};

/// Binary a subscriber is installed for; selects the per-crate filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Hub,
    Peer,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Hub => write!(f, "hub"),
            Component::Peer => write!(f, "peer"),
        }
    }
}

/// Filter directives for a component at the given base level
pub fn filter_directives(component: Component, log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");

    match component {
        Component::Hub => {
            format!("hub={base_level},cache={base_level},shared={base_level},tower_http=warn,axum=warn")
        }
        Component::Peer => {
            format!("appconnect_peer={base_level},communicator={base_level},shared={base_level},tungstenite=warn")
        }
    }
}

/// Initialize the tracing subscriber for a binary
///
/// `RUST_LOG` takes precedence over the component defaults when set.
pub fn init_tracing(component: Component, log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(component, log_level)));

    // A second initialisation (tests, embedded use) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for app-aware info logging
#[macro_export]
macro_rules! app_info {
    ($app_id:expr, $($arg:tt)*) => {
        tracing::info!(
            app = %$app_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for app-aware warning logging
#[macro_export]
macro_rules! app_warn {
    ($app_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            app = %$app_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for app-aware error logging
#[macro_export]
macro_rules! app_error {
    ($app_id:expr, $($arg:tt)*) => {
        tracing::error!(
            app = %$app_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for app-aware debug logging
#[macro_export]
macro_rules! app_debug {
    ($app_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            app = %$app_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(component: Component, details: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(component: Component, reason: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(component: Component, context: &str, error: &dyn fmt::Display) {
    error!(
        component = %component,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(component: Component, message: &str) {
    info!(
        component = %component,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
