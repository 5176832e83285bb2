//! Application state.
//!
//! The catalog and registry are immutable after startup; handlers share
//! them through an `Arc`. The mail sender is deliberately not part of the
//! state: each request that needs mail constructs its own sender.

use std::sync::Arc;
use std::time::Duration;

use reportd_catalog::{Catalog, GeneratorRegistry};
use reportd_core::OrgDirectory;

/// SMTP settings used to construct a per-request mail sender.
#[derive(Clone)]
pub struct MailSettings {
    pub account: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub send_timeout: Duration,
}

/// Main application state shared by all handlers.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub registry: Arc<GeneratorRegistry>,
    pub orgs: Arc<dyn OrgDirectory>,
    /// Wall-clock ceiling for a single generator invocation.
    pub request_timeout: Duration,
    /// SMTP settings when mail mode is enabled.
    pub mail: Option<MailSettings>,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
