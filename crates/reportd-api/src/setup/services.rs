//! Service initialization: catalog discovery, generator registration, and
//! shared state construction.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reportd_catalog::{Catalog, GeneratorRegistry, GeneratorRegistryBuilder};
use reportd_core::{Config, MemoryOrgDirectory};

use crate::state::{AppState, MailSettings};

/// Build the catalog, registry, and shared application state.
pub fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let catalog = Catalog::build(config.reports_dir()).with_context(|| {
        format!(
            "Failed to build report catalog from {}",
            config.reports_dir().display()
        )
    })?;
    tracing::info!(reports = catalog.len(), dir = %config.reports_dir().display(), "Report catalog built");

    let registry = register_generators(GeneratorRegistry::builder()).build();
    for id in catalog.list_ids() {
        if !registry.contains(&id) {
            // Requests for this report will fail with a drift error until a
            // generator is registered for it.
            tracing::warn!(report = %id, "Catalog entry has no registered generator");
        }
    }

    let mail = config.smtp_credentials().map(|(account, password)| MailSettings {
        account: account.to_string(),
        password: password.to_string(),
        host: config.smtp_host().to_string(),
        port: config.smtp_port(),
        send_timeout: Duration::from_secs(config.mail_send_timeout_secs()),
    });
    if mail.is_none() {
        tracing::info!("SMTP credentials not configured; mail delivery disabled");
    }

    Ok(Arc::new(AppState {
        catalog: Arc::new(catalog),
        registry: Arc::new(registry),
        orgs: Arc::new(MemoryOrgDirectory::new()),
        request_timeout: Duration::from_secs(config.request_timeout_secs()),
        mail,
    }))
}

/// Registration table for report generators. Deployments add their
/// generators here; ids must match the catalog file stems.
fn register_generators(builder: GeneratorRegistryBuilder) -> GeneratorRegistryBuilder {
    builder
}
