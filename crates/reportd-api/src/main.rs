mod api_doc;
mod dispatch;
mod error;
mod handlers;
mod services;
mod setup;
mod state;
mod telemetry;

use reportd_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (catalog, registry, routes)
    let (_state, router) = crate::setup::initialize_app(&config)?;

    // Start the server
    crate::setup::server::start_server(&config, router).await?;

    Ok(())
}
