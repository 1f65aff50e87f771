//! Server command implementation

use anyhow::{Context, Result};

use renew_core::{Config, SubscriptionStore};
use renew_server::ServerConfig;

pub async fn cmd_serve(
    store: SubscriptionStore,
    config: &Config,
    host: &str,
    port: u16,
) -> Result<()> {
    println!("🚀 Starting Renew web server...");
    println!("   Store: {}", store.path().display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Default spend mode: {}", config.spend_mode);

    let server_config = ServerConfig::from(config);
    if server_config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", server_config.allowed_origins.join(", "));
    }

    renew_server::serve(store, host, port, server_config)
        .await
        .context("Server error")
}
