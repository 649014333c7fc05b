use std::sync::Arc;

use tracing::info;

use stayhub::auth::{AuthPolicy, AuthService, TokenIssuer};
use stayhub::db::SqliteAccountStore;
use stayhub::notify::spawn_mailer;
use stayhub::web::WebServer;
use stayhub::{Config, Database, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    stayhub::logging::init(&config.logging)?;

    info!("Stayhub - property owner authentication service");

    let db = Database::open(&config.database.path).await?;
    let store = Arc::new(SqliteAccountStore::new(db.pool().clone()));
    let mailer = Arc::new(spawn_mailer(config.mailer.clone()));
    let tokens = TokenIssuer::new(&config.jwt);
    let policy = AuthPolicy::from(&config.auth);
    let auth = Arc::new(AuthService::new(store, mailer, tokens, policy));

    let server = WebServer::new(&config.server, auth)?;
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );
    server.run().await
}
