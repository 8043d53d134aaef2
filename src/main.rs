use astra::Server;
use listing_desk::api::ApiClient;
use listing_desk::app::App;
use listing_desk::config::AppConfig;
use listing_desk::db::{init_db, Database, KeyValueStore};
use listing_desk::notify::{EmailJsRelay, NotificationDispatcher};
use listing_desk::responses::error_to_response;
use listing_desk::router::handle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(cfg.db_path.clone());
    if let Err(e) = init_db(&db) {
        error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    let api = match ApiClient::new(&cfg.api_base_url, cfg.api_timeout) {
        Ok(api) => Some(api),
        Err(e) => {
            warn!(base = %cfg.api_base_url, error = %e, "backend client unavailable, running local-only");
            None
        }
    };

    let relay = EmailJsRelay::new(cfg.relay.clone(), cfg.api_timeout);
    let notifier = Arc::new(NotificationDispatcher::new(Box::new(relay), cfg.notify.clone()));

    let app = App::new(
        KeyValueStore::new(db),
        &cfg.notify.admin_email,
        notifier,
        api,
        StdRng::from_entropy(),
    );

    info!("Starting server at http://{}", cfg.bind_addr);
    let server = Server::bind(&cfg.bind_addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
