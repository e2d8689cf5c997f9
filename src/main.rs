use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use anyhow::Result;
use budget_tracker::application::auth_service::AuthService;
use budget_tracker::application::budget_service::BudgetService;
use budget_tracker::data::file::JsonFileStore;
use budget_tracker::data::memory::MemoryStore;
use budget_tracker::domain::credentials::CredentialVerifier;
use budget_tracker::domain::repository::{EntryStore, ProfileStore};
use budget_tracker::infrastructure::config::{AppConfig, StorageKind};
use budget_tracker::infrastructure::logging::init_logging;
use budget_tracker::infrastructure::security::ArgonJwtVerifier;
use budget_tracker::presentation::api_routes;
use budget_tracker::presentation::handlers::AppState;
use budget_tracker::presentation::middleware::RequestTrace;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    info!(storage = ?config.storage, "Configuration loaded");

    let (profiles, entries): (Arc<dyn ProfileStore>, Arc<dyn EntryStore>) = match config.storage {
        StorageKind::Memory => {
            let store = Arc::new(MemoryStore::new());
            (store.clone() as Arc<dyn ProfileStore>, store as Arc<dyn EntryStore>)
        }
        StorageKind::File => {
            info!(path = %config.data_file.display(), "Using file-backed store");
            let store = Arc::new(JsonFileStore::open(&config.data_file).await?);
            (store.clone() as Arc<dyn ProfileStore>, store as Arc<dyn EntryStore>)
        }
    };

    let credentials: Arc<dyn CredentialVerifier> = Arc::new(ArgonJwtVerifier::new(
        config.jwt_secret.clone(),
        config.token_ttl_secs,
    ));

    let state = web::Data::new(AppState {
        auth: Arc::new(AuthService::new(profiles.clone(), credentials)),
        budget: Arc::new(BudgetService::new(profiles, entries)),
        started_at: Instant::now(),
    });

    let bind_addr = (config.host.clone(), config.port);
    info!(host = %config.host, port = config.port, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestTrace)
            .configure(api_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
