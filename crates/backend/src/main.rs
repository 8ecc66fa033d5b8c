pub mod api;
pub mod dashboards;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::sync::Arc;

use shared::config::{load_config, resolve_path, Config};
use shared::data::kv_store::{KeyValueStore, SeaOrmKeyValueStore};
use shared::sheets::GoogleSheetsClient;
use system::state::{AppState, SharedState};

/// Собрать состояние приложения: хранилище, клиент Google и начальные данные
async fn build_state(config: &Config) -> anyhow::Result<SharedState> {
    let conn = shared::data::db::get_connection()?.clone();
    let kv_store = SeaOrmKeyValueStore::new(conn);
    kv_store.ensure_table().await?;
    let store: Arc<dyn KeyValueStore> = Arc::new(kv_store);
    let remote = Arc::new(GoogleSheetsClient::new(&config.google)?);

    let state = AppState::new(store.clone(), remote)
        .with_channel_columns(config.import.channel_columns())
        .with_monthly_reach_sheet(
            config.google.default_spreadsheet_id.clone(),
            config.google.default_sheet_name.clone(),
        );

    if let Some(path) = config.seed.use_cases_path.as_deref() {
        match domain::a001_use_case::service::load_seed(&resolve_path(path)) {
            Ok(use_cases) => state.replace_use_cases(use_cases).await,
            Err(e) => tracing::warn!("Seed not loaded: {:#}", e),
        }
    } else {
        tracing::info!("No seed file configured, starting with an empty portfolio");
    }

    match domain::a002_reporting_data::repository::load(store.as_ref()).await {
        Ok(rows) => {
            tracing::info!("Loaded {} stored reporting row(s)", rows.len());
            state.replace_reporting_data(rows).await;
        }
        Err(e) => tracing::warn!("Stored reporting data not loaded: {:#}", e),
    }

    Ok(state.into_shared())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;

    system::tracing::initialize()?;

    let config = load_config()?;

    // Initialize database
    let db_path = resolve_path(&config.database.path)
        .to_string_lossy()
        .into_owned();
    shared::data::db::initialize_database(Some(db_path.as_str()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let state = build_state(&config).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let static_dir = resolve_path(&config.server.static_dir);
    tracing::info!("Serving static files from {}", static_dir.display());

    let app = routes::configure_routes(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Server listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
