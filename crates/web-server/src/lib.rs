use analytics::{MetricsEngine, ReportOptions};
use axum::{
    Router,
    routing::{get, post},
};
use configuration::settings::Settings;
use core_types::Table;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use error::AppError;

/// The shared application state that all handlers can access.
///
/// The table is loaded on first use. If the file is missing, the failure is
/// returned to the client and the next request tries again.
pub struct AppState {
    pub data_path: PathBuf,
    pub engine: MetricsEngine,
    pub report_options: ReportOptions,
    pub default_country_count: usize,
    table: RwLock<Option<Arc<Table>>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            data_path: settings.dataset.path.clone(),
            engine: MetricsEngine::with_thresholds(settings.thresholds),
            report_options: ReportOptions {
                top_k: settings.report.top_k,
                sample_size: settings.report.sample_size,
            },
            default_country_count: settings.server.default_country_count,
            table: RwLock::new(None),
        }
    }

    /// State with a table already in memory. Useful when the caller loaded it itself.
    pub fn preloaded(settings: &Settings, table: Table) -> Self {
        let state = Self::new(settings);
        Self {
            table: RwLock::new(Some(Arc::new(table))),
            ..state
        }
    }

    /// The current table, loading it from disk if no load has succeeded yet.
    pub async fn table(&self) -> Result<Arc<Table>, AppError> {
        if let Some(table) = self.table.read().await.as_ref() {
            return Ok(Arc::clone(table));
        }
        self.reload().await
    }

    /// Reads the dataset file again and replaces the shared table.
    pub async fn reload(&self) -> Result<Arc<Table>, AppError> {
        let mut guard = self.table.write().await;
        let path = self.data_path.clone();
        let table = tokio::task::spawn_blocking(move || dataset::load_table(&path)).await??;
        let table = Arc::new(table);
        *guard = Some(Arc::clone(&table));
        Ok(table)
    }
}

/// Builds the dashboard API routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/countries", get(handlers::get_countries))
        .route("/api/kpis", get(handlers::get_kpis))
        .route("/api/map", get(handlers::get_map))
        .route("/api/trend", get(handlers::get_trend))
        .route("/api/correlation", get(handlers::get_correlation))
        .route("/api/scatter", get(handlers::get_scatter))
        .route("/api/records", get(handlers::get_records))
        .route("/api/report", get(handlers::get_report))
        .route("/api/reload", post(handlers::reload))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the dashboard server.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    // Tracing is initialized by the binary; a failed first load is not fatal here.
    if let Err(e) = state.table().await {
        tracing::warn!(error = %e, "Dataset not loaded yet; requests will retry.");
    }

    let app = router(state);

    tracing::info!("Dashboard API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
