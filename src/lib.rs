pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod templates;
pub mod utils;

use crate::config::AppConfig;
use crate::services::converter::AudioConverter;
use crate::services::download_service::DownloadService;
use crate::services::provider::MediaProvider;
use crate::services::watcher::CompletionWatcher;
use crate::templates::Templates;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::home::home,
        api::handlers::health::health_check,
        api::handlers::search::search,
        api::handlers::download::download,
    ),
    components(
        schemas(
            models::SearchRequest,
            models::SearchResponse,
            models::SearchResult,
            models::DownloadRequest,
            models::MessageResponse,
            models::StoredFile,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "media", description = "Search and audio download endpoints"),
        (name = "pages", description = "HTML pages"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn MediaProvider>,
    pub converter: Arc<dyn AudioConverter>,
    pub downloads: Arc<DownloadService>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn MediaProvider>,
        converter: Arc<dyn AudioConverter>,
    ) -> anyhow::Result<Self> {
        let watcher = CompletionWatcher::new(config.watch_interval(), config.download_timeout());
        let downloads = Arc::new(DownloadService::new(
            provider.clone(),
            converter.clone(),
            watcher,
            config.downloads_dir.clone(),
        ));
        let templates = Arc::new(Templates::new()?);

        Ok(Self {
            config,
            provider,
            converter,
            downloads,
            templates,
        })
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .expose_headers(Any)
}

pub fn create_app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::home::home))
        .route("/health", get(api::handlers::health::health_check))
        .route("/search", post(api::handlers::search::search))
        .route("/download", post(api::handlers::download::download))
        .nest_service("/downloads", ServeDir::new(&state.config.downloads_dir))
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(trace_layer)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .with_state(state)
}
