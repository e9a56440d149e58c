pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::handlers::{assets, upload};
use crate::api::middleware::request_id::{REQUEST_ID_HEADER, request_id_middleware};
use crate::config::ServiceConfig;
use crate::services::analysis_service::AnalysisService;
use crate::services::analyzer::{DocumentAnalyzer, SubprocessAnalyzer};
use crate::services::staging::UploadStager;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(api::handlers::upload::upload_document),
    components(schemas(
        models::UploadRequest,
        models::UploadResponse,
        models::ErrorResponse,
    )),
    tags(
        (name = "analysis", description = "Financial report upload and metric extraction")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisService>,
    pub config: ServiceConfig,
}

impl AppState {
    /// Wire the pipeline with the given analyzer
    pub fn new(config: ServiceConfig, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        let stager = UploadStager::new(config.staging_dir.clone(), config.retain_staged_files);
        Self {
            analysis: Arc::new(AnalysisService::new(stager, analyzer)),
            config,
        }
    }

    /// Wire the pipeline with the configured external extractor
    pub fn from_config(config: ServiceConfig) -> Self {
        let analyzer = Arc::new(SubprocessAnalyzer::from_config(&config));
        Self::new(config, analyzer)
    }
}

pub fn create_app(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new();
    if state.config.enable_swagger {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
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

    router
        .route("/", get(assets::index).fallback(assets::not_found))
        .route("/index.html", get(assets::index).fallback(assets::not_found))
        .route(
            "/client.js",
            get(assets::client_script).fallback(assets::not_found),
        )
        .route(
            "/upload",
            post(upload::upload_document).fallback(assets::not_found),
        )
        .fallback(assets::not_found)
        .layer(trace_layer)
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        .with_state(state)
}
