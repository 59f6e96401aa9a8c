pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::error::Result;
use crate::services::{
    ai_service::{LlmProvider, OpenAiCompatibleProvider},
    analysis_service::{AnalysisService, PgAnalysisCache},
    pdf_service::PdfService,
    profile_service::ProfileService,
    render_service::RenderService,
    resume_service::ResumeService,
    share_service::ShareService,
    stats_service::StatsService,
    storage_service::StorageService,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resume_service: ResumeService,
    pub share_service: ShareService,
    pub stats_service: StatsService,
    pub profile_service: ProfileService,
    pub analysis_service: AnalysisService,
    pub render_service: RenderService,
    pub pdf_service: PdfService,
    pub storage_service: StorageService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Result<Self> {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        let provider = OpenAiCompatibleProvider::new(
            config.ai_provider,
            config.ai_api_key.clone(),
            http_client,
        );
        Self::with_provider(pool, Arc::new(provider))
    }

    /// Same wiring as [`AppState::new`] with the model backend swapped out.
    pub fn with_provider(pool: PgPool, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        let config = crate::config::get_config();
        let cache = Arc::new(PgAnalysisCache::new(pool.clone()));

        Ok(Self {
            resume_service: ResumeService::new(pool.clone()),
            share_service: ShareService::new(pool.clone(), config.site_url.clone()),
            stats_service: StatsService::new(pool.clone()),
            profile_service: ProfileService::new(pool.clone()),
            analysis_service: AnalysisService::new(provider, cache),
            render_service: RenderService::new()?,
            pdf_service: PdfService::new(
                config.chrome_bin.clone(),
                config.site_url.clone(),
                config.render_secret.clone(),
            ),
            storage_service: StorageService::new(&config.uploads_dir, &config.site_url),
            pool,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let config = crate::config::get_config();

    let public_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api-docs/openapi.json", get(routes::docs::openapi_json))
        .route("/api/share/:share_uuid", get(routes::share::get_shared))
        .route("/s/:share_uuid", get(routes::share::shared_page))
        .route("/render/:id", get(routes::render::render_resume))
        .route("/render-page/:token", get(routes::render::render_staged_page));

    let authed_routes = Router::new()
        .route(
            "/api/resumes",
            get(routes::resumes::list_resumes).post(routes::resumes::create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(routes::resumes::get_resume)
                .patch(routes::resumes::update_resume)
                .delete(routes::resumes::delete_resume),
        )
        .route(
            "/api/resumes/:id/versions",
            get(routes::resumes::list_versions),
        )
        .route(
            "/api/resumes/:id/versions/:version_id/restore",
            post(routes::resumes::restore_version),
        )
        .route(
            "/api/resumes/:id/stats",
            get(routes::resumes::list_resume_stats),
        )
        .route("/api/share", post(routes::share::create_share))
        .route("/api/stats", post(routes::stats::record_stat))
        .route("/api/ai/analyze", post(routes::ai::analyze))
        .route("/api/ai/jd-match", post(routes::ai::jd_match))
        .route("/api/export-pdf/:id", get(routes::export::export_pdf))
        .route(
            "/api/export-html-as-pdf",
            post(routes::export::export_html_as_pdf),
        )
        .route(
            "/api/profile",
            get(routes::profile::get_profile).post(routes::profile::update_profile),
        )
        .route(
            "/api/profile/avatar",
            post(routes::profile::upload_avatar),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ));

    tracing::info!("Serving uploads from: {}", config.uploads_dir);

    public_routes
        .merge(authed_routes)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .with_state(state)
        .layer(middleware::cors::site_cors(&config.site_origin))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
