use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::export_dto::HtmlToPdfPayload,
    error::Result,
    middleware::auth::Claims,
    models::resume_stat::STAT_PDF_DOWNLOAD,
    routes::extract::{Json, Path},
    AppState,
};

fn pdf_response(buffer: Vec<u8>, filename: &str) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    )
}

/// Export an owned resume as PDF through its signed print view
#[utoipa::path(
    get,
    path = "/api/export-pdf/{id}",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Resume not found"),
        (status = 500, description = "Browser failed to print")
    )
)]
#[axum::debug_handler]
pub async fn export_pdf(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let resume = state.resume_service.get_owned(id, user_id).await?;

    let buffer = state.pdf_service.print_resume(resume.id).await?;
    state
        .stats_service
        .increment_quietly(resume.id, STAT_PDF_DOWNLOAD)
        .await;

    tracing::info!(resume_id = %resume.id, bytes = buffer.len(), "resume exported as PDF");
    Ok(pdf_response(buffer, "resume.pdf"))
}

/// Print arbitrary HTML supplied by the editor
#[utoipa::path(
    post,
    path = "/api/export-html-as-pdf",
    request_body = HtmlToPdfPayload,
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 400, description = "Missing HTML"),
        (status = 500, description = "Browser failed to print")
    )
)]
#[axum::debug_handler]
pub async fn export_html_as_pdf(
    State(state): State<AppState>,
    Json(payload): Json<HtmlToPdfPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let buffer = state.pdf_service.print_html(&payload.html).await?;
    Ok(pdf_response(buffer, "download.pdf"))
}
