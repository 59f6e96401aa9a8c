use axum::{
    extract::State,
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::{
    dto::{resume_dto::OkResponse, stats_dto::RecordStatPayload},
    error::Result,
    middleware::auth::Claims,
    routes::extract::Json,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/stats",
    request_body = RecordStatPayload,
    responses(
        (status = 200, description = "Counter incremented", body = OkResponse),
        (status = 400, description = "Missing type or resume_id"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn record_stat(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RecordStatPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let resume = state
        .resume_service
        .get_owned(payload.resume_id, user_id)
        .await?;
    state
        .stats_service
        .increment(resume.id, payload.stat_type.trim())
        .await?;
    Ok(Json(OkResponse::ok()))
}
