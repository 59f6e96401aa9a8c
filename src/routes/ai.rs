use axum::{
    extract::State,
    response::IntoResponse,
    Extension,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{
    dto::ai_dto::{AnalyzeRequest, JdMatch, JdMatchRequest, ResumeAnalysis},
    error::{Error, Result},
    middleware::auth::Claims,
    routes::extract::Json,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/ai/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Resume analysis; may carry is_cached or is_fallback flags", body = ResumeAnalysis),
        (status = 400, description = "Missing resumeContent"),
        (status = 404, description = "resumeId does not belong to the caller")
    )
)]
#[axum::debug_handler]
pub async fn analyze(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse> {
    let content = require_content(payload.resume_content)?;
    let resume_id = ensure_owned(&state, &claims, payload.resume_id).await?;
    let result = state
        .analysis_service
        .analyze_resume(&content, resume_id, payload.force_reanalyze)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/ai/jd-match",
    request_body = JdMatchRequest,
    responses(
        (status = 200, description = "Match of the resume against a job description", body = JdMatch),
        (status = 400, description = "Missing resumeContent or jdText"),
        (status = 404, description = "resumeId does not belong to the caller")
    )
)]
#[axum::debug_handler]
pub async fn jd_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<JdMatchRequest>,
) -> Result<impl IntoResponse> {
    let content = require_content(payload.resume_content)?;
    let jd_text = payload
        .jd_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::BadRequest("Missing resume content or JD text".into()))?;
    let resume_id = ensure_owned(&state, &claims, payload.resume_id).await?;
    let result = state
        .analysis_service
        .match_job_description(&content, &jd_text, resume_id, payload.force_reanalyze)
        .await?;
    Ok(Json(result))
}

fn require_content(content: Option<JsonValue>) -> Result<JsonValue> {
    content
        .filter(|c| !c.is_null())
        .ok_or_else(|| Error::BadRequest("Missing resume content".into()))
}

/// Analyses are only cached against resumes the caller owns.
async fn ensure_owned(state: &AppState, claims: &Claims, resume_id: Option<Uuid>) -> Result<Option<Uuid>> {
    match resume_id {
        Some(id) => {
            let user_id = claims.user_id()?;
            let resume = state.resume_service.get_owned(id, user_id).await?;
            Ok(Some(resume.id))
        }
        None => Ok(None),
    }
}
