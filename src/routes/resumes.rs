use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        resume_dto::{
            ContentVersionListResponse, ContentVersionResponse, CreateResumePayload, OkResponse,
            ResumeDetailResponse, ResumeListResponse, ResumeResponse, UpdateResumePayload,
        },
        stats_dto::StatListResponse,
    },
    error::Result,
    middleware::auth::Claims,
    routes::extract::{Json, Path},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/resumes",
    responses(
        (status = 200, description = "Resumes owned by the caller, most recently edited first", body = ResumeListResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn list_resumes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let items = state.resume_service.list_for_user(user_id).await?;
    Ok(Json(ResumeListResponse {
        items: items.into_iter().map(ResumeResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/resumes",
    request_body = CreateResumePayload,
    responses(
        (status = 201, description = "Resume created with sample content", body = ResumeResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let resume = state.resume_service.create(user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(ResumeResponse::from(resume))))
}

#[utoipa::path(
    get,
    path = "/api/resumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Resume with its content document", body = ResumeDetailResponse),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn get_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let (resume, content_json) = state.resume_service.get_detail(id, user_id).await?;
    Ok(Json(ResumeDetailResponse {
        resume: resume.into(),
        content_json,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/resumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    request_body = UpdateResumePayload,
    responses(
        (status = 200, description = "Resume saved", body = OkResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn update_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    state.resume_service.update(id, user_id, payload).await?;
    Ok(Json(OkResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/resumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Resume and everything attached to it deleted", body = OkResponse),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    state.resume_service.delete(id, user_id).await?;
    Ok(Json(OkResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/resumes/{id}/versions",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Retained content snapshots, newest first", body = ContentVersionListResponse),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn list_versions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let items = state.resume_service.list_versions(id, user_id).await?;
    Ok(Json(ContentVersionListResponse {
        items: items.into_iter().map(ContentVersionResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/resumes/{id}/versions/{version_id}/restore",
    params(
        ("id" = Uuid, Path, description = "Resume ID"),
        ("version_id" = Uuid, Path, description = "Snapshot ID")
    ),
    responses(
        (status = 200, description = "Snapshot restored as current content", body = OkResponse),
        (status = 404, description = "Resume or snapshot not found")
    )
)]
#[axum::debug_handler]
pub async fn restore_version(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    state
        .resume_service
        .restore_version(id, user_id, version_id)
        .await?;
    Ok(Json(OkResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/resumes/{id}/stats",
    params(
        ("id" = Uuid, Path, description = "Resume ID")
    ),
    responses(
        (status = 200, description = "Counters recorded for the resume", body = StatListResponse),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn list_resume_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let resume = state.resume_service.get_owned(id, user_id).await?;
    let items = state.stats_service.list_for_resume(resume.id).await?;
    Ok(Json(StatListResponse { items }))
}
