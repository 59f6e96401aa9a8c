use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::share_dto::{CreateSharePayload, ShareAccessQuery, ShareResponse, SharedResumeResponse},
    error::Result,
    middleware::auth::{optional_claims, Claims},
    models::{resume::Resume, resume_stat::STAT_SHARE_VIEW},
    routes::extract::{Json, Path, Query},
    services::share_service::check_share_access,
    AppState,
};

const PASSWORD_HEADER: &str = "x-password";

#[utoipa::path(
    post,
    path = "/api/share",
    request_body = CreateSharePayload,
    responses(
        (status = 200, description = "Fresh share link issued", body = ShareResponse),
        (status = 400, description = "Password share without a password"),
        (status = 404, description = "Resume not found")
    )
)]
#[axum::debug_handler]
pub async fn create_share(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateSharePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let share = state.share_service.create_share(user_id, payload).await?;
    Ok(Json(share))
}

#[utoipa::path(
    get,
    path = "/api/share/{share_uuid}",
    params(
        ("share_uuid" = Uuid, Path, description = "Share link ID"),
        ("password" = Option<String>, Query, description = "Password for protected shares; the x-password header works too")
    ),
    responses(
        (status = 200, description = "Shared resume and content", body = SharedResumeResponse),
        (status = 401, description = "Private share and caller is not the owner"),
        (status = 403, description = "Missing or wrong password"),
        (status = 404, description = "Unknown share link")
    )
)]
#[axum::debug_handler]
pub async fn get_shared(
    State(state): State<AppState>,
    Path(share_uuid): Path<Uuid>,
    Query(query): Query<ShareAccessQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let (resume, content) = open_share(&state, share_uuid, &query, &headers).await?;
    Ok(Json(SharedResumeResponse {
        resume: resume.into(),
        content,
    }))
}

/// Public HTML page for a share link.
#[axum::debug_handler]
pub async fn shared_page(
    State(state): State<AppState>,
    Path(share_uuid): Path<Uuid>,
    Query(query): Query<ShareAccessQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let (resume, content) = open_share(&state, share_uuid, &query, &headers).await?;
    let html = state.render_service.render_resume(&resume, &content)?;
    Ok(Html(html))
}

async fn open_share(
    state: &AppState,
    share_uuid: Uuid,
    query: &ShareAccessQuery,
    headers: &HeaderMap,
) -> Result<(Resume, serde_json::Value)> {
    let resume = state.resume_service.get_by_share_uuid(share_uuid).await?;

    let viewer = optional_claims(headers).and_then(|c| c.user_id().ok());
    let password = supplied_password(query, headers);
    check_share_access(&resume, viewer, password)?;

    let content = state.resume_service.get_content(resume.id).await?;
    state
        .stats_service
        .increment_quietly(resume.id, STAT_SHARE_VIEW)
        .await;
    Ok((resume, content))
}

/// Query parameter first, then the header. Empty values count as absent.
fn supplied_password<'a>(query: &'a ShareAccessQuery, headers: &'a HeaderMap) -> Option<&'a str> {
    query
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .or_else(|| {
            headers
                .get(PASSWORD_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|p| !p.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(password: Option<&str>) -> ShareAccessQuery {
        ShareAccessQuery {
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn empty_query_password_falls_through_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(PASSWORD_HEADER, "hunter2".parse().unwrap());
        assert_eq!(supplied_password(&query(Some("")), &headers), Some("hunter2"));
        assert_eq!(supplied_password(&query(None), &headers), Some("hunter2"));
        assert_eq!(supplied_password(&query(Some("q")), &headers), Some("q"));
        assert_eq!(supplied_password(&query(Some("")), &HeaderMap::new()), None);
    }
}
