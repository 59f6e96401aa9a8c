use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::{
    dto::profile_dto::{AvatarResponse, ProfileResponse, UpdateProfilePayload},
    error::{Error, Result},
    middleware::auth::Claims,
    routes::extract::Json,
    services::storage_service::check_avatar,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Caller's profile; fields are null before the first save", body = ProfileResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let profile = state
        .profile_service
        .get(user_id)
        .await?
        .map(ProfileResponse::from)
        .unwrap_or_default();
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Display name saved", body = ProfileResponse),
        (status = 400, description = "Invalid display name")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let profile = state
        .profile_service
        .upsert_display_name(user_id, &payload.display_name)
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[utoipa::path(
    post,
    path = "/api/profile/avatar",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "PNG or JPEG in the `file` field, at most 2 MiB"),
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Missing file, wrong type or too large")
    )
)]
#[axum::debug_handler]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(Error::Multipart)? {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(Error::Multipart)?;
            upload = Some((content_type, data));
            break;
        }
    }

    let (content_type, data) = upload.ok_or_else(|| Error::BadRequest("Missing file".into()))?;
    let format = check_avatar(content_type.as_deref(), &data)?;
    let avatar_url = state
        .storage_service
        .put_avatar(user_id, format, &data)
        .await?;
    state
        .profile_service
        .upsert_avatar_url(user_id, &avatar_url)
        .await?;

    tracing::info!(%user_id, "avatar updated");
    Ok(Json(AvatarResponse {
        ok: true,
        avatar_url,
    }))
}
