use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::resume_dto::ResumeResponse;
use crate::models::resume::SharePermission;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSharePayload {
    pub resume_id: Uuid,
    pub permission: Option<SharePermission>,
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareResponse {
    pub share_uuid: Uuid,
    pub permission: SharePermission,
    pub share_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareAccessQuery {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SharedResumeResponse {
    pub resume: ResumeResponse,
    #[schema(value_type = Object)]
    pub content: JsonValue,
}
