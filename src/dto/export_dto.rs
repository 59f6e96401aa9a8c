use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct HtmlToPdfPayload {
    #[validate(length(min = 1, message = "HTML content is required"))]
    pub html: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderQuery {
    pub sig: Option<String>,
}
