use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::profile::Profile;
use crate::utils::validation::validate_display_name;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    #[validate(custom(function = "validate_display_name"))]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            display_name: p.display_name,
            avatar_url: p.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvatarResponse {
    pub ok: bool,
    pub avatar_url: String,
}
