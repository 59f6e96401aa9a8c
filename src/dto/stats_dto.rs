use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::resume_stat::ResumeStat;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordStatPayload {
    #[serde(rename = "type")]
    #[validate(
        length(max = 32, message = "Stat type is too long"),
        custom(function = "validate_not_blank")
    )]
    pub stat_type: String,
    pub resume_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatListResponse {
    pub items: Vec<ResumeStat>,
}
