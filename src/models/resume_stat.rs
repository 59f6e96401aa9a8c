use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STAT_SHARE_VIEW: &str = "share_view";
pub const STAT_PDF_DOWNLOAD: &str = "pdf_download";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ResumeStat {
    pub id: Uuid,
    pub resume_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub stat_type: String,
    pub count: i64,
    pub updated_at: DateTime<Utc>,
}
