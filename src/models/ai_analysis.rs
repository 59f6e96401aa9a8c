use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiAnalysisRecord {
    pub id: Uuid,
    pub resume_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub analysis_type: String,
    pub model: String,
    pub input_hash: String,
    pub output_json: JsonValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Resume,
    JdMatch,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Resume => "resume",
            AnalysisKind::JdMatch => "jd_match",
        }
    }
}
