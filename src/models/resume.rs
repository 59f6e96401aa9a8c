use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "Untitled resume";
pub const DEFAULT_COLOR_THEME: &str = "#2b8cee";

/// Number of prior content snapshots kept per resume.
pub const MAX_CONTENT_VERSIONS: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub color_theme: String,
    pub share_uuid: Option<Uuid>,
    pub share_permission: String,
    pub share_password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn permission(&self) -> SharePermission {
        self.share_permission
            .parse()
            .unwrap_or(SharePermission::Private)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeContentVersion {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub content_json: JsonValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Template {
    Modern,
    Classic,
    Creative,
}

impl Template {
    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Modern => "Modern",
            Template::Classic => "Classic",
            Template::Creative => "Creative",
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Template::Modern
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Modern" => Ok(Template::Modern),
            "Classic" => Ok(Template::Classic),
            "Creative" => Ok(Template::Creative),
            other => Err(format!("Unknown template: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    Public,
    Private,
    Password,
}

impl SharePermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharePermission::Public => "public",
            SharePermission::Private => "private",
            SharePermission::Password => "password",
        }
    }
}

impl FromStr for SharePermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(SharePermission::Public),
            "private" => Ok(SharePermission::Private),
            "password" => Ok(SharePermission::Password),
            other => Err(format!("Unknown share permission: {}", other)),
        }
    }
}
