use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::resume::{Resume, ResumeContentVersion, Template};
use crate::utils::validation::{validate_color_theme, validate_not_blank};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateResumePayload {
    #[validate(
        length(max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    pub template: Option<Template>,
    #[validate(custom(function = "validate_color_theme"))]
    pub color_theme: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateResumePayload {
    #[schema(value_type = Object)]
    pub content_json: Option<JsonValue>,
    #[validate(
        length(max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    pub template: Option<Template>,
    #[validate(custom(function = "validate_color_theme"))]
    pub color_theme: Option<String>,
}

impl UpdateResumePayload {
    pub fn touches_metadata(&self) -> bool {
        self.title.is_some() || self.template.is_some() || self.color_theme.is_some()
    }
}

/// Resume row as exposed over HTTP; the share password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResumeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub color_theme: String,
    pub share_uuid: Option<Uuid>,
    pub share_permission: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Resume> for ResumeResponse {
    fn from(r: Resume) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            template: r.template,
            color_theme: r.color_theme,
            share_uuid: r.share_uuid,
            share_permission: r.share_permission,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResumeDetailResponse {
    #[serde(flatten)]
    pub resume: ResumeResponse,
    #[schema(value_type = Object)]
    pub content_json: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResumeListResponse {
    pub items: Vec<ResumeResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentVersionResponse {
    pub id: Uuid,
    pub resume_id: Uuid,
    #[schema(value_type = Object)]
    pub content_json: JsonValue,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeContentVersion> for ContentVersionResponse {
    fn from(v: ResumeContentVersion) -> Self {
        Self {
            id: v.id,
            resume_id: v.resume_id,
            content_json: v.content_json,
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentVersionListResponse {
    pub items: Vec<ContentVersionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_rejects_bad_color_and_unknown_template() {
        let bad_color: CreateResumePayload =
            serde_json::from_value(json!({ "color_theme": "blue" })).unwrap();
        assert!(bad_color.validate().is_err());

        let unknown = serde_json::from_value::<CreateResumePayload>(json!({ "template": "Retro" }));
        assert!(unknown.is_err());

        let ok: CreateResumePayload =
            serde_json::from_value(json!({ "template": "Classic", "color_theme": "#112233" })).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.template, Some(Template::Classic));
    }

    #[test]
    fn update_payload_detects_metadata_changes() {
        let content_only: UpdateResumePayload =
            serde_json::from_value(json!({ "content_json": { "summary": "x" } })).unwrap();
        assert!(!content_only.touches_metadata());
        let titled: UpdateResumePayload = serde_json::from_value(json!({ "title": "CV" })).unwrap();
        assert!(titled.touches_metadata());
    }

    #[test]
    fn blank_titles_are_rejected() {
        let blank: UpdateResumePayload = serde_json::from_value(json!({ "title": "   " })).unwrap();
        assert!(blank.validate().is_err());
        let blank: CreateResumePayload = serde_json::from_value(json!({ "title": "" })).unwrap();
        assert!(blank.validate().is_err());
        let ok: UpdateResumePayload = serde_json::from_value(json!({ "title": " CV " })).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn detail_response_flattens_metadata() {
        let now = Utc::now();
        let detail = ResumeDetailResponse {
            resume: ResumeResponse {
                id: Uuid::nil(),
                user_id: Uuid::nil(),
                title: "CV".into(),
                template: "Modern".into(),
                color_theme: "#2b8cee".into(),
                share_uuid: None,
                share_permission: "private".into(),
                created_at: now,
                updated_at: now,
            },
            content_json: json!({ "summary": "hi" }),
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(v["title"], "CV");
        assert_eq!(v["content_json"]["summary"], "hi");
        assert!(v.get("share_password_hash").is_none());
    }
}
