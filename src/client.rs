//! Typed HTTP client for the resume API, as used by the editor.

use crate::dto::{
    ai_dto::{AnalysisEnvelope, JdMatch, ResumeAnalysis},
    profile_dto::ProfileResponse,
    resume_dto::{CreateResumePayload, ResumeDetailResponse, ResumeListResponse, ResumeResponse},
    share_dto::{ShareResponse, SharedResumeResponse},
};
use crate::error::{Error, Result};
use crate::models::resume::SharePermission;
use crate::utils::retry::retry_with_backoff;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

pub const SAVE_ATTEMPTS: u32 = 3;
pub const SAVE_BASE_DELAY: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct ResumeApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ResumeApiClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::BadRequest(format!("Invalid path '{}': {}", path, e)))?;
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn list_resumes(&self) -> Result<ResumeListResponse> {
        let resp = self.request(Method::GET, "/api/resumes")?.send().await?;
        decode(resp).await
    }

    pub async fn create_resume(&self, payload: &CreateResumePayload) -> Result<ResumeResponse> {
        let resp = self
            .request(Method::POST, "/api/resumes")?
            .json(payload)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_resume(&self, id: Uuid) -> Result<ResumeDetailResponse> {
        let resp = self
            .request(Method::GET, &format!("/api/resumes/{}", id))?
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn save_content(&self, id: Uuid, content: &JsonValue) -> Result<()> {
        let resp = self
            .request(Method::PATCH, &format!("/api/resumes/{}", id))?
            .json(&json!({ "content_json": content }))
            .send()
            .await?;
        decode::<JsonValue>(resp).await.map(|_| ())
    }

    /// Editor save: retries any failure, waiting 250ms then 500ms between attempts.
    pub async fn save_content_with_retry(&self, id: Uuid, content: &JsonValue) -> Result<()> {
        retry_with_backoff(SAVE_ATTEMPTS, SAVE_BASE_DELAY, |attempt| async move {
            tracing::debug!(resume_id = %id, attempt, "saving resume content");
            self.save_content(id, content).await
        })
        .await
    }

    pub async fn delete_resume(&self, id: Uuid) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("/api/resumes/{}", id))?
            .send()
            .await?;
        decode::<JsonValue>(resp).await.map(|_| ())
    }

    pub async fn create_share(
        &self,
        resume_id: Uuid,
        permission: SharePermission,
        password: Option<&str>,
    ) -> Result<ShareResponse> {
        let resp = self
            .request(Method::POST, "/api/share")?
            .json(&json!({
                "resume_id": resume_id,
                "permission": permission,
                "password": password,
            }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn get_shared(&self, share_uuid: Uuid, password: Option<&str>) -> Result<SharedResumeResponse> {
        let mut builder = self.request(Method::GET, &format!("/api/share/{}", share_uuid))?;
        if let Some(password) = password {
            builder = builder.header("x-password", password);
        }
        decode(builder.send().await?).await
    }

    pub async fn record_stat(&self, resume_id: Uuid, stat_type: &str) -> Result<()> {
        let resp = self
            .request(Method::POST, "/api/stats")?
            .json(&json!({ "type": stat_type, "resume_id": resume_id }))
            .send()
            .await?;
        decode::<JsonValue>(resp).await.map(|_| ())
    }

    pub async fn analyze(
        &self,
        content: &JsonValue,
        resume_id: Option<Uuid>,
        force: bool,
    ) -> Result<AnalysisEnvelope<ResumeAnalysis>> {
        let resp = self
            .request(Method::POST, "/api/ai/analyze")?
            .json(&json!({
                "resumeContent": content,
                "resumeId": resume_id,
                "forceReanalyze": force,
            }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn jd_match(
        &self,
        content: &JsonValue,
        jd_text: &str,
        resume_id: Option<Uuid>,
        force: bool,
    ) -> Result<AnalysisEnvelope<JdMatch>> {
        let resp = self
            .request(Method::POST, "/api/ai/jd-match")?
            .json(&json!({
                "resumeContent": content,
                "jdText": jd_text,
                "resumeId": resume_id,
                "forceReanalyze": force,
            }))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn export_pdf(&self, id: Uuid) -> Result<Vec<u8>> {
        let resp = self
            .request(Method::GET, &format!("/api/export-pdf/{}", id))?
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    pub async fn get_profile(&self) -> Result<ProfileResponse> {
        let resp = self.request(Method::GET, "/api/profile")?.send().await?;
        decode(resp).await
    }

    pub async fn update_profile(&self, display_name: &str) -> Result<ProfileResponse> {
        let resp = self
            .request(Method::POST, "/api/profile")?
            .json(&json!({ "display_name": display_name }))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = check_status(resp).await?;
    Ok(resp.json::<T>().await?)
}

/// Maps `{"error": ...}` responses back onto the server's error kinds.
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body: JsonValue = resp.json().await.unwrap_or(JsonValue::Null);
    let message = body["error"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    Err(match status {
        StatusCode::BAD_REQUEST => Error::BadRequest(message),
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        _ => Error::Internal(message),
    })
}
