use crate::dto::ai_dto::{AnalysisEnvelope, JdMatch, ResumeAnalysis};
use crate::error::Result;
use crate::models::ai_analysis::{AiAnalysisRecord, AnalysisKind};
use crate::services::ai_service::LlmProvider;
use crate::services::prompts::{JD_MATCH_SYSTEM_PROMPT, RESUME_ANALYSIS_SYSTEM_PROMPT};
use crate::utils::sanitize::{content_hash, sanitize_resume};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Storage for model outputs, keyed by resume, analysis kind and input hash.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisCache: Send + Sync {
    async fn lookup(
        &self,
        resume_id: Uuid,
        kind: AnalysisKind,
        input_hash: &str,
    ) -> Result<Option<AiAnalysisRecord>>;

    async fn store(
        &self,
        resume_id: Uuid,
        kind: AnalysisKind,
        model: &str,
        input_hash: &str,
        output: &JsonValue,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct PgAnalysisCache {
    pool: PgPool,
}

impl PgAnalysisCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisCache for PgAnalysisCache {
    async fn lookup(
        &self,
        resume_id: Uuid,
        kind: AnalysisKind,
        input_hash: &str,
    ) -> Result<Option<AiAnalysisRecord>> {
        let row = sqlx::query_as::<_, AiAnalysisRecord>(
            r#"
            SELECT id, resume_id, type, model, input_hash, output_json, created_at
            FROM ai_analysis_history
            WHERE resume_id = $1 AND type = $2 AND input_hash = $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(resume_id)
        .bind(kind.as_str())
        .bind(input_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn store(
        &self,
        resume_id: Uuid,
        kind: AnalysisKind,
        model: &str,
        input_hash: &str,
        output: &JsonValue,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ai_analysis_history (resume_id, type, model, input_hash, output_json)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(resume_id)
        .bind(kind.as_str())
        .bind(model)
        .bind(input_hash)
        .bind(output)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Sanitize, hash, serve from cache or ask the model, validate, remember.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn LlmProvider>,
    cache: Arc<dyn AnalysisCache>,
}

struct AnalysisJob<'a, T> {
    kind: AnalysisKind,
    resume_id: Option<Uuid>,
    force: bool,
    input_hash: String,
    system_prompt: &'a str,
    user_prompt: String,
    fallback: fn() -> T,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn LlmProvider>, cache: Arc<dyn AnalysisCache>) -> Self {
        Self { provider, cache }
    }

    pub async fn analyze_resume(
        &self,
        content: &JsonValue,
        resume_id: Option<Uuid>,
        force: bool,
    ) -> Result<AnalysisEnvelope<ResumeAnalysis>> {
        let sanitized = sanitize_resume(content);
        let job = AnalysisJob {
            kind: AnalysisKind::Resume,
            resume_id,
            force,
            input_hash: content_hash(&sanitized),
            system_prompt: RESUME_ANALYSIS_SYSTEM_PROMPT,
            user_prompt: sanitized.to_string(),
            fallback: ResumeAnalysis::fallback,
        };
        self.run(job).await
    }

    pub async fn match_job_description(
        &self,
        content: &JsonValue,
        jd_text: &str,
        resume_id: Option<Uuid>,
        force: bool,
    ) -> Result<AnalysisEnvelope<JdMatch>> {
        let sanitized = sanitize_resume(content);
        let input = json!({ "resume": sanitized, "job_description": jd_text.trim() });
        let job = AnalysisJob {
            kind: AnalysisKind::JdMatch,
            resume_id,
            force,
            input_hash: content_hash(&input),
            system_prompt: JD_MATCH_SYSTEM_PROMPT,
            user_prompt: input.to_string(),
            fallback: JdMatch::fallback,
        };
        self.run(job).await
    }

    async fn run<T>(&self, job: AnalysisJob<'_, T>) -> Result<AnalysisEnvelope<T>>
    where
        T: DeserializeOwned + Serialize + Validate,
    {
        let kind = job.kind.as_str();

        if let (Some(resume_id), false) = (job.resume_id, job.force) {
            if let Some(record) = self.cache.lookup(resume_id, job.kind, &job.input_hash).await? {
                match serde_json::from_value::<T>(record.output_json) {
                    Ok(result) => {
                        tracing::info!(%resume_id, kind, cached_at = %record.created_at, "serving cached analysis");
                        return Ok(AnalysisEnvelope {
                            result,
                            is_cached: true,
                            cached_at: Some(record.created_at),
                            cached_model: Some(record.model),
                            is_fallback: false,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(%resume_id, kind, error = %e, "cached analysis no longer matches schema");
                    }
                }
            }
        }

        let model = self.provider.model_name();
        tracing::info!(kind, model = %model, force = job.force, "requesting analysis from model");

        let result = match self
            .provider
            .complete_json(job.system_prompt, &job.user_prompt)
            .await
            .and_then(parse_validated::<T>)
        {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(kind, error = %e, "model analysis failed, returning default breakdown");
                return Ok(AnalysisEnvelope::fallback((job.fallback)()));
            }
        };

        if let Some(resume_id) = job.resume_id {
            let output = serde_json::to_value(&result)?;
            if let Err(e) = self
                .cache
                .store(resume_id, job.kind, &model, &job.input_hash, &output)
                .await
            {
                tracing::warn!(%resume_id, kind, error = ?e, "failed to persist analysis");
            }
        }

        Ok(AnalysisEnvelope::fresh(result))
    }
}

fn parse_validated<T>(raw: JsonValue) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(raw)?;
    parsed.validate()?;
    Ok(parsed)
}
