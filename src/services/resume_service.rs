use crate::dto::resume_dto::{CreateResumePayload, UpdateResumePayload};
use crate::error::{Error, Result};
use crate::models::content::ResumeContent;
use crate::models::resume::{
    Resume, ResumeContentVersion, Template, DEFAULT_COLOR_THEME, DEFAULT_TITLE,
    MAX_CONTENT_VERSIONS,
};
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const RESUME_COLUMNS: &str = "id, user_id, title, template, color_theme, share_uuid, \
     share_permission, share_password_hash, created_at, updated_at";

#[derive(Clone)]
pub struct ResumeService {
    pool: PgPool,
}

impl ResumeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Resume>> {
        let query = format!(
            "SELECT {} FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
            RESUME_COLUMNS
        );
        let items = sqlx::query_as::<_, Resume>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Creates the resume together with its single content row.
    pub async fn create(&self, user_id: Uuid, payload: CreateResumePayload) -> Result<Resume> {
        let template = payload.template.unwrap_or_default();
        let title = payload
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let color_theme = payload
            .color_theme
            .unwrap_or_else(|| DEFAULT_COLOR_THEME.to_string());

        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO resumes (user_id, title, template, color_theme) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            RESUME_COLUMNS
        );
        let resume = sqlx::query_as::<_, Resume>(&query)
            .bind(user_id)
            .bind(&title)
            .bind(template.as_str())
            .bind(&color_theme)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO resume_content (resume_id, content_json) VALUES ($1, $2)")
            .bind(resume.id)
            .bind(ResumeContent::sample_for(template).to_value())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(resume_id = %resume.id, template = %template, "resume created");
        Ok(resume)
    }

    pub async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<Resume> {
        let query = format!(
            "SELECT {} FROM resumes WHERE id = $1 AND user_id = $2",
            RESUME_COLUMNS
        );
        sqlx::query_as::<_, Resume>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".into()))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Resume> {
        let query = format!("SELECT {} FROM resumes WHERE id = $1", RESUME_COLUMNS);
        sqlx::query_as::<_, Resume>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".into()))
    }

    pub async fn get_by_share_uuid(&self, share_uuid: Uuid) -> Result<Resume> {
        let query = format!("SELECT {} FROM resumes WHERE share_uuid = $1", RESUME_COLUMNS);
        sqlx::query_as::<_, Resume>(&query)
            .bind(share_uuid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Not found".into()))
    }

    pub async fn get_content(&self, resume_id: Uuid) -> Result<JsonValue> {
        let content: Option<JsonValue> =
            sqlx::query_scalar("SELECT content_json FROM resume_content WHERE resume_id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(content.unwrap_or_else(|| JsonValue::Object(Default::default())))
    }

    pub async fn get_detail(&self, id: Uuid, user_id: Uuid) -> Result<(Resume, JsonValue)> {
        let resume = self.get_owned(id, user_id).await?;
        let content = self.get_content(resume.id).await?;
        Ok((resume, content))
    }

    /// Applies an editor save. A content change snapshots the previous
    /// document first and keeps only the newest snapshots.
    pub async fn update(&self, id: Uuid, user_id: Uuid, payload: UpdateResumePayload) -> Result<()> {
        if let Some(content) = &payload.content_json {
            ResumeContent::from_value(content).map_err(Error::BadRequest)?;
        }

        let mut tx = self.pool.begin().await?;
        lock_owned(&mut tx, id, user_id).await?;

        if let Some(content) = &payload.content_json {
            snapshot_and_prune(&mut tx, id).await?;
            write_content(&mut tx, id, content).await?;
        }

        sqlx::query(
            r#"
            UPDATE resumes
            SET
                title = COALESCE($2, title),
                template = COALESCE($3, template),
                color_theme = COALESCE($4, color_theme),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.title.as_deref().map(str::trim))
        .bind(payload.template.map(|t: Template| t.as_str()))
        .bind(payload.color_theme.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            resume_id = %id,
            content = payload.content_json.is_some(),
            metadata = payload.touches_metadata(),
            "resume updated"
        );
        Ok(())
    }

    /// Content, versions, stats and cached analyses go with the resume via cascade.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Resume not found".into()));
        }
        tracing::info!(resume_id = %id, "resume deleted");
        Ok(())
    }

    pub async fn list_versions(&self, id: Uuid, user_id: Uuid) -> Result<Vec<ResumeContentVersion>> {
        self.get_owned(id, user_id).await?;
        let items = sqlx::query_as::<_, ResumeContentVersion>(
            r#"
            SELECT id, resume_id, content_json, created_at
            FROM resume_content_versions
            WHERE resume_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn restore_version(&self, id: Uuid, user_id: Uuid, version_id: Uuid) -> Result<JsonValue> {
        let mut tx = self.pool.begin().await?;
        lock_owned(&mut tx, id, user_id).await?;

        let content: JsonValue = sqlx::query_scalar(
            "SELECT content_json FROM resume_content_versions WHERE id = $1 AND resume_id = $2",
        )
        .bind(version_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Version not found".into()))?;

        snapshot_and_prune(&mut tx, id).await?;
        write_content(&mut tx, id, &content).await?;
        sqlx::query("UPDATE resumes SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(resume_id = %id, version_id = %version_id, "content version restored");
        Ok(content)
    }
}

async fn lock_owned(tx: &mut Transaction<'_, Postgres>, id: Uuid, user_id: Uuid) -> Result<()> {
    let found: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM resumes WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?;
    found
        .map(|_| ())
        .ok_or_else(|| Error::NotFound("Resume not found".into()))
}

async fn snapshot_and_prune(tx: &mut Transaction<'_, Postgres>, resume_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO resume_content_versions (resume_id, content_json)
        SELECT resume_id, content_json FROM resume_content WHERE resume_id = $1
        "#,
    )
    .bind(resume_id)
    .execute(&mut **tx)
    .await?;

    let pruned = sqlx::query(
        r#"
        DELETE FROM resume_content_versions
        WHERE id IN (
            SELECT id FROM resume_content_versions
            WHERE resume_id = $1
            ORDER BY created_at DESC, id DESC
            OFFSET $2
        )
        "#,
    )
    .bind(resume_id)
    .bind(MAX_CONTENT_VERSIONS)
    .execute(&mut **tx)
    .await?;

    if pruned.rows_affected() > 0 {
        tracing::debug!(resume_id = %resume_id, pruned = pruned.rows_affected(), "pruned content versions");
    }
    Ok(())
}

async fn write_content(
    tx: &mut Transaction<'_, Postgres>,
    resume_id: Uuid,
    content: &JsonValue,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO resume_content (resume_id, content_json, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (resume_id) DO UPDATE
        SET content_json = EXCLUDED.content_json, updated_at = NOW()
        "#,
    )
    .bind(resume_id)
    .bind(content)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
