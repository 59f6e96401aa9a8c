use crate::error::Result;
use crate::models::resume_stat::ResumeStat;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bumps a per-resume counter, creating it on first use. Returns the new count.
    pub async fn increment(&self, resume_id: Uuid, stat_type: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO resume_stats (resume_id, type, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (resume_id, type) DO UPDATE
            SET count = resume_stats.count + 1, updated_at = NOW()
            RETURNING count
            "#,
        )
        .bind(resume_id)
        .bind(stat_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Counter updates on read paths must not fail the request.
    pub async fn increment_quietly(&self, resume_id: Uuid, stat_type: &str) {
        if let Err(e) = self.increment(resume_id, stat_type).await {
            tracing::warn!(resume_id = %resume_id, stat_type, error = ?e, "failed to record stat");
        }
    }

    pub async fn list_for_resume(&self, resume_id: Uuid) -> Result<Vec<ResumeStat>> {
        let items = sqlx::query_as::<_, ResumeStat>(
            "SELECT id, resume_id, type, count, updated_at FROM resume_stats WHERE resume_id = $1 ORDER BY type",
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
