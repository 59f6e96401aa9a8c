use crate::error::Result;
use crate::models::profile::Profile;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT user_id, display_name, avatar_url, created_at, updated_at FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn upsert_display_name(&self, user_id: Uuid, display_name: &str) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET display_name = EXCLUDED.display_name, updated_at = NOW()
            RETURNING user_id, display_name, avatar_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(display_name.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn upsert_avatar_url(&self, user_id: Uuid, avatar_url: &str) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, avatar_url)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET avatar_url = EXCLUDED.avatar_url, updated_at = NOW()
            RETURNING user_id, display_name, avatar_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}
