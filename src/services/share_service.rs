use crate::dto::share_dto::{CreateSharePayload, ShareResponse};
use crate::error::{Error, Result};
use crate::models::resume::{Resume, SharePermission};
use crate::utils::crypto::{hash_share_password, verify_share_password};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ShareService {
    pool: PgPool,
    site_url: String,
}

impl ShareService {
    pub fn new(pool: PgPool, site_url: String) -> Self {
        Self { pool, site_url }
    }

    pub fn share_url(&self, share_uuid: Uuid) -> String {
        format!("{}/s/{}", self.site_url, share_uuid)
    }

    /// Issues a fresh share id for an owned resume. Each call invalidates the previous link.
    pub async fn create_share(&self, user_id: Uuid, payload: CreateSharePayload) -> Result<ShareResponse> {
        let permission = payload.permission.unwrap_or(SharePermission::Public);
        let password_hash = match permission {
            SharePermission::Password => {
                let password = payload
                    .password
                    .as_deref()
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| Error::BadRequest("Password is required for password shares".into()))?;
                Some(hash_share_password(password))
            }
            _ => None,
        };

        let share_uuid = Uuid::new_v4();
        let res = sqlx::query(
            r#"
            UPDATE resumes
            SET share_uuid = $3, share_permission = $4, share_password_hash = $5, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(payload.resume_id)
        .bind(user_id)
        .bind(share_uuid)
        .bind(permission.as_str())
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Resume not found".into()));
        }

        tracing::info!(resume_id = %payload.resume_id, permission = permission.as_str(), "share link issued");
        Ok(ShareResponse {
            share_uuid,
            permission,
            share_url: self.share_url(share_uuid),
        })
    }
}

/// Decides whether a reader may see a shared resume.
///
/// `viewer` is the signed-in user, if any; `password` is what the reader submitted.
pub fn check_share_access(resume: &Resume, viewer: Option<Uuid>, password: Option<&str>) -> Result<()> {
    match resume.permission() {
        SharePermission::Public => Ok(()),
        SharePermission::Private => match viewer {
            Some(user) if user == resume.user_id => Ok(()),
            _ => Err(Error::Unauthorized("Unauthorized".into())),
        },
        SharePermission::Password => {
            let supplied = password.unwrap_or_default();
            let stored = resume.share_password_hash.as_deref().unwrap_or_default();
            if !stored.is_empty() && verify_share_password(supplied, stored) {
                Ok(())
            } else {
                Err(Error::Forbidden("Password required".into()))
            }
        }
    }
}
