use crate::error::{Error, Result};
use chrono::Utc;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Blob store backed by a local directory that is served under `/uploads`.
#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
    public_base: String,
}

impl StorageService {
    pub fn new(root: impl Into<PathBuf>, site_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base: format!("{}/uploads", site_url.trim_end_matches('/')),
        }
    }

    /// Writes (or overwrites) `key` and returns its public URL.
    pub async fn put(&self, key: &str, data: &[u8]) -> Result<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await.map_err(|e| {
            tracing::error!(key, "failed to write blob: {}", e);
            Error::Internal(format!("Failed to save file: {}", e))
        })?;
        Ok(self.public_url(key))
    }

    /// Deletes `key`. A key that is already gone is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.resolve(key)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores a user's avatar, drops the copy in any other format and returns a
    /// URL that changes with every upload.
    pub async fn put_avatar(&self, user_id: Uuid, format: AvatarFormat, data: &[u8]) -> Result<String> {
        let url = self.put(&avatar_key(user_id, format), data).await?;
        for stale in AvatarFormat::ALL.into_iter().filter(|f| *f != format) {
            if let Err(e) = self.remove(&avatar_key(user_id, stale)).await {
                tracing::warn!(%user_id, "failed to remove previous avatar: {}", e);
            }
        }
        Ok(format!("{}?v={}", url, Utc::now().timestamp_millis()))
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || key.is_empty() {
            return Err(Error::BadRequest("Invalid storage key".into()));
        }
        Ok(self.root.join(relative))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarFormat {
    Png,
    Jpeg,
}

impl AvatarFormat {
    pub const ALL: [AvatarFormat; 2] = [AvatarFormat::Png, AvatarFormat::Jpeg];

    pub fn extension(&self) -> &'static str {
        match self {
            AvatarFormat::Png => "png",
            AvatarFormat::Jpeg => "jpg",
        }
    }
}

/// Accepts PNG or JPEG up to 2 MiB; the declared type must agree with the bytes.
pub fn check_avatar(content_type: Option<&str>, data: &[u8]) -> Result<AvatarFormat> {
    let declared = content_type.unwrap_or_default().to_ascii_lowercase();
    let format = match declared.as_str() {
        "image/png" => AvatarFormat::Png,
        "image/jpeg" | "image/jpg" => AvatarFormat::Jpeg,
        _ => return Err(Error::BadRequest("Invalid file type".into())),
    };
    if data.len() > MAX_AVATAR_BYTES {
        return Err(Error::BadRequest("File too large".into()));
    }
    let magic_ok = match format {
        AvatarFormat::Png => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        AvatarFormat::Jpeg => data.starts_with(&[0xFF, 0xD8]),
    };
    if !magic_ok {
        return Err(Error::BadRequest("File content does not match its type".into()));
    }
    Ok(format)
}

pub fn avatar_key(user_id: Uuid, format: AvatarFormat) -> String {
    format!("avatars/{}/avatar.{}", user_id, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn avatar_type_and_size_checks() {
        assert_eq!(check_avatar(Some("image/png"), PNG).unwrap(), AvatarFormat::Png);
        assert_eq!(
            check_avatar(Some("IMAGE/JPEG"), &[0xFF, 0xD8, 0xFF]).unwrap(),
            AvatarFormat::Jpeg
        );
        assert!(check_avatar(Some("image/gif"), b"GIF89a").is_err());
        assert!(check_avatar(None, PNG).is_err());
        assert!(check_avatar(Some("image/png"), &[0xFF, 0xD8]).is_err());

        let mut big = PNG.to_vec();
        big.resize(MAX_AVATAR_BYTES + 1, 0);
        assert!(matches!(check_avatar(Some("image/png"), &big), Err(Error::BadRequest(m)) if m == "File too large"));
    }

    #[test]
    fn avatar_key_is_per_user() {
        let user = Uuid::nil();
        assert_eq!(
            avatar_key(user, AvatarFormat::Jpeg),
            "avatars/00000000-0000-0000-0000-000000000000/avatar.jpg"
        );
    }

    #[tokio::test]
    async fn put_writes_under_root_and_rejects_traversal() {
        let root = std::env::temp_dir().join(format!("blob_test_{}", Uuid::new_v4()));
        let store = StorageService::new(&root, "https://cv.example.com/");

        let url = store.put("avatars/u1/avatar.png", PNG).await.unwrap();
        assert_eq!(url, "https://cv.example.com/uploads/avatars/u1/avatar.png");
        assert_eq!(fs::read(root.join("avatars/u1/avatar.png")).await.unwrap(), PNG);

        assert!(store.put("../escape.png", PNG).await.is_err());
        assert!(store.put("/etc/passwd", PNG).await.is_err());

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn new_avatar_replaces_other_format_and_busts_caches() {
        let root = std::env::temp_dir().join(format!("blob_test_{}", Uuid::new_v4()));
        let store = StorageService::new(&root, "https://cv.example.com");
        let user = Uuid::new_v4();
        let jpeg: &[u8] = &[0xFF, 0xD8, 0xFF];

        let first = store.put_avatar(user, AvatarFormat::Png, PNG).await.unwrap();
        let base = format!("https://cv.example.com/uploads/avatars/{}/avatar.png?v=", user);
        assert!(first.starts_with(&base));

        let second = store.put_avatar(user, AvatarFormat::Jpeg, jpeg).await.unwrap();
        assert!(second.contains("/avatar.jpg?v="));
        assert!(!root.join(avatar_key(user, AvatarFormat::Png)).exists());
        assert_eq!(fs::read(root.join(avatar_key(user, AvatarFormat::Jpeg))).await.unwrap(), jpeg);

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let third = store.put_avatar(user, AvatarFormat::Jpeg, jpeg).await.unwrap();
        assert_ne!(second, third);

        let _ = fs::remove_dir_all(&root).await;
    }
}
