use crate::error::{Error, Result};
use crate::utils::crypto::{sign_render_target, verify_render_signature};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tokio::sync::Mutex;
use uuid::Uuid;

const PRINT_TIMEOUT: Duration = Duration::from_secs(45);
const PDF_MAGIC: &[u8] = b"%PDF";

/// Prints pages to PDF through a headless Chromium binary.
#[derive(Clone)]
pub struct PdfService {
    chrome_bin: String,
    site_url: String,
    render_secret: String,
    staged_pages: Arc<Mutex<HashMap<Uuid, String>>>,
}

impl PdfService {
    pub fn new(chrome_bin: String, site_url: String, render_secret: String) -> Self {
        Self {
            chrome_bin,
            site_url: site_url.trim_end_matches('/').to_string(),
            render_secret,
            staged_pages: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Signed URL of the print view the browser loads for a resume.
    pub fn render_url(&self, resume_id: Uuid) -> String {
        format!(
            "{}/render/{}?sig={}",
            self.site_url,
            resume_id,
            sign_render_target(&self.render_secret, &resume_id.to_string())
        )
    }

    pub fn is_signed(&self, resume_id: Uuid, signature: &str) -> bool {
        verify_render_signature(&self.render_secret, &resume_id.to_string(), signature)
    }

    pub async fn print_resume(&self, resume_id: Uuid) -> Result<Vec<u8>> {
        let url = self.render_url(resume_id);
        let workdir = WorkDir::create().await?;
        let result = self.print_url(&url, workdir.path()).await;
        workdir.remove().await;
        result
    }

    /// Prints caller-supplied markup. The page is served once over http from
    /// `/render-page/:token`, so it never gets a `file://` origin.
    pub async fn print_html(&self, html: &str) -> Result<Vec<u8>> {
        let token = self.stage_page(html.to_string()).await;
        let url = self.staged_page_url(token);
        let result = match WorkDir::create().await {
            Ok(workdir) => {
                let printed = self.print_url(&url, workdir.path()).await;
                workdir.remove().await;
                printed
            }
            Err(e) => Err(e),
        };
        self.staged_pages.lock().await.remove(&token);
        result
    }

    pub async fn stage_page(&self, html: String) -> Uuid {
        let token = Uuid::new_v4();
        self.staged_pages.lock().await.insert(token, html);
        token
    }

    pub fn staged_page_url(&self, token: Uuid) -> String {
        format!(
            "{}/render-page/{}?sig={}",
            self.site_url,
            token,
            sign_render_target(&self.render_secret, &staged_target(token))
        )
    }

    /// Hands a staged page out exactly once, and only with a valid signature.
    pub async fn take_staged_page(&self, token: Uuid, signature: &str) -> Option<String> {
        if !verify_render_signature(&self.render_secret, &staged_target(token), signature) {
            return None;
        }
        self.staged_pages.lock().await.remove(&token)
    }

    async fn print_url(&self, url: &str, workdir: &Path) -> Result<Vec<u8>> {
        let out_path = workdir.join("out.pdf");

        let child = Command::new(&self.chrome_bin)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--user-data-dir={}", workdir.join("profile").display()))
            .arg(format!("--print-to-pdf={}", out_path.display()))
            .arg("--virtual-time-budget=1000")
            .arg(url)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(PRINT_TIMEOUT, child).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                tracing::error!(bin = %self.chrome_bin, "Failed to run browser: {}", e);
                return Err(Error::Internal("PDF renderer not available".into()));
            }
            Err(_) => {
                tracing::error!("browser did not finish printing within {:?}", PRINT_TIMEOUT);
                return Err(Error::Internal("PDF generation timed out".into()));
            }
        };

        if !output.status.success() {
            tracing::error!(
                status = ?output.status,
                "browser print failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(Error::Internal("PDF generation failed".into()));
        }

        let pdf = fs::read(&out_path)
            .await
            .map_err(|_| Error::Internal("PDF generation produced no output".into()))?;
        ensure_pdf(pdf)
    }
}

/// Staged pages sign a prefixed target so their signatures never validate a resume id.
fn staged_target(token: Uuid) -> String {
    format!("page:{}", token)
}

fn ensure_pdf(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(bytes)
    } else {
        Err(Error::Internal("PDF generation produced invalid output".into()))
    }
}

struct WorkDir(PathBuf);

impl WorkDir {
    async fn create() -> Result<Self> {
        let path = std::env::temp_dir().join(format!("resume_pdf_{}", Uuid::new_v4()));
        fs::create_dir_all(&path).await?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }

    async fn remove(self) {
        if let Err(e) = fs::remove_dir_all(&self.0).await {
            tracing::warn!(dir = %self.0.display(), "failed to clean up print dir: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_url_carries_a_verifiable_signature() {
        let svc = PdfService::new("chromium".into(), "https://cv.example.com/".into(), "s3cret".into());
        let id = Uuid::new_v4();
        let url = svc.render_url(id);
        let prefix = format!("https://cv.example.com/render/{}?sig=", id);
        assert!(url.starts_with(&prefix));
        let sig = &url[prefix.len()..];
        assert!(verify_render_signature("s3cret", &id.to_string(), sig));
        assert!(!verify_render_signature("other", &id.to_string(), sig));
        assert!(svc.is_signed(id, sig));
        assert!(!svc.is_signed(Uuid::new_v4(), sig));
    }

    #[test]
    fn only_pdf_bytes_are_accepted() {
        assert!(ensure_pdf(b"%PDF-1.7\n...".to_vec()).is_ok());
        assert!(ensure_pdf(b"<html>".to_vec()).is_err());
        assert!(ensure_pdf(Vec::new()).is_err());
    }

    #[tokio::test]
    async fn staged_pages_load_over_http_once() {
        let svc = PdfService::new("chromium".into(), "http://127.0.0.1:8000".into(), "s3cret".into());
        let token = svc.stage_page("<p>hello</p>".into()).await;
        let url = svc.staged_page_url(token);
        assert!(!url.starts_with("file:"));
        let prefix = format!("http://127.0.0.1:8000/render-page/{}?sig=", token);
        assert!(url.starts_with(&prefix));
        let sig = &url[prefix.len()..];

        assert_eq!(svc.take_staged_page(token, "00").await, None);
        assert!(!svc.is_signed(token, sig));
        assert_eq!(svc.take_staged_page(token, sig).await.as_deref(), Some("<p>hello</p>"));
        assert_eq!(svc.take_staged_page(token, sig).await, None);
    }

    #[tokio::test]
    async fn failed_print_drops_the_staged_page() {
        let svc = PdfService::new("/nonexistent/chromium-binary".into(), "http://localhost".into(), "s".into());
        assert!(svc.print_html("<p>hi</p>").await.is_err());
        assert!(svc.staged_pages.lock().await.is_empty());
    }

    #[tokio::test]
    async fn missing_browser_is_an_internal_error() {
        let svc = PdfService::new(
            "/nonexistent/chromium-binary".into(),
            "http://localhost".into(),
            "s".into(),
        );
        let err = svc.print_html("<p>hi</p>").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
