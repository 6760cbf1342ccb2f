//! Template image loading.
//!
//! The certificate background is a static asset addressed by path (or URL
//! when a deployment serves assets from a CDN). Decoded templates are kept
//! in-process so repeated renders skip the disk read and JPEG decode.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use image::DynamicImage;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::CertError;

static TEMPLATE_CACHE: Lazy<Mutex<HashMap<String, Arc<DynamicImage>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn assets_dir() -> PathBuf {
    let project_root = std::env::var("PROJECT_ROOT")
        .unwrap_or_else(|_| env!("CARGO_MANIFEST_DIR").to_string());
    PathBuf::from(project_root).join("assets").join("images")
}

/// Resolve the certificate template reference for this deployment.
pub fn template_path() -> String {
    if let Ok(p) = std::env::var("TEMPLATE_PATH") {
        return p;
    }
    assets_dir()
        .join("certificate-template.jpg")
        .to_string_lossy()
        .to_string()
}

/// Load and decode a template image, caching the decoded bitmap keyed by
/// reference. `http(s)://` references are fetched with the shared client;
/// anything else is read from disk.
pub async fn load_template(
    http: &reqwest::Client,
    reference: &str,
) -> Result<Arc<DynamicImage>, CertError> {
    if let Some(img) = TEMPLATE_CACHE.lock().get(reference) {
        return Ok(Arc::clone(img));
    }

    let bytes = if reference.starts_with("http://") || reference.starts_with("https://") {
        let resp = http
            .get(reference)
            .send()
            .await
            .map_err(|e| CertError::Template(format!("failed to fetch template: {e}")))?;
        if !resp.status().is_success() {
            return Err(CertError::Template(format!(
                "failed to fetch template: http {}",
                resp.status()
            )));
        }
        resp.bytes()
            .await
            .map_err(|e| CertError::Template(format!("failed to fetch template: {e}")))?
            .to_vec()
    } else {
        tokio::fs::read(reference)
            .await
            .map_err(|e| CertError::Template(format!("failed to read template {reference}: {e}")))?
    };

    let img = image::load_from_memory(&bytes)
        .map_err(|e| CertError::Template(format!("failed to decode template: {e}")))?;

    let img = Arc::new(img);
    TEMPLATE_CACHE
        .lock()
        .insert(reference.to_string(), Arc::clone(&img));
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_template_file_is_a_template_error() {
        let http = reqwest::Client::new();
        let err = load_template(&http, "/nonexistent/certificate-template.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, CertError::Template(_)));
    }

    #[test]
    fn template_path_points_at_the_certificate_asset() {
        assert!(template_path().ends_with("certificate-template.jpg"));
    }
}
