//! # Image Loading
//!
//! Turns an uploaded file or a remote URL into an embedded `ImageData`
//! reference. Google Drive share links are rewritten into direct-download
//! links before fetching.

use crate::{errors::ExtractError, types::ImageData};
use base64::Engine;
use reqwest::{header::CONTENT_TYPE, Client as ReqwestClient};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Media type used when the source does not declare one.
pub const FALLBACK_MIME: &str = "application/octet-stream";

const DRIVE_HOST: &str = "drive.google.com";

fn encode_data_url(bytes: &[u8], mime: &str) -> ImageData {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    let data_url = format!("data:{mime};base64,{b64}");
    ImageData::new(mime.to_string(), bytes.len(), data_url)
}

/// Wraps uploaded bytes as an embedded image reference.
///
/// Returns `None` for an empty upload. A missing or blank `declared_mime`
/// falls back to `application/octet-stream`.
pub fn file_to_data_url(bytes: &[u8], declared_mime: Option<&str>) -> Option<ImageData> {
    if bytes.is_empty() {
        return None;
    }
    let mime = declared_mime
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(FALLBACK_MIME);
    Some(encode_data_url(bytes, mime))
}

/// Maps an upload's file extension to its declared media type.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())?;
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Reads an image file from disk as an upload.
///
/// Returns `Ok(None)` when the file is empty.
pub async fn load_image_file(path: &Path) -> Result<Option<ImageData>, ExtractError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ExtractError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
    let mime = mime_from_extension(path);
    if mime.is_none() {
        warn!(
            "Unrecognized image extension for {}; sending as {FALLBACK_MIME}",
            path.display()
        );
    }
    let image = file_to_data_url(&bytes, mime);
    if let Some(image) = &image {
        info!("Loaded {} ({} bytes)", path.display(), image.byte_len());
    }
    Ok(image)
}

/// Rewrites Google Drive share links into direct-download links.
///
/// Both `...?id=<id>` and `.../file/d/<id>/...` forms map to
/// `https://drive.google.com/uc?export=download&id=<id>`, with or without a
/// scheme on the input. Any other URL is returned unchanged.
pub fn normalize_drive_url(url: &str) -> String {
    if !url.contains(DRIVE_HOST) {
        return url.to_string();
    }
    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{url}")));
    let Ok(parsed) = parsed else {
        return url.to_string();
    };

    let query_id = parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned());
    let path_id = || {
        let segments: Vec<&str> = parsed.path_segments()?.collect();
        segments
            .windows(3)
            .find(|w| w[0] == "file" && w[1] == "d")
            .map(|w| w[2].to_string())
    };

    match query_id.or_else(path_id).filter(|id| !id.is_empty()) {
        Some(file_id) => format!("https://{DRIVE_HOST}/uc?export=download&id={file_id}"),
        None => url.to_string(),
    }
}

/// Downloads an image from `url` and embeds it.
///
/// Fails on a non-success status, on a `Content-Type` that is not `image/*`, or
/// on a transport error. The URL is fetched as given; see `load_image_url` for
/// the Drive rewrite.
pub async fn fetch_image_url(
    client: &ReqwestClient,
    url: &str,
    timeout: Duration,
) -> Result<ImageData, ExtractError> {
    debug!("Fetching image from {url}");
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ExtractError::ImageFetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::ImageFetch(format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(ExtractError::NotAnImage(content_type));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::ImageFetch(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ExtractError::MissingImage);
    }

    info!("Fetched image ({content_type}, {} bytes)", bytes.len());
    Ok(encode_data_url(&bytes, &content_type))
}

/// Normalizes `url` and fetches the image it points to.
pub async fn load_image_url(
    client: &ReqwestClient,
    url: &str,
    timeout: Duration,
) -> Result<ImageData, ExtractError> {
    let normalized = normalize_drive_url(url.trim());
    if normalized != url.trim() {
        debug!("Rewrote Drive link to {normalized}");
    }
    fetch_image_url(client, &normalized, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_upload_is_absent() {
        assert!(file_to_data_url(&[], Some("image/png")).is_none());
    }

    #[test]
    fn test_upload_without_mime_uses_fallback() {
        let image = file_to_data_url(b"abc", None).unwrap();
        assert_eq!(image.mime(), FALLBACK_MIME);
        assert_eq!(
            image.as_data_url(),
            "data:application/octet-stream;base64,YWJj"
        );

        let blank = file_to_data_url(b"abc", Some("  ")).unwrap();
        assert_eq!(blank.mime(), FALLBACK_MIME);
    }

    #[test]
    fn test_upload_keeps_declared_mime() {
        let image = file_to_data_url(&[0x89, 0x50, 0x4e, 0x47], Some("image/png")).unwrap();
        assert_eq!(image.as_data_url(), "data:image/png;base64,iVBORw==");
        assert_eq!(image.byte_len(), 4);
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(
            mime_from_extension(&PathBuf::from("a/pack.JPG")),
            Some("image/jpeg")
        );
        assert_eq!(
            mime_from_extension(&PathBuf::from("pack.webp")),
            Some("image/webp")
        );
        assert_eq!(mime_from_extension(&PathBuf::from("pack.bmp")), None);
        assert_eq!(mime_from_extension(&PathBuf::from("pack")), None);
    }

    #[test]
    fn test_drive_forms_normalize_to_same_url() {
        let expected = "https://drive.google.com/uc?export=download&id=1AbC-xyz_9";
        assert_eq!(
            normalize_drive_url("https://drive.google.com/file/d/1AbC-xyz_9/view?usp=sharing"),
            expected
        );
        assert_eq!(
            normalize_drive_url("https://drive.google.com/open?id=1AbC-xyz_9&authuser=0"),
            expected
        );
        assert_eq!(normalize_drive_url(expected), expected);
    }

    #[test]
    fn test_drive_links_without_scheme_normalize() {
        let expected = "https://drive.google.com/uc?export=download&id=ABC";
        assert_eq!(normalize_drive_url("drive.google.com/file/d/ABC/view"), expected);
        assert_eq!(normalize_drive_url("drive.google.com/open?id=ABC"), expected);
    }

    #[test]
    fn test_drive_id_match_is_exact_key() {
        let url = "https://drive.google.com/drive/folders/xyz?ouid=123";
        assert_eq!(normalize_drive_url(url), url);
    }

    #[test]
    fn test_non_drive_urls_are_unchanged() {
        let url = "https://example.com/file/d/123/view?id=456";
        assert_eq!(normalize_drive_url(url), url);
    }

    #[test]
    fn test_unrecognized_drive_url_is_unchanged() {
        let url = "https://drive.google.com/drive/folders/xyz";
        assert_eq!(normalize_drive_url(url), url);
    }
}
