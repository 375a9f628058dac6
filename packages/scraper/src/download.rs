//! Saves judgment and order documents linked from search results.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::PortalConfig;

/// Name used when sanitizing leaves nothing.
const FALLBACK_FILE_NAME: &str = "document";

/// Errors from [`download_document`].
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document URL: {0}")]
    InvalidUrl(String),
}

/// Makes `name` safe to use as a file name.
///
/// Keeps ASCII letters, digits, `.`, `_`, and `-`; turns every run of other
/// characters into a single `_`; trims leading and trailing `.` and `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// File name for a case's document: the sanitized case identifier with a
/// `.pdf` extension.
#[must_use]
pub fn document_file_name(case_id: &str) -> String {
    let mut name = sanitize_filename(case_id);
    if !Path::new(&name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    {
        name.push_str(".pdf");
    }
    name
}

/// Downloads `url` into `dest_dir` and returns the saved path.
///
/// # Errors
///
/// * [`DownloadError::InvalidUrl`] if `url` is not an absolute http(s) URL
/// * [`DownloadError::Status`] if the server answers with a non-2xx status
/// * [`DownloadError::Http`] / [`DownloadError::Io`] on transfer or write
///   failures
pub async fn download_document(
    config: &PortalConfig,
    url: &str,
    dest_dir: &Path,
    case_id: &str,
) -> Result<PathBuf, DownloadError> {
    let parsed = Url::parse(url.trim()).map_err(|e| DownloadError::InvalidUrl(format!("{url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DownloadError::InvalidUrl(url.to_owned()));
    }

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?;

    log::info!("Downloading {parsed}");
    let response = client.get(parsed).send().await?;
    if !response.status().is_success() {
        return Err(DownloadError::Status(response.status().as_u16()));
    }
    let bytes = response.bytes().await?;

    tokio::fs::create_dir_all(dest_dir).await?;
    let path = dest_dir.join(document_file_name(case_id));
    tokio::fs::write(&path, &bytes).await?;

    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_case_identifiers() {
        assert_eq!(sanitize_filename("W.P.(C) 11180/2025"), "W.P._C_11180_2025");
        assert_eq!(sanitize_filename("CRL.M.C.-558/2025"), "CRL.M.C.-558_2025");
    }

    #[test]
    fn trims_leading_and_trailing_separators() {
        assert_eq!(sanitize_filename("..hidden file.."), "hidden_file");
        assert_eq!(sanitize_filename("/etc/passwd"), "etc_passwd");
    }

    #[test]
    fn falls_back_when_nothing_survives() {
        assert_eq!(sanitize_filename(""), "document");
        assert_eq!(sanitize_filename("///"), "document");
    }

    #[test]
    fn names_documents_after_case() {
        assert_eq!(document_file_name("W.P.(C) 11180/2025"), "W.P._C_11180_2025.pdf");
        assert_eq!(document_file_name("FAO-1/2024"), "FAO-1_2024.pdf");
        assert_eq!(document_file_name("order.PDF"), "order.PDF");
        assert_eq!(document_file_name(""), "document.pdf");
    }

    #[tokio::test]
    async fn rejects_non_http_urls() {
        let dir = std::env::temp_dir();
        let err = download_document(&PortalConfig::default(), "file:///etc/passwd", &dir, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));

        let err = download_document(&PortalConfig::default(), "not a url", &dir, "x")
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }
}
