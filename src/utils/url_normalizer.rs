//! URL validation and canonicalisation.
//!
//! Ensures that two spellings of the same address de-duplicate to one record by
//! storing the parser's canonical serialisation.

use url::Url;

/// Schemes accepted for shortening.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only http, https, ftp and ftps URLs are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: only `http`, `https`, `ftp` and `ftps`
/// 2. **Scheme and hostname**: lowercased
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS, 21 for FTP)
/// 4. **Empty path**: becomes `/`
/// 5. **Query and fragment**: preserved as-is
///
/// Rejects `javascript:`, `data:`, `file:` and other schemes, as well as
/// URLs without a host.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path").unwrap(),
///     "https://example.com/Path"
/// );
/// assert_eq!(normalize_url("https://a.test").unwrap(), "https://a.test/");
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let url = Url::parse(input.trim())
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlNormalizationError::MissingHost),
    }

    Ok(url.to_string())
}
