//! URL validation

use url::Url;

/// Check that `url_str` is an absolute http(s) URL with a host
///
/// Loopback and private addresses are allowed: local presets point at them.
pub fn validate_http_url(url_str: &str, context: &str) -> Result<(), String> {
    let url =
        Url::parse(url_str).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "{} must use http:// or https:// scheme, got: {}",
                context, scheme
            ));
        }
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(format!("{} URL must have a valid host", context)),
    }
}
