//! Secret redaction for anything that ends up in a log line or error.

use url::Url;

/// Placeholder written in place of a secret value.
pub const REDACTED: &str = "REDACTED";

/// Whether a query parameter name carries a credential.
pub fn is_sensitive_param(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("token") || lower.contains("secret")
}

/// Render a URL with every sensitive query value replaced by [`REDACTED`].
pub fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if is_sensitive_param(&k) {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Like [`redact_url`] for a raw string. Unparseable input loses its whole
/// query string rather than risk leaking it.
pub fn redact_url_str(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => redact_url(&url),
        Err(_) => raw.split('?').next().unwrap_or_default().to_string(),
    }
}

/// Render request parameters as `k=v&k=v` with sensitive values redacted.
pub fn redact_params<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            let k = k.as_ref();
            if is_sensitive_param(k) {
                format!("{}={}", k, REDACTED)
            } else {
                format!("{}={}", k, v.as_ref())
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}
