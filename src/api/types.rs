//! API response type definitions.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::api::redact::REDACTED;

/// Paginated edge response (`/{id}/media`, `/{id}/children`).
///
/// Entries stay as raw JSON so the archive can keep the payload verbatim.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Paging block of an edge response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    /// Fully qualified URL of the next page. Absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

/// Cursor pair of a paging block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl Paging {
    /// Cursor for the following page.
    ///
    /// The API keeps returning cursors on the final page; only the presence
    /// of `next` says another page exists.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_ref()?;
        self.cursors
            .as_ref()?
            .after
            .as_deref()
            .filter(|c| !c.is_empty())
    }
}

/// Identity check response (`/{user-id}?fields=id,username`).
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Long-lived token returned by the token exchange endpoint.
#[derive(Clone, Deserialize)]
pub struct LongLivedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds until expiry.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl fmt::Debug for LongLivedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LongLivedToken")
            .field("access_token", &REDACTED)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Error envelope returned by the Graph API on failures.
#[derive(Debug, Deserialize)]
pub struct GraphErrorEnvelope {
    pub error: GraphError,
}

/// Error detail inside [`GraphErrorEnvelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}

impl GraphError {
    /// Extract the error detail from a response body, if it has one.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<GraphErrorEnvelope>(body)
            .ok()
            .map(|e| e.error)
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let message = self.message.as_deref().unwrap_or("Unknown error");
        match (&self.kind, self.code) {
            (Some(kind), Some(code)) => format!("{} ({} code {})", message, kind, code),
            (Some(kind), None) => format!("{} ({})", message, kind),
            (None, Some(code)) => format!("{} (code {})", message, code),
            (None, None) => message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cursor_requires_next_link() {
        let last: ListResponse = serde_json::from_str(
            r#"{"data":[],"paging":{"cursors":{"before":"b","after":"a"}}}"#,
        )
        .unwrap();
        assert_eq!(last.paging.unwrap().next_cursor(), None);

        let more: ListResponse = serde_json::from_str(
            r#"{"data":[{"id":"1"}],"paging":{"cursors":{"after":"QVFI"},"next":"https://x/next"}}"#,
        )
        .unwrap();
        assert_eq!(more.data.len(), 1);
        assert_eq!(more.paging.unwrap().next_cursor(), Some("QVFI"));
    }

    #[test]
    fn test_graph_error_summary() {
        let err = GraphError::from_body(
            r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190}}"#,
        )
        .unwrap();
        assert_eq!(
            err.summary(),
            "Invalid OAuth access token. (OAuthException code 190)"
        );
        assert!(GraphError::from_body("<html>").is_none());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = LongLivedToken {
            access_token: "EAAGsecretsecret".to_string(),
            token_type: Some("bearer".to_string()),
            expires_in: Some(5_183_944),
        };
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("EAAGsecretsecret"));
        assert!(rendered.contains(REDACTED));
    }
}
