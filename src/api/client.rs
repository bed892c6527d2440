//! Instagram Graph API HTTP client.

use std::time::{Duration, Instant};

use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use url::Url;

use crate::api::redact::{redact_params, redact_url};
use crate::api::retry::{classify_status, RetryPolicy, StatusClass};
use crate::api::types::{GraphError, Identity, ListResponse, LongLivedToken};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::media::{parse_child, parse_media_item, ChildItem, Page};

/// Fields requested from the media listing edge.
pub const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,thumbnail_url,permalink,timestamp,children{id,media_type,media_url,thumbnail_url}";

/// Fields requested from the children edge.
pub const CHILDREN_FIELDS: &str = "id,media_type,media_url,thumbnail_url,timestamp";

const USER_AGENT: &str = concat!("ig-archive/", env!("CARGO_PKG_VERSION"));

/// Graph API client with retry and token redaction.
pub struct GraphApi {
    client: Client,
    /// `<base_url>/<version>/`
    base: Url,
    token: String,
    timeout: Duration,
    api_retry: RetryPolicy,
    download_retry: RetryPolicy,
}

impl GraphApi {
    /// Create a new API client from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e.without_url())))?;

        let base = Url::parse(&format!(
            "{}/{}/",
            config.api.base_url.trim_end_matches('/'),
            config.api.version
        ))?;

        Ok(Self {
            client,
            base,
            token: config.account.access_token.clone(),
            timeout: config.timeout(),
            api_retry: RetryPolicy::for_api(&config.api),
            download_retry: RetryPolicy::for_downloads(&config.api),
        })
    }

    /// Per-request timeout; also the idle limit between download chunks.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve an endpoint path against the versioned base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// GET `url` with `params`, retrying transient failures.
    ///
    /// Returns the status and body of a 2xx response. A 4xx other than 429
    /// fails at once with [`Error::HttpStatus`]; 429, 5xx and transport
    /// errors are retried and end in [`Error::Transient`].
    pub async fn fetch(&self, url: &Url, params: &[(&str, &str)]) -> Result<(u16, String)> {
        let mut url = url.clone();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        tracing::debug!("GET {} [{}]", redact_url(&url), redact_params(params));

        let response = self
            .send_with_retry(&url, &self.api_retry, Some(self.timeout))
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok((status, body))
    }

    /// Authenticated GET decoded from JSON.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path)?;
        let mut params = params.to_vec();
        params.push(("access_token", self.token.as_str()));

        let (_, body) = self.fetch(&url, &params).await?;

        // Some failures come back as 200 with an error envelope.
        if let Some(err) = GraphError::from_body(&body) {
            return Err(Error::Api(err.summary()));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::Api(format!(
                "Failed to parse response from {}: {} - Response: {}",
                path,
                e,
                body.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Issue a GET, retrying per `policy`, logging one line per attempt.
    async fn send_with_retry(
        &self,
        url: &Url,
        policy: &RetryPolicy,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let shown = redact_url(url);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let started = Instant::now();

            let mut request = self.client.get(url.clone());
            if let Some(timeout) = timeout {
                request = request.timeout(timeout);
            }

            // Bounds the wait for headers; downloads carry no reqwest timeout.
            let sent = tokio::time::timeout(self.timeout, request.send()).await;

            let reason = match sent {
                Err(_) => {
                    tracing::warn!(
                        "GET {} got no response within {}s (attempt {}/{})",
                        shown,
                        self.timeout.as_secs(),
                        attempt,
                        policy.max_attempts
                    );
                    format!("no response within {}s", self.timeout.as_secs())
                }
                Ok(Ok(response)) => {
                    let status = response.status().as_u16();
                    let elapsed = started.elapsed().as_millis();

                    match classify_status(status) {
                        StatusClass::Success => {
                            tracing::info!(
                                "GET {} -> {} in {}ms (attempt {}/{})",
                                shown,
                                status,
                                elapsed,
                                attempt,
                                policy.max_attempts
                            );
                            return Ok(response);
                        }
                        StatusClass::Permanent => {
                            tracing::warn!(
                                "GET {} -> {} in {}ms (attempt {}/{}), not retrying",
                                shown,
                                status,
                                elapsed,
                                attempt,
                                policy.max_attempts
                            );
                            let body = response.text().await.unwrap_or_default();
                            let message = GraphError::from_body(&body)
                                .map(|e| e.summary())
                                .unwrap_or_else(|| format!("HTTP {}", status));
                            return Err(Error::HttpStatus {
                                status,
                                url: shown,
                                message,
                            });
                        }
                        StatusClass::Transient => {
                            tracing::warn!(
                                "GET {} -> {} in {}ms (attempt {}/{})",
                                shown,
                                status,
                                elapsed,
                                attempt,
                                policy.max_attempts
                            );
                            format!("HTTP {}", status)
                        }
                    }
                }
                Ok(Err(e)) => {
                    let e = e.without_url();
                    tracing::warn!(
                        "GET {} failed in {}ms (attempt {}/{}): {}",
                        shown,
                        started.elapsed().as_millis(),
                        attempt,
                        policy.max_attempts,
                        e
                    );
                    e.to_string()
                }
            };

            if !policy.has_attempts_left(attempt) {
                return Err(Error::Transient {
                    url: shown,
                    attempts: attempt,
                    reason,
                });
            }

            let delay = policy.delay_for_attempt(attempt);
            tracing::info!("Retrying in {:.1} seconds...", delay.as_secs_f64());
            sleep(delay).await;
        }
    }

    /// Verify the token by reading the account's own id and username.
    ///
    /// Any rejection, or a token that resolves to another account, is an
    /// [`Error::Authentication`].
    pub async fn identity(&self, user_id: &str) -> Result<Identity> {
        let identity: Identity = self
            .get_json(user_id, &[("fields", "id,username")])
            .await
            .map_err(|e| match e {
                Error::HttpStatus {
                    status, message, ..
                } => Error::Authentication(format!("HTTP {}: {}", status, message)),
                Error::Api(message) => Error::Authentication(message),
                other => other,
            })?;

        if identity.id != user_id {
            return Err(Error::Authentication(format!(
                "Token belongs to account {}, not {}; check IG_USER_ID",
                identity.id, user_id
            )));
        }

        Ok(identity)
    }

    /// Fetch one page of the account's media, newest first.
    pub async fn list_media(
        &self,
        user_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<Page> {
        let limit = page_size.to_string();
        let mut params = vec![("fields", MEDIA_FIELDS), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            params.push(("after", cursor));
        }

        let response: ListResponse = self
            .get_json(&format!("{}/media", user_id), &params)
            .await?;

        let next_cursor = response
            .paging
            .as_ref()
            .and_then(|p| p.next_cursor())
            .map(str::to_string);

        let mut items = Vec::with_capacity(response.data.len());
        let mut unreadable = 0;
        for entry in response.data {
            match parse_media_item(entry) {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!("Skipping unreadable media entry: {}", e);
                    unreadable += 1;
                }
            }
        }

        Ok(Page {
            items,
            next_cursor,
            unreadable,
        })
    }

    /// Fetch every child of a carousel, in API order.
    pub async fn list_children(&self, media_id: &str) -> Result<Vec<ChildItem>> {
        let path = format!("{}/children", media_id);
        let mut children = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params = vec![("fields", CHILDREN_FIELDS)];
            if let Some(ref c) = cursor {
                params.push(("after", c.as_str()));
            }

            let response: ListResponse = self.get_json(&path, &params).await?;
            children.extend(response.data.iter().filter_map(parse_child));

            cursor = response
                .paging
                .as_ref()
                .and_then(|p| p.next_cursor())
                .map(str::to_string);
            if cursor.is_none() {
                break;
            }
        }

        Ok(children)
    }

    /// Start a binary download. The body is left for the caller to stream.
    ///
    /// Only the wait for response headers is bounded here; the caller limits
    /// idle time between body chunks.
    pub async fn download(&self, url: &str) -> Result<Response> {
        let url = Url::parse(url)?;
        self.send_with_retry(&url, &self.download_retry, None)
            .await
    }

    /// Exchange a short-lived user token for a long-lived one.
    pub async fn exchange_token(
        &self,
        short_lived_token: &str,
        app_id: &str,
        app_secret: &str,
    ) -> Result<LongLivedToken> {
        let url = self.endpoint("oauth/access_token")?;
        let params = [
            ("grant_type", "fb_exchange_token"),
            ("client_id", app_id),
            ("client_secret", app_secret),
            ("fb_exchange_token", short_lived_token),
        ];

        let (_, body) = self.fetch(&url, &params).await?;

        if let Some(err) = GraphError::from_body(&body) {
            return Err(Error::Authentication(err.summary()));
        }

        serde_json::from_str(&body).map_err(|_| {
            Error::Api("Token exchange response missing access_token".to_string())
        })
    }
}

/// Content-Type of a response, if present and readable.
pub fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_api(base_url: &str) -> GraphApi {
        let mut config = Config::default();
        config.api.base_url = base_url.to_string();
        config.account.access_token = "EAAGtesttokentesttoken".to_string();
        GraphApi::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_includes_version() {
        let api = test_api("https://graph.facebook.com/");
        assert_eq!(
            api.endpoint("/17841400/media").unwrap().as_str(),
            "https://graph.facebook.com/v19.0/17841400/media"
        );
        assert_eq!(
            api.endpoint("oauth/access_token").unwrap().as_str(),
            "https://graph.facebook.com/v19.0/oauth/access_token"
        );
    }
}
