//! Shared fixtures for integration tests against a wiremock Graph API.

#![allow(dead_code)]

use std::path::Path;

use ig_archive::Config;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_ID: &str = "17841400000000000";
pub const TOKEN: &str = "EAAGsecrettokenvalue0123456789";
pub const VERSION: &str = "v19.0";

/// Config pointed at `server` with millisecond backoff and no pacing.
pub fn test_config(server: &MockServer, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.account.user_id = USER_ID.to_string();
    config.account.access_token = TOKEN.to_string();
    config.api.base_url = server.uri();
    config.api.timeout_secs = 5;
    config.api.max_attempts = 3;
    config.api.download_attempts = 2;
    config.api.backoff_base_ms = 1;
    config.api.backoff_max_ms = 5;
    config.archive.output_dir = output_dir.to_path_buf();
    config.archive.item_delay_ms = 0;
    config.archive.show_progress = false;
    config
}

pub fn api_path(suffix: &str) -> String {
    format!("/{}/{}", VERSION, suffix)
}

pub fn media_path() -> String {
    api_path(&format!("{}/media", USER_ID))
}

/// A listed image or video entry whose file lives at `/cdn/<file>`.
pub fn media_entry(server: &MockServer, id: &str, media_type: &str, file: &str) -> Value {
    json!({
        "id": id,
        "caption": format!("caption of {}", id),
        "media_type": media_type,
        "media_url": format!("{}/cdn/{}", server.uri(), file),
        "permalink": format!("https://www.instagram.com/p/{}/", id),
        "timestamp": "2024-03-01T10:00:00+0000"
    })
}

/// A listed carousel entry with its children embedded.
pub fn carousel_entry(server: &MockServer, id: &str, files: &[&str]) -> Value {
    let children: Vec<Value> = files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            json!({
                "id": format!("{}_{}", id, i + 1),
                "media_type": "IMAGE",
                "media_url": format!("{}/cdn/{}", server.uri(), file),
            })
        })
        .collect();

    json!({
        "id": id,
        "caption": "carousel",
        "media_type": "CAROUSEL_ALBUM",
        "permalink": format!("https://www.instagram.com/p/{}/", id),
        "timestamp": "2024-03-02T08:30:00+0000",
        "children": { "data": children }
    })
}

/// Listing page body. `next` adds a cursor and a `next` link.
pub fn page_body(entries: Vec<Value>, next: Option<&str>) -> Value {
    match next {
        Some(cursor) => json!({
            "data": entries,
            "paging": {
                "cursors": { "before": "b", "after": cursor },
                "next": format!("https://graph.facebook.com/{}/{}/media?after={}", VERSION, USER_ID, cursor)
            }
        }),
        None => json!({
            "data": entries,
            "paging": { "cursors": { "before": "b", "after": "last" } }
        }),
    }
}

pub async fn mount_identity(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api_path(USER_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": USER_ID, "username": "tester" })),
        )
        .mount(server)
        .await;
}

/// First listing page (no `after` parameter).
pub async fn mount_first_page(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(media_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(u8::MAX)
        .mount(server)
        .await;
}

/// Listing page requested with `after=<cursor>`.
pub async fn mount_page_after(server: &MockServer, cursor: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(media_path()))
        .and(query_param("after", cursor))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Binary at `/cdn/<file>`; `expected` is checked when the server drops.
pub async fn mount_file(server: &MockServer, file: &str, bytes: &[u8], expected: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/cdn/{}", file)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()));
    let mock = match expected {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

/// Every file under `root`, relative path and bytes, sorted.
pub fn snapshot_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut out = Vec::new();
    collect(root, root, &mut out);
    out.sort();
    out
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            out.push((rel, std::fs::read(&path).unwrap()));
        }
    }
}
