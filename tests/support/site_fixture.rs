//! A mock publishing site: landing page, directory listing and content.

use serde_json::{Value, json};
use vaultdl_core::{SiteClient, SiteClientConfig, UrlScheme};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SITE_ID: &str = "abc123";
pub const LANDING_PATH: &str = "/home";

/// Landing page HTML that publishes `server` as the content host.
#[must_use]
pub fn landing_html(server: &MockServer) -> String {
    format!(
        r#"<!doctype html><html><head><script src="/app.js"></script><script>
  window.siteInfo = {{"uid":"{SITE_ID}","host":"{}","status":"active"}};
</script></head><body></body></html>"#,
        server.address()
    )
}

#[must_use]
pub fn landing_url(server: &MockServer) -> String {
    format!("{}{LANDING_PATH}", server.uri())
}

/// Directory object whose keys are `paths`, each with small metadata.
#[must_use]
pub fn directory_json(paths: &[&str]) -> Value {
    let mut entries = serde_json::Map::new();
    for path in paths {
        entries.insert((*path).to_string(), json!({ "hash": "00", "size": 1 }));
    }
    Value::Object(entries)
}

pub async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LANDING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_html(server)))
        .mount(server)
        .await;
}

pub async fn mount_directory(server: &MockServer, paths: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/cache/{SITE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(directory_json(paths)))
        .mount(server)
        .await;
}

/// Serves `body` at the access URL of `encoded_path` (already percent-encoded).
pub async fn mount_content(server: &MockServer, encoded_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/access/{SITE_ID}/{encoded_path}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

pub async fn mount_site(server: &MockServer, paths: &[&str]) {
    mount_landing(server).await;
    mount_directory(server, paths).await;
}

/// Site client pointed at the mock landing page, using plain HTTP content URLs.
#[must_use]
pub fn site_client(server: &MockServer) -> SiteClient {
    SiteClient::new(SiteClientConfig {
        landing_url: landing_url(server),
        content_scheme: UrlScheme::Http,
        ..SiteClientConfig::default()
    })
    .expect("site client should build")
}
