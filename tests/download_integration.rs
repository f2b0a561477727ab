//! Integration tests for the download module.
//!
//! These tests verify the full download flow with mock HTTP servers.

mod support;

use std::path::Path;

use support::site_fixture::{SITE_ID, mount_content, mount_site, site_client};
use support::socket_guard::start_mock_server_or_skip;
use tempfile::TempDir;
use vaultdl_core::download::{
    BATCH_COMPLETE_MESSAGE, DownloadError, DownloadItem, HttpClient, download_batch,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_file(server: &MockServer, path_str: &str, status: u16, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

fn item(server: &MockServer, name: &str, path_str: &str) -> DownloadItem {
    DownloadItem::new(name, format!("{}{path_str}", server.uri()))
}

/// A localhost port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"\x89PNG\r\n\x1a\nnot really a png";
    mount_file(&server, "/files/cover.png", 200, content).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().unwrap();
    let url = format!("{}/files/cover.png", server.uri());
    let file = client
        .download_named(&url, temp_dir.path(), "cover.png")
        .await
        .unwrap();

    assert_eq!(file.path, temp_dir.path().join("cover.png"));
    assert_eq!(file.bytes, content.len() as u64);
    assert_eq!(std::fs::read(&file.path).unwrap(), content);
}

#[tokio::test]
async fn test_download_overwrites_existing_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/a.txt", 200, b"new").await;
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("a.txt"), b"old content").unwrap();

    let client = HttpClient::new().unwrap();
    client
        .download_named(&format!("{}/a.txt", server.uri()), temp_dir.path(), "a.txt")
        .await
        .unwrap();

    assert_eq!(std::fs::read(temp_dir.path().join("a.txt")).unwrap(), b"new");
}

#[tokio::test]
async fn test_download_http_error_leaves_no_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/gone.png", 404, b"").await;
    let temp_dir = TempDir::new().unwrap();

    let client = HttpClient::new().unwrap();
    let result = client
        .download_named(&format!("{}/gone.png", server.uri()), temp_dir.path(), "gone.png")
        .await;

    match result {
        Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected HttpStatus error, got {other:?}"),
    }
    assert!(!temp_dir.path().join("gone.png").exists());
}

#[tokio::test]
async fn test_download_hostile_name_stays_in_output_dir() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/x", 200, b"data").await;
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");
    std::fs::create_dir(&output_dir).unwrap();

    let client = HttpClient::new().unwrap();
    let file = client
        .download_named(&format!("{}/x", server.uri()), &output_dir, "../../escape.png")
        .await
        .unwrap();

    assert_eq!(file.path, output_dir.join("escape.png"));
    assert!(!temp_dir.path().join("escape.png").exists());
}

#[tokio::test]
async fn test_batch_middle_failure_does_not_abort() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/1.png", 200, b"one").await;
    mount_file(&server, "/2.png", 500, b"").await;
    mount_file(&server, "/3.mp3", 200, b"three").await;
    let temp_dir = TempDir::new().unwrap();
    let items = vec![
        item(&server, "1.png", "/1.png"),
        item(&server, "2.png", "/2.png"),
        item(&server, "3.mp3", "/3.mp3"),
    ];
    let mut events: Vec<(u8, String)> = Vec::new();

    let client = HttpClient::new().unwrap();
    let report = download_batch(&client, &items, temp_dir.path(), |pct, msg| {
        events.push((pct, msg.to_string()));
    })
    .await
    .unwrap();

    assert_eq!(report.completed_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.failed()[0].item.name, "2.png");
    assert!(report.failed()[0].error.contains("500"));
    assert_eq!(std::fs::read(temp_dir.path().join("1.png")).unwrap(), b"one");
    assert!(!temp_dir.path().join("2.png").exists());
    assert_eq!(std::fs::read(temp_dir.path().join("3.mp3")).unwrap(), b"three");

    assert_eq!(
        events,
        vec![
            (0, "Downloading 1.png...".to_string()),
            (33, "Downloading 2.png...".to_string()),
            (66, "Downloading 3.mp3...".to_string()),
            (100, BATCH_COMPLETE_MESSAGE.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_batch_refused_connection_does_not_abort() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/1.png", 200, b"one").await;
    mount_file(&server, "/3.mp3", 200, b"three").await;
    let temp_dir = TempDir::new().unwrap();
    let refused = format!("http://127.0.0.1:{}/2.png", closed_port());
    let items = vec![
        item(&server, "1.png", "/1.png"),
        DownloadItem::new("2.png", refused.clone()),
        item(&server, "3.mp3", "/3.mp3"),
    ];

    let client = HttpClient::new().unwrap();
    let report = download_batch(&client, &items, temp_dir.path(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.completed_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.failed()[0].item.url, refused);
    assert!(report.failed()[0].error.contains("network error"), "{}", report.failed()[0].error);
    assert!(!temp_dir.path().join("2.png").exists());
    assert_eq!(std::fs::read(temp_dir.path().join("3.mp3")).unwrap(), b"three");
}

#[tokio::test]
async fn test_batch_progress_is_monotonic() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let names: Vec<String> = (0..7).map(|i| format!("f{i}.bin")).collect();
    for name in &names {
        mount_file(&server, &format!("/{name}"), 200, b"x").await;
    }
    let items: Vec<DownloadItem> = names
        .iter()
        .map(|name| item(&server, name, &format!("/{name}")))
        .collect();
    let temp_dir = TempDir::new().unwrap();
    let mut percents = Vec::new();

    let client = HttpClient::new().unwrap();
    let report = download_batch(&client, &items, temp_dir.path(), |pct, _| percents.push(pct))
        .await
        .unwrap();

    assert_eq!(report.completed_count(), 7);
    assert!(percents.windows(2).all(|pair| pair[0] <= pair[1]), "{percents:?}");
    assert!(percents.iter().all(|pct| *pct <= 100));
    assert_eq!(percents.last(), Some(&100));
}

#[tokio::test]
async fn test_batch_creates_missing_output_dir() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/a.png", 200, b"a").await;
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("deep/nested/media");

    let client = HttpClient::new().unwrap();
    let items = [item(&server, "a.png", "/a.png")];
    let report = download_batch(&client, &items, &output_dir, |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.completed_count(), 1);
    assert!(Path::new(&output_dir).join("a.png").is_file());
}

#[tokio::test]
async fn test_document_media_download_end_to_end() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_site(&server, &["notes/trip.md", "img/photo one.jpg", "clips/run.mp4"]).await;
    mount_content(&server, "notes/trip.md", b"![[photo one.jpg]]\n![clip](run.mp4)\n").await;
    mount_content(&server, "img/photo%20one.jpg", b"jpeg").await;
    mount_content(&server, "clips/run.mp4", b"mp4").await;

    let site = site_client(&server);
    let session = site.open_session().await.unwrap();
    let view = site
        .fetch_document_media(&session, "notes/trip.md")
        .await
        .unwrap();
    let items: Vec<DownloadItem> = view.media.iter().map(DownloadItem::from).collect();
    assert_eq!(
        items[0].url,
        format!("{}/access/{SITE_ID}/img/photo%20one.jpg", server.uri())
    );

    let temp_dir = TempDir::new().unwrap();
    let client = HttpClient::new().unwrap();
    let report = download_batch(&client, &items, temp_dir.path(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.completed_count(), 2);
    assert_eq!(std::fs::read(temp_dir.path().join("photo one.jpg")).unwrap(), b"jpeg");
    assert_eq!(std::fs::read(temp_dir.path().join("run.mp4")).unwrap(), b"mp4");
}

#[tokio::test]
async fn test_single_entry_download_uses_final_segment() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_site(&server, &["docs/manual.pdf"]).await;
    mount_content(&server, "docs/manual.pdf", b"%PDF").await;

    let site = site_client(&server);
    let session = site.open_session().await.unwrap();
    let entry = DownloadItem::for_entry(session.site(), "docs/manual.pdf");

    let temp_dir = TempDir::new().unwrap();
    let client = HttpClient::new().unwrap();
    let report = download_batch(&client, &[entry], temp_dir.path(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.completed_count(), 1);
    assert_eq!(report.written()[0].path, temp_dir.path().join("manual.pdf"));
}
