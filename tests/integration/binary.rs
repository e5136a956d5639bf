//! Upload and download against a mock server.

use super::common::{MockShotgun, SCRIPT_KEY};
use serde_json::json;
use shotgun_json::api::UploadOptions;
use std::io::Write;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_upload_then_download() {
    let sg = MockShotgun::with_token_auth().await;
    Mock::given(method("POST"))
        .and(path("/upload/upload_file"))
        .and(body_string_contains(SCRIPT_KEY))
        .and(body_string_contains("name=\"tag_list\""))
        .respond_with(ResponseTemplate::new(200).set_body_string("1:314\n"))
        .expect(1)
        .mount(&sg.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file_serve/314"))
        .and(header("Cookie", "_session_id=token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("editorial notes"))
        .expect(1)
        .mount(&sg.server)
        .await;

    let mut notes = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    notes.write_all(b"editorial notes").unwrap();

    let mut client = sg.client();
    let attachment_id = client
        .upload(
            "Shot",
            860,
            notes.path(),
            UploadOptions::new().with_tag_list("editorial"),
        )
        .await
        .unwrap();
    assert_eq!(attachment_id, 314);

    let body = client.download_attachment(attachment_id).await.unwrap();
    assert_eq!(&body[..], b"editorial notes");
    assert_eq!(sg.calls("get_session_token").await.len(), 1);
}

#[tokio::test]
async fn test_upload_thumbnail_failure_is_transport_error() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    Mock::given(method("POST"))
        .and(path("/upload/publish_thumbnail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&sg.server)
        .await;

    let mut image = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    image.write_all(b"not really a jpeg").unwrap();

    let mut client = sg.client();
    let err = client
        .upload_thumbnail("Asset", 2, image.path(), Some("turntable"))
        .await
        .unwrap_err();
    assert!(err.is_transport_error(), "{err}");
}

#[tokio::test]
async fn test_download_to_file_streams_body() {
    let sg = MockShotgun::with_token_auth().await;
    let payload: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    Mock::given(method("GET"))
        .and(path("/file_serve/77"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&sg.server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("plate.dpx");

    let mut client = sg.client();
    let written = client.download_attachment_to(77, &dest).await.unwrap();
    assert_eq!(written, payload.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), payload);
}
