//! Failures below the RPC layer surface as transport errors and are never
//! retried.

use super::common::{MockShotgun, SCRIPT_KEY, SCRIPT_NAME};
use serde_json::json;
use shotgun_json::api::{ScriptCredentials, ShotgunClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn reply_to_delete(sg: &MockShotgun, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method_name": "delete"})))
        .respond_with(response)
        .mount(&sg.server)
        .await;
}

#[tokio::test]
async fn test_server_error_status() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    reply_to_delete(&sg, ResponseTemplate::new(503).set_body_string("maintenance")).await;

    let mut client = sg.client();
    let err = client.delete("Shot", 1).await.unwrap_err();
    assert!(err.is_transport_error(), "{err}");
    assert!(err.to_string().contains("503"));
    assert_eq!(sg.calls("delete").await.len(), 1);
}

#[tokio::test]
async fn test_html_reply_is_not_a_fault() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    reply_to_delete(
        &sg,
        ResponseTemplate::new(200).set_body_raw("<html>proxy login</html>", "text/html"),
    )
    .await;

    let mut client = sg.client();
    let err = client.delete("Shot", 1).await.unwrap_err();
    assert!(err.is_transport_error());
    assert!(!err.is_fault());
}

#[tokio::test]
async fn test_empty_reply() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    reply_to_delete(&sg, ResponseTemplate::new(200).set_body_raw("", "application/json")).await;

    let mut client = sg.client();
    assert!(client.delete("Shot", 1).await.unwrap_err().is_transport_error());
}

#[tokio::test]
async fn test_redirect_not_followed() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    reply_to_delete(
        &sg,
        ResponseTemplate::new(302).insert_header("Location", "https://sso.example.com/login"),
    )
    .await;

    let mut client = sg.client();
    let err = client.delete("Shot", 1).await.unwrap_err();
    assert!(err.is_transport_error());
    assert!(err.to_string().contains("sso.example.com"));
}

#[tokio::test]
async fn test_fault_message_is_sanitized() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.fault(
        "delete",
        &format!("Bad request {{\"script_key\": \"{SCRIPT_KEY}\"}}"),
        103,
        1,
    )
    .await;

    let mut client = sg.client();
    let err = client.delete("Shot", 1).await.unwrap_err();
    assert!(err.is_fault());
    assert!(!err.to_string().contains(SCRIPT_KEY), "{err}");
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut client = ShotgunClient::new(ScriptCredentials::new(uri, SCRIPT_NAME, SCRIPT_KEY)).unwrap();
    let err = client.info().await.unwrap_err();
    assert!(err.is_transport_error(), "{err}");
    assert!(client.cached_server_caps().is_none());
}

#[tokio::test]
async fn test_url_credentials_become_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api3/json"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": [2, 4, 0]})))
        .expect(1)
        .mount(&server)
        .await;

    let url = server.uri().replacen("http://", "http://user:pass@", 1);
    let mut client = ShotgunClient::new(ScriptCredentials::new(url, SCRIPT_NAME, SCRIPT_KEY)).unwrap();
    client.connect().await.unwrap();
    assert!(!client.endpoint().host().contains("user"));
}
