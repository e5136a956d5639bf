//! Session token lifecycle as seen through `ShotgunClient`.

use super::common::{MockShotgun, SCRIPT_KEY, SCRIPT_NAME};
use serde_json::json;
use shotgun_json::api::SessionState;

#[tokio::test]
async fn test_handshake_once_for_many_calls() {
    let sg = MockShotgun::with_token_auth().await;
    sg.results("delete", json!(true)).await;

    let mut client = sg.client();
    assert_eq!(client.session().state(), SessionState::Unauthenticated);

    for id in 1..=3 {
        assert!(client.delete("Shot", id).await.unwrap());
    }

    assert_eq!(client.session().state(), SessionState::Authenticated);
    assert_eq!(sg.calls("get_session_token").await.len(), 1);
    for call in sg.calls("delete").await {
        assert_eq!(call["params"][0]["session_token"], "token-1");
        assert_eq!(call["params"][0]["script_name"], SCRIPT_NAME);
    }
}

#[tokio::test]
async fn test_older_server_sends_script_key_only() {
    let sg = MockShotgun::start(json!([2, 4, 12])).await;
    sg.results("revive", json!(false)).await;

    let mut client = sg.client();
    assert!(!client.revive("Asset", 5).await.unwrap());

    assert!(sg.calls("get_session_token").await.is_empty());
    assert_eq!(
        sg.calls("revive").await[0]["params"][0],
        json!({"script_name": SCRIPT_NAME, "script_key": SCRIPT_KEY})
    );
}

#[tokio::test]
async fn test_expired_session_retried_once() {
    let sg = MockShotgun::with_token_auth().await;
    sg.fault("update", "Session token has expired", 102, 1).await;
    sg.results("update", json!({"type": "Shot", "id": 10, "code": "renamed"})).await;

    let mut client = sg.client();
    let mut fields = shotgun_json::FieldMap::new();
    fields.insert("code".into(), "renamed".into());
    let shot = client.update("Shot", 10, &fields).await.unwrap();
    assert_eq!(shot.id(), 10);

    let updates = sg.calls("update").await;
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["params"][0]["session_token"], "token-1");
    assert_eq!(updates[1]["params"][0]["session_token"], "token-2");
    assert_eq!(client.session().current_token(), Some("token-2"));
}

#[tokio::test]
async fn test_second_rejection_raises_instead_of_looping() {
    let sg = MockShotgun::with_token_auth().await;
    sg.fault("delete", "Session token has expired", 102, 5).await;

    let mut client = sg.client();
    let err = client.delete("Shot", 1).await.unwrap_err();

    assert!(err.is_session_expired(), "{err}");
    assert_eq!(sg.calls("delete").await.len(), 2);
    assert_eq!(sg.calls("get_session_token").await.len(), 2);
    assert_eq!(client.session().state(), SessionState::Expired);
}

#[tokio::test]
async fn test_other_faults_are_not_retried() {
    let sg = MockShotgun::with_token_auth().await;
    sg.fault("delete", "Entity Shot 1 does not exist", 103, 5).await;

    let mut client = sg.client();
    let err = client.delete("Shot", 1).await.unwrap_err();

    assert!(err.is_fault());
    assert!(err.to_string().contains("does not exist"));
    assert_eq!(sg.calls("delete").await.len(), 1);
}

#[tokio::test]
async fn test_session_uuid_follows_setter() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("delete", json!(true)).await;

    let creds = sg.credentials().with_session_uuid("uuid-from-env");
    let mut client = shotgun_json::ShotgunClient::new(creds).unwrap();
    client.delete("Shot", 1).await.unwrap();
    client.set_session_uuid(Some("uuid-from-browser"));
    client.delete("Shot", 2).await.unwrap();
    client.set_session_uuid(None);
    client.delete("Shot", 3).await.unwrap();

    let uuids: Vec<_> = sg
        .calls("delete")
        .await
        .into_iter()
        .map(|c| c["params"][0].get("session_uuid").cloned())
        .collect();
    assert_eq!(
        uuids,
        vec![Some(json!("uuid-from-env")), Some(json!("uuid-from-browser")), None]
    );
}

#[tokio::test]
async fn test_info_needs_no_credentials() {
    let sg = MockShotgun::start(json!([3, 1, 0, "Dev"])).await;

    let mut client = sg.client();
    let info = client.info().await.unwrap();
    assert_eq!(info["version"], json!([3, 1, 0, "Dev"]));

    let call = &sg.calls("info").await[0];
    assert_eq!(call["params"], json!([]));

    let caps = client.server_caps().await.unwrap();
    assert!(caps.is_dev());
    assert!(caps.supports_session_token_auth());
}
