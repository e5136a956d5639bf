//! create, update, delete and revive against a mock server.

use super::common::MockShotgun;
use chrono::NaiveDate;
use serde_json::json;
use shotgun_json::api::{EntityRef, FieldMap, FieldValue};

#[tokio::test]
async fn test_create_version() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("create", json!({"type": "Version", "id": 1})).await;

    let mut client = sg.client();
    let mut data = FieldMap::new();
    data.insert("code".into(), "bunny_010_0010_comp_v001".into());
    data.insert("entity".into(), EntityRef::new("Shot", 860).into());
    data.insert("sg_status_list".into(), "rev".into());

    let version = client.create("Version", &data, &["id"]).await.unwrap();
    assert_eq!(version.entity_type(), "Version");
    assert_eq!(version.id(), 1);
}

#[tokio::test]
async fn test_lifecycle() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results(
        "create",
        json!([{"type": "Task", "id": 50, "content": "Comp", "due_date": "2011-05-01"}]),
    )
    .await;
    sg.results("update", json!([{"type": "Task", "id": 50, "due_date": "2011-05-08"}])).await;
    sg.results_once("delete", json!(true)).await;
    sg.results_once("delete", json!(false)).await;
    sg.results_once("revive", json!(true)).await;
    sg.results_once("revive", json!(false)).await;

    let mut client = sg.client();

    let mut data = FieldMap::new();
    data.insert("content".into(), "Comp".into());
    data.insert("due_date".into(), NaiveDate::from_ymd_opt(2011, 5, 1).unwrap().into());
    let task = client
        .create("Task", &data, &["content", "due_date"])
        .await
        .unwrap();
    assert_eq!(task.get("due_date").and_then(FieldValue::as_date), NaiveDate::from_ymd_opt(2011, 5, 1));

    let create_params = &sg.calls("create").await[0]["params"][1];
    assert!(create_params["fields"]
        .as_array()
        .unwrap()
        .contains(&json!({"field_name": "due_date", "value": "2011-05-01"})));

    let mut change = FieldMap::new();
    change.insert("due_date".into(), NaiveDate::from_ymd_opt(2011, 5, 8).unwrap().into());
    let task = client.update("Task", task.id(), &change).await.unwrap();
    assert_eq!(task.get("due_date").and_then(FieldValue::as_date), NaiveDate::from_ymd_opt(2011, 5, 8));

    assert!(client.delete("Task", 50).await.unwrap());
    assert!(!client.delete("Task", 50).await.unwrap());
    assert!(client.revive("Task", 50).await.unwrap());
    assert!(!client.revive("Task", 50).await.unwrap());

    assert_eq!(
        sg.calls("delete").await[0]["params"][1],
        json!({"type": "Task", "id": 50})
    );
}

#[tokio::test]
async fn test_update_clears_field_with_null() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("update", json!({"type": "Shot", "id": 4, "description": null})).await;

    let mut client = sg.client();
    let mut change = FieldMap::new();
    change.insert("description".into(), FieldValue::Null);
    let shot = client.update("Shot", 4, &change).await.unwrap();

    assert_eq!(shot.get("description"), Some(&FieldValue::Null));
    assert_eq!(
        sg.calls("update").await[0]["params"][1]["fields"],
        json!([{"field_name": "description", "value": null}])
    );
}
