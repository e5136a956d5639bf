//! Schema reads and field edits against a mock server.

use super::common::MockShotgun;
use serde_json::json;
use shotgun_json::api::{FieldMap, FieldValue, SchemaCache};

#[tokio::test]
async fn test_schema_reads_hit_server_every_time() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results(
        "schema_entity_read",
        json!({"Shot": {"name": {"value": "Shot", "editable": false}}}),
    )
    .await;

    let mut client = sg.client();
    let first = client.schema_entity_read().await.unwrap();
    let second = client.schema_entity_read().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(sg.calls("schema_entity_read").await.len(), 2);

    let name = first["Shot"]["name"].as_map().unwrap();
    assert_eq!(name.get("value"), Some(&FieldValue::String("Shot".into())));
}

#[tokio::test]
async fn test_schema_cache_is_opt_in() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results(
        "schema_field_read",
        json!({"code": {"data_type": {"value": "text"}}, "sg_status_list": {"data_type": {"value": "status_list"}}}),
    )
    .await;

    let mut client = sg.client();
    let mut cache = SchemaCache::new();
    for _ in 0..3 {
        assert_eq!(cache.fields(&mut client, "Shot").await.unwrap().len(), 2);
    }
    assert_eq!(sg.calls("schema_field_read").await.len(), 1);

    cache.invalidate();
    cache.fields(&mut client, "Shot").await.unwrap();
    assert_eq!(sg.calls("schema_field_read").await.len(), 2);
}

#[tokio::test]
async fn test_field_create_update_delete() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("schema_field_create", json!("sg_frame_count")).await;
    sg.results("schema_field_update", json!(true)).await;
    sg.results("schema_field_delete", json!(true)).await;

    let mut client = sg.client();

    let created = client
        .schema_field_create("Shot", "number", "Frame Count", None)
        .await
        .unwrap();
    assert_eq!(created, json!("sg_frame_count"));

    let mut properties = FieldMap::new();
    properties.insert("description".into(), "Frames in the cut".into());
    assert_eq!(
        client
            .schema_field_update("Shot", "sg_frame_count", &properties)
            .await
            .unwrap(),
        json!(true)
    );
    assert_eq!(
        client
            .schema_field_delete("Shot", "sg_frame_count")
            .await
            .unwrap(),
        json!(true)
    );

    assert_eq!(sg.calls("schema_field_create").await.len(), 1);
    assert_eq!(
        sg.calls("schema_field_update").await[0]["params"][1],
        json!({
            "type": "Shot",
            "field_name": "sg_frame_count",
            "properties": [{"property_name": "description", "value": "Frames in the cut"}],
        })
    );
    assert_eq!(
        sg.calls("schema_field_delete").await[0]["params"][1],
        json!({"type": "Shot", "field_name": "sg_frame_count"})
    );
}

#[tokio::test]
#[allow(deprecated)]
async fn test_retired_schema_calls() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    let client = sg.client();

    assert!(client.schema("Shot").unwrap_err().is_deprecated());
    assert!(client.entity_types().unwrap_err().is_deprecated());
    assert!(sg.server.received_requests().await.unwrap_or_default().is_empty());
}
