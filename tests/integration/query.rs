//! find, find_one and find_page against a mock server.

use super::common::MockShotgun;
use chrono::{TimeZone, Utc};
use serde_json::json;
use shotgun_json::api::{
    ClientCapabilities, ClientConfig, Direction, EntityRef, FieldValue, Filter, FilterOperator,
    FindQuery, Platform,
};

#[tokio::test]
async fn test_find_forwards_every_parameter() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("read", json!({"entities": []})).await;

    let mut client = sg.client();
    let since = Utc.with_ymd_and_hms(2011, 4, 27, 17, 2, 12).unwrap();
    let query = FindQuery::new("Version")
        .filter("created_at", "greater_than", since)
        .condition(Filter::with_values("id", "between", vec![10.into(), 20.into()]))
        .filter_operator(FilterOperator::Any)
        .fields(["code", "user"])
        .order_by("created_at", Direction::Desc)
        .order_by("code", Direction::Asc)
        .limit(25)
        .page(2)
        .retired_only(true);

    let versions = client.find(&query).await.unwrap();
    assert!(versions.is_empty());

    let params = &sg.calls("read").await[0]["params"][1];
    assert_eq!(
        params,
        &json!({
            "type": "Version",
            "return_fields": ["code", "user"],
            "filters": {
                "logical_operator": "or",
                "conditions": [
                    {"path": "created_at", "relation": "greater_than", "values": ["2011-04-27T17:02:12Z"]},
                    {"path": "id", "relation": "between", "values": [10, 20]},
                ],
            },
            "return_only": "retired",
            "paging": {"entities_per_page": 25, "current_page": 2},
            "return_paging_info": true,
            "sorts": [
                {"field_name": "created_at", "direction": "desc"},
                {"field_name": "code", "direction": "asc"},
            ],
        })
    );
}

#[tokio::test]
async fn test_find_one_and_limited_find_agree() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results(
        "read",
        json!({"entities": [{"type": "Shot", "id": 3, "code": "bunny_030", "sg_sequence": {"type": "Sequence", "id": 1}}]}),
    )
    .await;

    let mut client = sg.client();
    let query = FindQuery::new("Shot")
        .filter("code", "is", "bunny_030")
        .fields(["code", "sg_sequence"]);

    let one = client.find_one(&query).await.unwrap().expect("a match");
    let limited = client.find(&query.clone().limit(1)).await.unwrap();
    assert_eq!(limited, vec![one.clone()]);
    assert_eq!(
        one.get("sg_sequence"),
        Some(&FieldValue::Entity(EntityRef::new("Sequence", 1)))
    );
}

#[tokio::test]
async fn test_find_one_no_match() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("read", json!({"entities": [], "paging_info": {"entity_count": 0}})).await;

    let mut client = sg.client();
    let found = client
        .find_one(&FindQuery::new("Shot").filter("code", "is", "nope"))
        .await
        .unwrap();
    assert_eq!(found, None);
}

#[tokio::test]
async fn test_walking_pages() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results_once(
        "read",
        json!({
            "entities": [{"type": "Asset", "id": 1}, {"type": "Asset", "id": 2}],
            "paging_info": {"entity_count": 3, "current_page": 1, "entities_per_page": 2, "page_count": 2},
        }),
    )
    .await;
    sg.results_once(
        "read",
        json!({
            "entities": [{"type": "Asset", "id": 3}],
            "paging_info": {"entity_count": 3, "current_page": 2, "entities_per_page": 2, "page_count": 2},
        }),
    )
    .await;

    let mut client = sg.client();
    let mut ids = Vec::new();
    let mut page_number = 1;
    loop {
        let page = client
            .find_page(&FindQuery::new("Asset").limit(2).page(page_number))
            .await
            .unwrap();
        ids.extend(page.entities.iter().map(|e| e.id()));
        if !page.has_more() {
            break;
        }
        page_number += 1;
    }

    assert_eq!(ids, vec![1, 2, 3]);
    let pages: Vec<_> = sg
        .calls("read")
        .await
        .iter()
        .map(|c| c["params"][1]["paging"]["current_page"].clone())
        .collect();
    assert_eq!(pages, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn test_configured_page_size_used_without_limit() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("read", json!({"entities": []})).await;

    let mut client = sg.client_with(ClientConfig::builder().with_records_per_page(100).build());
    client.find(&FindQuery::new("Shot")).await.unwrap();

    let params = &sg.calls("read").await[0]["params"][1];
    assert_eq!(params["paging"]["entities_per_page"], 100);
}

#[tokio::test]
async fn test_local_file_links_rewritten() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results(
        "read",
        json!({"entities": [{
            "type": "Version",
            "id": 8,
            "sg_path_to_movie": {
                "link_type": "local",
                "name": "cut.mov",
                "local_path_linux": "/mnt/show/cut.mov",
                "local_path_windows": "S:\\show\\cut.mov",
            },
        }]}),
    )
    .await;

    let mut client = sg.client();
    client.set_client_caps(ClientCapabilities::for_platform(Some(Platform::Linux)));
    let version = client
        .find_one(&FindQuery::new("Version").fields(["sg_path_to_movie"]))
        .await
        .unwrap()
        .unwrap();

    let link = version.get("sg_path_to_movie").and_then(FieldValue::as_map).unwrap();
    assert_eq!(link.get("local_path").and_then(FieldValue::as_str), Some("/mnt/show/cut.mov"));
    assert_eq!(link.get("url").and_then(FieldValue::as_str), Some("file://mnt/show/cut.mov"));
}
