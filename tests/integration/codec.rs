//! Value conversion through the public codec and through a live call.

use super::common::MockShotgun;
use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde_json::json;
use shotgun_json::api::{ClientConfig, EntityRef, FieldMap, FieldValue, FindQuery};
use shotgun_json::client::TypeCodec;

/// Values that survive a round trip. Datetimes come back as local time when
/// the codec converts, so those samples differ per setting.
fn sample_values(convert: bool) -> Vec<FieldValue> {
    let updated_at = Utc.with_ymd_and_hms(2011, 4, 27, 17, 2, 12).unwrap();
    let updated_at = if convert {
        FieldValue::LocalDateTime(updated_at.with_timezone(&Local).naive_local())
    } else {
        updated_at.into()
    };

    let mut nested = FieldMap::new();
    nested.insert("start".into(), NaiveDate::from_ymd_opt(2011, 4, 27).unwrap().into());
    nested.insert("owner".into(), EntityRef::new("HumanUser", 7).into());
    nested.insert("tags".into(), vec!["hero", "fx"].into());

    vec![
        FieldValue::Null,
        true.into(),
        42.into(),
        2.5.into(),
        "bunny_010".into(),
        NaiveDate::from_ymd_opt(1999, 12, 31).unwrap().into(),
        updated_at,
        EntityRef::new("Shot", 860).into(),
        FieldValue::List(vec![EntityRef::new("Asset", 1).into(), FieldValue::Null]),
        FieldValue::Map(nested),
    ]
}

#[test]
fn test_decode_inverts_encode() {
    for convert in [true, false] {
        let codec = TypeCodec::new(convert);
        for value in sample_values(convert) {
            assert_eq!(codec.decode(codec.encode(&value)), value, "convert={convert}");
        }
    }
}

#[test]
fn test_text_that_only_looks_like_a_date_stays_text() {
    let codec = TypeCodec::default();
    assert_eq!(
        codec.decode(json!("2011-04-27 notes")),
        FieldValue::String("2011-04-27 notes".into())
    );
    assert_eq!(codec.decode(json!("2011/04/27")), FieldValue::String("2011/04/27".into()));
    assert_eq!(codec.decode(json!("27/04/2011")), FieldValue::String("27/04/2011".into()));
    assert_eq!(codec.decode(json!("2011-4-27")), FieldValue::String("2011-4-27".into()));
}

#[test]
fn test_local_datetime_converted_to_utc() {
    let naive = NaiveDate::from_ymd_opt(2011, 4, 27)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let expected = Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap()
        .with_timezone(&Utc);

    let converting = TypeCodec::new(true);
    assert_eq!(
        converting.encode(&FieldValue::LocalDateTime(naive)),
        json!(expected.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    );

    let verbatim = TypeCodec::new(false);
    assert_eq!(
        verbatim.encode(&FieldValue::LocalDateTime(naive)),
        json!("2011-04-27T12:00:00Z")
    );
}

#[tokio::test]
async fn test_conversion_setting_reaches_the_wire() {
    let sg = MockShotgun::start(json!([2, 4, 0])).await;
    sg.results("read", json!({"entities": []})).await;

    let naive = NaiveDate::from_ymd_opt(2011, 4, 27)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let mut client = sg.client_with(ClientConfig::builder().with_convert_datetimes_to_utc(false).build());
    client
        .find(&FindQuery::new("Shot").filter("updated_at", "greater_than", naive))
        .await
        .unwrap();

    let condition = &sg.calls("read").await[0]["params"][1]["filters"]["conditions"][0];
    assert_eq!(condition["values"], json!(["2011-04-27T09:30:00Z"]));
}
