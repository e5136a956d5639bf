//! Conversion between [`FieldValue`] and the JSON wire representation.
//!
//! Outbound, dates become `YYYY-MM-DD` and datetimes become
//! `YYYY-MM-DDTHH:MM:SSZ` in UTC. Inbound, strings that look like either
//! format are parsed back; anything that fails to parse is kept as a string.
//! With UTC conversion on, inbound datetimes come back as naive local time,
//! so a local datetime survives a round trip unchanged.
//! Entity references travel as `{"type": .., "id": ..}` objects.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex_lite::Regex;
use serde_json::{Map, Number, Value};

use crate::value::{EntityRef, FieldMap, FieldValue};

/// Wire format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for datetimes, always UTC.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\D?(0[1-9]|1[0-2])\D?([12]\d|0[1-9]|3[01])$").unwrap()
});

static DATETIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})\D?(0[1-9]|1[0-2])\D?([12]\d|0[1-9]|3[01])(\D?([01]\d|2[0-3])\D?([0-5]\d)\D?([0-5]\d)?\D?(\d{3})?)?$",
    )
    .unwrap()
});

/// Encodes outbound values and decodes inbound ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCodec {
    convert_datetimes_to_utc: bool,
}

impl Default for TypeCodec {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TypeCodec {
    /// With `convert_datetimes_to_utc` set, naive datetimes are taken as
    /// local time and inbound datetimes are decoded as local time; otherwise
    /// both sides stay in UTC.
    pub fn new(convert_datetimes_to_utc: bool) -> Self {
        Self {
            convert_datetimes_to_utc,
        }
    }

    pub fn converts_datetimes_to_utc(&self) -> bool {
        self.convert_datetimes_to_utc
    }

    /// Encode a value for the wire.
    ///
    /// Non-finite floats have no JSON form and encode as `null`.
    pub fn encode(&self, value: &FieldValue) -> Value {
        match value {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(n) => Value::Number((*n).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            FieldValue::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
            FieldValue::LocalDateTime(naive) => {
                Value::String(self.naive_to_utc(*naive).format(DATETIME_FORMAT).to_string())
            }
            FieldValue::Time(time) => {
                let today = Local::now().date_naive().and_time(*time);
                Value::String(self.naive_to_utc(today).format(DATETIME_FORMAT).to_string())
            }
            FieldValue::Entity(entity) => {
                let mut map = Map::new();
                map.insert("type".into(), Value::String(entity.entity_type.clone()));
                map.insert("id".into(), Value::Number(entity.id.into()));
                Value::Object(map)
            }
            FieldValue::List(items) => Value::Array(items.iter().map(|v| self.encode(v)).collect()),
            FieldValue::Map(map) => Value::Object(self.encode_map(map)),
        }
    }

    /// Encode every value of a field map.
    pub fn encode_map(&self, map: &FieldMap) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| (key.clone(), self.encode(value)))
            .collect()
    }

    /// Decode a wire value.
    pub fn decode(&self, value: Value) -> FieldValue {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => self.decode_string(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(|v| self.decode(v)).collect())
            }
            Value::Object(map) => self.decode_object(map),
        }
    }

    /// Decode every value of a JSON object.
    pub fn decode_map(&self, map: Map<String, Value>) -> FieldMap {
        map.into_iter()
            .map(|(key, value)| (key, self.decode(value)))
            .collect()
    }

    fn decode_object(&self, map: Map<String, Value>) -> FieldValue {
        if map.len() == 2 {
            if let (Some(Value::String(entity_type)), Some(id)) =
                (map.get("type"), map.get("id").and_then(Value::as_i64))
            {
                return FieldValue::Entity(EntityRef::new(entity_type.clone(), id));
            }
        }
        FieldValue::Map(self.decode_map(map))
    }

    fn decode_string(&self, s: String) -> FieldValue {
        if s.len() >= 19 && DATETIME_PATTERN.is_match(&s) {
            return match NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT) {
                Ok(naive) if self.convert_datetimes_to_utc => FieldValue::LocalDateTime(
                    naive.and_utc().with_timezone(&Local).naive_local(),
                ),
                Ok(naive) => FieldValue::DateTime(naive.and_utc()),
                Err(_) => FieldValue::String(s),
            };
        }
        if s.len() >= 10 && DATE_PATTERN.is_match(&s) {
            return match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                Ok(date) => FieldValue::Date(date),
                Err(_) => FieldValue::String(s),
            };
        }
        FieldValue::String(s)
    }

    fn naive_to_utc(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        if !self.convert_datetimes_to_utc {
            return naive.and_utc();
        }
        // Times skipped by a DST transition have no local instant.
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc())
    }
}
