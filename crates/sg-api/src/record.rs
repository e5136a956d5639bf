//! Entity records returned by the server.

use shotgun_json_client::{EntityRef, FieldMap, FieldValue};

use crate::error::{Error, ErrorKind, Result};

/// One entity: its type, id and whatever other fields were requested.
///
/// `type` and `id` are checked when the record is built, so every record in
/// hand has both.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    entity_type: String,
    id: i64,
    fields: FieldMap,
}

impl EntityRecord {
    pub fn new(entity_type: impl Into<String>, id: i64) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
            fields: FieldMap::new(),
        }
    }

    /// Build from a decoded value, which must be an entity reference or a
    /// map holding a string `type` and an integer `id`.
    pub fn from_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Entity(entity) => Ok(Self::new(entity.entity_type, entity.id)),
            FieldValue::Map(map) => Self::from_map(map),
            other => Err(Error::new(ErrorKind::InvalidRecord(format!(
                "expected an entity, got {other:?}"
            )))),
        }
    }

    /// Build from a field map, taking `type` and `id` out of it.
    pub fn from_map(mut fields: FieldMap) -> Result<Self> {
        let entity_type = match fields.remove("type") {
            Some(FieldValue::String(entity_type)) if !entity_type.is_empty() => entity_type,
            Some(other) => {
                return Err(Error::new(ErrorKind::InvalidRecord(format!(
                    "'type' must be a non-empty string, got {other:?}"
                ))))
            }
            None => {
                return Err(Error::new(ErrorKind::InvalidRecord(
                    "record has no 'type'".to_string(),
                )))
            }
        };
        let id = match fields.remove("id") {
            Some(FieldValue::Int(id)) => id,
            Some(other) => {
                return Err(Error::new(ErrorKind::InvalidRecord(format!(
                    "'id' of {entity_type} must be an integer, got {other:?}"
                ))))
            }
            None => {
                return Err(Error::new(ErrorKind::InvalidRecord(format!(
                    "{entity_type} record has no 'id'"
                ))))
            }
        };
        Ok(Self {
            entity_type,
            id,
            fields,
        })
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.entity_type.clone(), self.id)
    }

    /// Field value by name. `type` and `id` are not part of the field map.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// All fields including `type` and `id`.
    pub fn into_map(self) -> FieldMap {
        let mut map = self.fields;
        map.insert("type".to_string(), FieldValue::String(self.entity_type));
        map.insert("id".to_string(), FieldValue::Int(self.id));
        map
    }
}

impl From<EntityRecord> for FieldValue {
    fn from(record: EntityRecord) -> Self {
        FieldValue::Map(record.into_map())
    }
}
