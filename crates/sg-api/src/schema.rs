//! Schema descriptors and an opt-in cache.

use std::collections::{BTreeMap, HashMap};

use shotgun_json_client::FieldMap;

use crate::client::ShotgunClient;
use crate::error::Result;

/// Properties describing one entity type or one field, e.g. `name`,
/// `data_type`, `editable`. Each property is a map with at least `value`.
pub type SchemaDescriptor = FieldMap;

/// Entity type (or field name) to descriptor.
pub type SchemaMap = BTreeMap<String, SchemaDescriptor>;

/// Caches schema reads for callers that want it. The client itself never
/// caches; invalidate after creating, updating or deleting fields.
#[derive(Debug, Default, Clone)]
pub struct SchemaCache {
    entities: Option<SchemaMap>,
    fields: HashMap<String, SchemaMap>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity descriptors, read from the server on first use.
    pub async fn entities(&mut self, client: &mut ShotgunClient) -> Result<&SchemaMap> {
        let entities = match self.entities.take() {
            Some(entities) => entities,
            None => client.schema_entity_read().await?,
        };
        Ok(self.entities.insert(entities))
    }

    /// Field descriptors of one entity type, read from the server on first use.
    pub async fn fields(
        &mut self,
        client: &mut ShotgunClient,
        entity_type: &str,
    ) -> Result<&SchemaMap> {
        if !self.fields.contains_key(entity_type) {
            let fetched = client.schema_field_read(entity_type, None).await?;
            self.fields.insert(entity_type.to_string(), fetched);
        }
        Ok(self.fields.entry(entity_type.to_string()).or_default())
    }

    /// Drop cached fields of one entity type.
    pub fn invalidate_entity(&mut self, entity_type: &str) {
        self.fields.remove(entity_type);
    }

    /// Drop everything.
    pub fn invalidate(&mut self) {
        self.entities = None;
        self.fields.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_none() && self.fields.is_empty()
    }
}
