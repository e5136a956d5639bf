use std::collections::BTreeMap;

use serde_json::Value;
use shotgun_json_client::{FieldMap, FieldValue, RpcRequest};
use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::schema::SchemaMap;

impl super::ShotgunClient {
    /// Descriptors of every entity type. Always read from the server.
    #[instrument(skip(self))]
    pub async fn schema_entity_read(&mut self) -> Result<SchemaMap> {
        let results = self.call(&RpcRequest::SchemaEntityRead).await?.into_value();
        self.schema_map(results, "schema_entity_read")
    }

    /// Field descriptors of every entity type, keyed by entity type.
    #[instrument(skip(self))]
    pub async fn schema_read(&mut self) -> Result<BTreeMap<String, SchemaMap>> {
        let results = self.call(&RpcRequest::SchemaRead).await?.into_value();
        let Value::Object(entities) = results else {
            return Err(unexpected("schema_read", &results));
        };
        entities
            .into_iter()
            .map(|(entity_type, fields)| Ok((entity_type, self.schema_map(fields, "schema_read")?)))
            .collect()
    }

    /// Field descriptors of one entity type, or of one field when
    /// `field_name` is given.
    #[instrument(skip(self))]
    pub async fn schema_field_read(
        &mut self,
        entity_type: &str,
        field_name: Option<&str>,
    ) -> Result<SchemaMap> {
        let request = RpcRequest::SchemaFieldRead {
            entity_type: entity_type.to_string(),
            field_name: field_name.map(str::to_owned),
        };
        let results = self.call(&request).await?.into_value();
        self.schema_map(results, "schema_field_read")
    }

    /// Add a field. Returns the server's result unchanged, normally the new
    /// field's system name.
    #[instrument(skip(self, properties))]
    pub async fn schema_field_create(
        &mut self,
        entity_type: &str,
        data_type: &str,
        display_name: &str,
        properties: Option<&FieldMap>,
    ) -> Result<Value> {
        let request = RpcRequest::SchemaFieldCreate {
            entity_type: entity_type.to_string(),
            data_type: data_type.to_string(),
            display_name: display_name.to_string(),
            properties: properties.cloned().unwrap_or_default(),
        };
        Ok(self.call(&request).await?.into_value())
    }

    /// Change field properties. Returns the server's result unchanged.
    #[instrument(skip(self, properties))]
    pub async fn schema_field_update(
        &mut self,
        entity_type: &str,
        field_name: &str,
        properties: &FieldMap,
    ) -> Result<Value> {
        let request = RpcRequest::SchemaFieldUpdate {
            entity_type: entity_type.to_string(),
            field_name: field_name.to_string(),
            properties: properties.clone(),
        };
        Ok(self.call(&request).await?.into_value())
    }

    /// Remove a field. Returns the server's result unchanged.
    #[instrument(skip(self))]
    pub async fn schema_field_delete(&mut self, entity_type: &str, field_name: &str) -> Result<Value> {
        let request = RpcRequest::SchemaFieldDelete {
            entity_type: entity_type.to_string(),
            field_name: field_name.to_string(),
        };
        Ok(self.call(&request).await?.into_value())
    }

    /// Removed from the API; always fails without contacting the server.
    #[deprecated(note = "use schema_field_read instead")]
    pub fn schema(&self, _entity_type: &str) -> Result<SchemaMap> {
        Err(Error::new(ErrorKind::Deprecated {
            operation: "schema",
            replacement: "schema_field_read",
        }))
    }

    /// Removed from the API; always fails without contacting the server.
    #[deprecated(note = "use schema_entity_read instead")]
    pub fn entity_types(&self) -> Result<Vec<String>> {
        Err(Error::new(ErrorKind::Deprecated {
            operation: "entity_types",
            replacement: "schema_entity_read",
        }))
    }

    fn schema_map(&self, results: Value, method_name: &str) -> Result<SchemaMap> {
        let Value::Object(entries) = results else {
            return Err(unexpected(method_name, &results));
        };
        let codec = self.http.codec();
        entries
            .into_iter()
            .map(|(name, descriptor)| match codec.decode(descriptor) {
                FieldValue::Map(map) => Ok((name, map)),
                other => Err(Error::new(ErrorKind::UnexpectedResult(format!(
                    "{method_name}: descriptor of '{name}' is {other:?}, expected an object"
                )))),
            })
            .collect()
    }
}

fn unexpected(method_name: &str, results: &Value) -> Error {
    Error::new(ErrorKind::UnexpectedResult(format!(
        "{method_name} returned {results}, expected an object"
    )))
}
