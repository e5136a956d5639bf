use serde_json::Value;
use shotgun_json_client::{FieldMap, RpcRequest};
use tracing::{info, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::record::EntityRecord;

impl super::ShotgunClient {
    /// Create an entity and return it with the requested fields.
    ///
    /// `return_fields` empty means just `type` and `id`.
    #[instrument(skip(self, fields))]
    pub async fn create(
        &mut self,
        entity_type: &str,
        fields: &FieldMap,
        return_fields: &[&str],
    ) -> Result<EntityRecord> {
        require_entity_type(entity_type)?;
        let request = RpcRequest::Create {
            entity_type: entity_type.to_string(),
            fields: fields.clone(),
            return_fields: return_fields.iter().map(|f| f.to_string()).collect(),
        };

        let created = self.call(&request).await?.into_first();
        let mut records = vec![self.to_record(created, entity_type, None)?];
        self.post_process(&mut records).await?;

        let record = records.remove(0);
        info!(id = record.id(), "Created entity");
        Ok(record)
    }

    /// Update fields of one entity and return its new values.
    #[instrument(skip(self, fields))]
    pub async fn update(
        &mut self,
        entity_type: &str,
        id: i64,
        fields: &FieldMap,
    ) -> Result<EntityRecord> {
        require_entity_type(entity_type)?;
        let request = RpcRequest::Update {
            entity_type: entity_type.to_string(),
            id,
            fields: fields.clone(),
        };

        let updated = self.call(&request).await?.into_first();
        let mut records = vec![self.to_record(updated, entity_type, Some(id))?];
        self.post_process(&mut records).await?;
        Ok(records.remove(0))
    }

    /// Retire an entity.
    ///
    /// Returns the server's answer: `false` means the entity was already
    /// retired, which is not an error.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, entity_type: &str, id: i64) -> Result<bool> {
        require_entity_type(entity_type)?;
        let request = RpcRequest::Delete {
            entity_type: entity_type.to_string(),
            id,
        };
        expect_bool(&request, self.call(&request).await?.into_value())
    }

    /// Bring a retired entity back. `false` means it was not retired.
    #[instrument(skip(self))]
    pub async fn revive(&mut self, entity_type: &str, id: i64) -> Result<bool> {
        require_entity_type(entity_type)?;
        let request = RpcRequest::Revive {
            entity_type: entity_type.to_string(),
            id,
        };
        expect_bool(&request, self.call(&request).await?.into_value())
    }
}

fn require_entity_type(entity_type: &str) -> Result<()> {
    if entity_type.trim().is_empty() {
        return Err(Error::new(ErrorKind::InvalidInput(
            "entity type must not be empty".to_string(),
        )));
    }
    Ok(())
}

fn expect_bool(request: &RpcRequest, value: Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        Error::new(ErrorKind::UnexpectedResult(format!(
            "{} returned {value}, expected a boolean",
            request.method_name()
        )))
    })
}
