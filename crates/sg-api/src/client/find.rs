use serde_json::Value;
use shotgun_json_client::RpcRequest;
use tracing::instrument;

use crate::error::{Error, ErrorKind, Result};
use crate::query::{FindPage, FindQuery, PagingInfo};
use crate::record::EntityRecord;

impl super::ShotgunClient {
    /// Run a query and return the matching entities.
    #[instrument(skip(self, query), fields(entity_type = %query.entity_type()))]
    pub async fn find(&mut self, query: &FindQuery) -> Result<Vec<EntityRecord>> {
        Ok(self.find_page(query).await?.entities)
    }

    /// Run a query and return at most one entity, or `None` when nothing
    /// matches.
    #[instrument(skip(self, query), fields(entity_type = %query.entity_type()))]
    pub async fn find_one(&mut self, query: &FindQuery) -> Result<Option<EntityRecord>> {
        let single = query.clone().limit(1);
        Ok(self.find_page(&single).await?.entities.into_iter().next())
    }

    /// Run a query and return the page together with the server's paging
    /// summary, when the server provides one.
    pub async fn find_page(&mut self, query: &FindQuery) -> Result<FindPage> {
        let has_paging = self.server_caps().await?.has_paging();
        let params = query.to_read_params(self.config().records_per_page, has_paging);

        let results = self.call(&RpcRequest::Read(params)).await?.into_value();
        let (entities, paging_info) = split_read_results(results)?;

        let mut records = entities
            .into_iter()
            .map(|entity| self.to_record(entity, query.entity_type(), None))
            .collect::<Result<Vec<_>>>()?;
        self.post_process(&mut records).await?;

        Ok(FindPage {
            entities: records,
            paging_info,
        })
    }
}

fn split_read_results(results: Value) -> Result<(Vec<Value>, Option<PagingInfo>)> {
    let mut results = match results {
        Value::Object(map) => map,
        Value::Null => return Ok((Vec::new(), None)),
        other => {
            return Err(Error::new(ErrorKind::UnexpectedResult(format!(
                "read returned {other}, expected an object"
            ))))
        }
    };

    let paging_info = match results.remove("paging_info") {
        Some(Value::Null) | None => None,
        Some(info) => Some(serde_json::from_value(info)?),
    };
    let entities = match results.remove("entities") {
        Some(Value::Array(entities)) => entities,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            return Err(Error::new(ErrorKind::UnexpectedResult(format!(
                "read entities must be a list, got {other}"
            ))))
        }
    };
    Ok((entities, paging_info))
}
