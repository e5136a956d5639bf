//! JSON-RPC envelope: request payloads and reply classification.
//!
//! Every call is a POST of `{"method_name": .., "params": [..]}` to the API
//! path. Authenticated calls carry an auth block as the first param, the
//! method's own params (if any) follow.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::codec::TypeCodec;
use crate::error::{Error, ErrorKind, Result};
use crate::filter::{Filter, FilterOperator, Order};
use crate::response::sanitize_error_message;
use crate::value::FieldMap;

/// Credentials attached to every authenticated call.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthBlock {
    script_name: String,
    script_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<String>,
}

impl fmt::Debug for AuthBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthBlock")
            .field("script_name", &self.script_name)
            .field("script_key", &"[REDACTED]")
            .field("session_uuid", &self.session_uuid)
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AuthBlock {
    pub fn new(script_name: impl Into<String>, script_key: impl Into<String>) -> Self {
        Self {
            script_name: script_name.into(),
            script_key: script_key.into(),
            session_uuid: None,
            session_token: None,
        }
    }

    /// Browser session to associate server-side events with.
    pub fn with_session_uuid(mut self, session_uuid: Option<String>) -> Self {
        self.session_uuid = session_uuid;
        self
    }

    /// Session token obtained from a handshake.
    pub fn with_session_token(mut self, session_token: Option<String>) -> Self {
        self.session_token = session_token;
        self
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn session_uuid(&self) -> Option<&str> {
        self.session_uuid.as_deref()
    }

    pub fn has_session_token(&self) -> bool {
        self.session_token.is_some()
    }

    fn validate(&self) -> Result<()> {
        if self.script_name.is_empty() || self.script_key.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "script_name and script_key must both be set".to_string(),
            )));
        }
        Ok(())
    }
}

/// Parameters of the `read` method.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadParams {
    pub entity_type: String,
    pub filters: Vec<Filter>,
    pub filter_operator: FilterOperator,
    pub return_fields: Vec<String>,
    pub order: Vec<Order>,
    pub entities_per_page: u32,
    pub current_page: u32,
    pub retired_only: bool,
    pub return_paging_info: bool,
}

impl ReadParams {
    fn to_wire(&self, codec: &TypeCodec) -> Value {
        let return_fields = if self.return_fields.is_empty() {
            vec!["id".to_string()]
        } else {
            self.return_fields.clone()
        };

        let mut params = Map::new();
        params.insert("type".into(), json!(self.entity_type));
        params.insert("return_fields".into(), json!(return_fields));
        params.insert(
            "filters".into(),
            json!({
                "logical_operator": self.filter_operator.as_wire(),
                "conditions": self.filters.iter().map(|f| f.to_wire(codec)).collect::<Vec<_>>(),
            }),
        );
        params.insert(
            "return_only".into(),
            json!(if self.retired_only { "retired" } else { "active" }),
        );
        params.insert(
            "paging".into(),
            json!({
                "entities_per_page": self.entities_per_page,
                "current_page": self.current_page,
            }),
        );
        if self.return_paging_info {
            params.insert("return_paging_info".into(), Value::Bool(true));
        }
        if !self.order.is_empty() {
            params.insert(
                "sorts".into(),
                Value::Array(self.order.iter().map(Order::to_wire).collect()),
            );
        }
        Value::Object(params)
    }
}

/// A remote procedure call, one variant per server method.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcRequest {
    Info,
    GetSessionToken,
    Read(ReadParams),
    Create {
        entity_type: String,
        fields: FieldMap,
        return_fields: Vec<String>,
    },
    Update {
        entity_type: String,
        id: i64,
        fields: FieldMap,
    },
    Delete {
        entity_type: String,
        id: i64,
    },
    Revive {
        entity_type: String,
        id: i64,
    },
    SchemaEntityRead,
    SchemaRead,
    SchemaFieldRead {
        entity_type: String,
        field_name: Option<String>,
    },
    SchemaFieldCreate {
        entity_type: String,
        data_type: String,
        display_name: String,
        properties: FieldMap,
    },
    SchemaFieldUpdate {
        entity_type: String,
        field_name: String,
        properties: FieldMap,
    },
    SchemaFieldDelete {
        entity_type: String,
        field_name: String,
    },
}

impl RpcRequest {
    /// Server method name.
    pub fn method_name(&self) -> &'static str {
        match self {
            RpcRequest::Info => "info",
            RpcRequest::GetSessionToken => "get_session_token",
            RpcRequest::Read(_) => "read",
            RpcRequest::Create { .. } => "create",
            RpcRequest::Update { .. } => "update",
            RpcRequest::Delete { .. } => "delete",
            RpcRequest::Revive { .. } => "revive",
            RpcRequest::SchemaEntityRead => "schema_entity_read",
            RpcRequest::SchemaRead => "schema_read",
            RpcRequest::SchemaFieldRead { .. } => "schema_field_read",
            RpcRequest::SchemaFieldCreate { .. } => "schema_field_create",
            RpcRequest::SchemaFieldUpdate { .. } => "schema_field_update",
            RpcRequest::SchemaFieldDelete { .. } => "schema_field_delete",
        }
    }

    /// Only `info` may be sent without credentials.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, RpcRequest::Info)
    }

    /// Method-specific params, encoded for the wire.
    pub fn params(&self, codec: &TypeCodec) -> Option<Value> {
        match self {
            RpcRequest::Info
            | RpcRequest::GetSessionToken
            | RpcRequest::SchemaEntityRead
            | RpcRequest::SchemaRead => None,
            RpcRequest::Read(read) => Some(read.to_wire(codec)),
            RpcRequest::Create {
                entity_type,
                fields,
                return_fields,
            } => {
                let return_fields = if return_fields.is_empty() {
                    vec!["id".to_string()]
                } else {
                    return_fields.clone()
                };
                Some(json!({
                    "type": entity_type,
                    "fields": field_list(fields, "field_name", codec),
                    "return_fields": return_fields,
                }))
            }
            RpcRequest::Update {
                entity_type,
                id,
                fields,
            } => Some(json!({
                "type": entity_type,
                "id": id,
                "fields": field_list(fields, "field_name", codec),
            })),
            RpcRequest::Delete { entity_type, id } | RpcRequest::Revive { entity_type, id } => {
                Some(json!({"type": entity_type, "id": id}))
            }
            RpcRequest::SchemaFieldRead {
                entity_type,
                field_name,
            } => {
                let mut params = Map::new();
                params.insert("type".into(), json!(entity_type));
                if let Some(field_name) = field_name {
                    params.insert("field_name".into(), json!(field_name));
                }
                Some(Value::Object(params))
            }
            RpcRequest::SchemaFieldCreate {
                entity_type,
                data_type,
                display_name,
                properties,
            } => {
                let mut wire_properties = vec![json!({
                    "property_name": "name",
                    "value": display_name,
                })];
                wire_properties.extend(field_list(properties, "property_name", codec));
                Some(json!({
                    "type": entity_type,
                    "data_type": data_type,
                    "properties": wire_properties,
                }))
            }
            RpcRequest::SchemaFieldUpdate {
                entity_type,
                field_name,
                properties,
            } => Some(json!({
                "type": entity_type,
                "field_name": field_name,
                "properties": field_list(properties, "property_name", codec),
            })),
            RpcRequest::SchemaFieldDelete {
                entity_type,
                field_name,
            } => Some(json!({"type": entity_type, "field_name": field_name})),
        }
    }
}

fn field_list(fields: &FieldMap, name_key: &str, codec: &TypeCodec) -> Vec<Value> {
    fields
        .iter()
        .map(|(name, value)| {
            let mut entry = Map::new();
            entry.insert(name_key.to_string(), Value::String(name.clone()));
            entry.insert("value".to_string(), codec.encode(value));
            Value::Object(entry)
        })
        .collect()
}

/// Wire payload of one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub method_name: &'static str,
    pub params: Vec<Value>,
}

impl Envelope {
    /// Build the payload, placing the auth block ahead of the method params.
    pub fn build(request: &RpcRequest, auth: Option<&AuthBlock>, codec: &TypeCodec) -> Result<Self> {
        let mut params = Vec::with_capacity(2);
        if request.requires_auth() {
            let auth = auth.ok_or_else(|| {
                Error::new(ErrorKind::Config(format!(
                    "method '{}' requires credentials",
                    request.method_name()
                )))
            })?;
            auth.validate()?;
            params.push(serde_json::to_value(auth)?);
        }
        if let Some(method_params) = request.params(codec) {
            params.push(method_params);
        }
        Ok(Self {
            method_name: request.method_name(),
            params,
        })
    }
}

/// A well-formed, non-fault reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    /// Reply wrapped in a `results` key; holds the unwrapped value.
    Results(Value),
    /// Reply without a `results` key, returned whole.
    Bare(Value),
}

impl RpcResponse {
    /// Classify a raw reply body.
    ///
    /// Empty or non-JSON bodies are transport errors; bodies carrying an
    /// `exception` flag or an `error` object are faults.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::new(ErrorKind::EmptyBody));
        }
        if let Some(content_type) = content_type {
            let lowered = content_type.to_ascii_lowercase();
            if !lowered.contains("json") && !lowered.contains("javascript") {
                return Err(Error::new(ErrorKind::UnexpectedContentType(
                    content_type.to_string(),
                )));
            }
        }

        let value: Value = serde_json::from_slice(body)?;
        if let Some(fault) = fault_from(&value) {
            return Err(fault);
        }

        Ok(match value {
            Value::Object(mut map) if map.contains_key("results") => {
                RpcResponse::Results(map.remove("results").unwrap_or(Value::Null))
            }
            other => RpcResponse::Bare(other),
        })
    }

    pub fn into_value(self) -> Value {
        match self {
            RpcResponse::Results(value) | RpcResponse::Bare(value) => value,
        }
    }

    /// First element for list results, the value itself otherwise.
    pub fn into_first(self) -> Value {
        match self.into_value() {
            Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
            other => other,
        }
    }
}

fn fault_from(value: &Value) -> Option<Error> {
    let map = value.as_object()?;
    let raised = match map.get("exception") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Null) | None => false,
        Some(_) => true,
    };
    let error = map.get("error").filter(|e| !e.is_null());
    if !raised && error.is_none() {
        return None;
    }

    let message = map
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.and_then(|e| e.get("message")).and_then(Value::as_str))
        .or_else(|| error.and_then(Value::as_str))
        .unwrap_or("Unknown Error");
    let error_code = map
        .get("error_code")
        .and_then(Value::as_i64)
        .or_else(|| error.and_then(|e| e.get("code")).and_then(Value::as_i64));

    Some(Error::new(ErrorKind::Fault {
        message: sanitize_error_message(message),
        error_code,
    }))
}
