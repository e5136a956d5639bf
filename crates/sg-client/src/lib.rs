//! # sg-client
//!
//! Transport layer for the Shotgun JSON API.
//!
//! This crate provides everything below the session layer:
//! - Connection management keyed by scheme, host and proxy
//! - Server endpoint parsing (API path, basic auth, proxy defaults)
//! - The JSON-RPC envelope and response classification
//! - The type codec converting between [`FieldValue`] and wire JSON
//! - Server capability negotiation from the `info` call
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │        (sg-api: find, CRUD, schema, binary transfer)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SgHttpClient                             │
//! │  - Builds envelopes, encodes params through TypeCodec       │
//! │  - Classifies replies (results / bare / fault)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ConnectionManager                          │
//! │  - One reusable connection per (scheme, host, proxy)        │
//! │  - Discards connections after transport failures            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use shotgun_json_client::{ClientConfig, RpcRequest, ServerEndpoint, SgHttpClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shotgun_json_client::Error> {
//!     let endpoint = ServerEndpoint::parse("https://studio.shotgunstudio.com", "api3", None)?;
//!     let mut http = SgHttpClient::new(endpoint, ClientConfig::default());
//!
//!     let info = http.call_rpc(&RpcRequest::Info, None).await?.into_value();
//!     println!("{info}");
//!     Ok(())
//! }
//! ```

mod capabilities;
mod client;
pub mod codec;
mod config;
mod connection;
mod endpoint;
pub mod envelope;
mod error;
mod filter;
mod request;
mod response;
mod value;

pub use capabilities::{ServerCapabilities, Version};
pub use client::SgHttpClient;
pub use codec::TypeCodec;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use connection::{ConnectionKey, ConnectionManager};
pub use endpoint::ServerEndpoint;
pub use envelope::{AuthBlock, Envelope, ReadParams, RpcRequest, RpcResponse};
pub use error::{Error, ErrorKind, Result};
pub use filter::{Direction, Filter, FilterOperator, Order};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{sanitize_error_message, Response};
pub use value::{EntityRef, FieldMap, FieldValue};

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "api3";

/// Default number of entities requested per page.
pub const DEFAULT_RECORDS_PER_PAGE: u32 = 500;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("shotgun-json/", env!("CARGO_PKG_VERSION"));
