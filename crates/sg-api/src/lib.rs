//! # sg-api
//!
//! Typed operations for the Shotgun JSON API.
//!
//! ## Supported operations
//!
//! - **Find**: filtered, ordered, paged reads (`find`, `find_one`, `find_page`)
//! - **CRUD**: `create`, `update`, `delete`, `revive`
//! - **Schema**: entity and field reads, field create/update/delete
//! - **Files**: attachment upload, thumbnail upload, attachment download,
//!   thumbnail url lookup
//!
//! Sessions are handled transparently: on servers that support token auth a
//! session token is obtained before the first authenticated call and renewed
//! once when the server rejects it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shotgun_json_api::{Direction, EntityRef, FindQuery, ScriptCredentials, ShotgunClient};
//!
//! #[tokio::main]
//! async fn main() -> shotgun_json_api::Result<()> {
//!     let mut sg = ShotgunClient::new(ScriptCredentials::from_env()?)?;
//!
//!     let query = FindQuery::new("Shot")
//!         .filter("project", "is", EntityRef::new("Project", 4))
//!         .fields(["code", "sg_status_list"])
//!         .order_by("code", Direction::Asc);
//!
//!     for shot in sg.find(&query).await? {
//!         println!("{} {:?}", shot.id(), shot.get("code"));
//!     }
//!     Ok(())
//! }
//! ```

mod capabilities;
mod client;
mod error;
mod query;
mod record;
mod schema;

pub use capabilities::{ClientCapabilities, Platform};
pub use client::{ShotgunClient, UploadOptions};
pub use error::{Error, ErrorKind, Result};
pub use query::{FindPage, FindQuery, PagingInfo};
pub use record::EntityRecord;
pub use schema::{SchemaCache, SchemaDescriptor, SchemaMap};

// Re-export commonly used types from the lower layers
pub use shotgun_json_auth::{ScriptCredentials, SessionState};
pub use shotgun_json_client::{
    ClientConfig, Direction, EntityRef, FieldMap, FieldValue, Filter, FilterOperator, Order,
    ServerCapabilities, Version,
};

/// Fault code the server returns when the session in the auth block is no
/// longer valid.
pub const INVALID_SESSION_ERROR_CODE: i64 = 102;
