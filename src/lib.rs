//! # shotgun-json
//!
//! Client library for the Shotgun production-tracking JSON API.
//!
//! ## Security
//!
//! - Script keys and session tokens are redacted in Debug output
//! - Tracing skips credential parameters
//! - Server messages are sanitized before they reach error values
//!
//! ## Crates
//!
//! - **shotgun-json-client** - Transport: connections, RPC envelope, type codec,
//!   server capabilities
//! - **shotgun-json-auth** - Script credentials and the session token lifecycle
//! - **shotgun-json-api** - `ShotgunClient`: find, CRUD, schema, file transfer
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shotgun_json::{FindQuery, ScriptCredentials, ShotgunClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // SHOTGUN_SERVER_URL, SHOTGUN_SCRIPT_NAME, SHOTGUN_API_KEY
//!     let mut sg = ShotgunClient::new(ScriptCredentials::from_env()?)?;
//!
//!     let projects = sg
//!         .find(&FindQuery::new("Project").fields(["name"]).limit(10))
//!         .await?;
//!
//!     for project in projects {
//!         println!("{} {:?}", project.id(), project.get("name"));
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use shotgun_json_auth as auth;
#[cfg(feature = "client")]
pub use shotgun_json_client as client;
#[cfg(feature = "api")]
pub use shotgun_json_api as api;

// Re-export commonly used types at the top level
#[cfg(feature = "api")]
pub use shotgun_json_api::{EntityRecord, FindQuery, ShotgunClient};
#[cfg(feature = "auth")]
pub use shotgun_json_auth::ScriptCredentials;
#[cfg(feature = "client")]
pub use shotgun_json_client::{ClientConfig, EntityRef, FieldMap, FieldValue};
