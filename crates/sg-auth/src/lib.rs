//! # sg-auth
//!
//! Script credentials and session management for the Shotgun JSON API.
//!
//! ## Security
//!
//! - Script keys and session tokens are redacted in Debug output
//! - Tracing skips credential parameters
//!
//! ## Session lifecycle
//!
//! ```text
//!  Unauthenticated ──handshake──▶ Authenticating ──ok──▶ Authenticated
//!        ▲                              │                     │
//!        └────────── failure ───────────┘            invalidate()
//!                                                             ▼
//!                    Authenticating ◀──handshake──────── Expired
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use shotgun_json_auth::{ScriptCredentials, SessionManager};
//!
//! let creds = ScriptCredentials::from_env()?;
//! let mut session = SessionManager::new(creds);
//! let token = session.ensure_token(&mut http).await?;
//! ```

mod credentials;
mod error;
mod session;

pub use credentials::ScriptCredentials;
pub use error::{Error, ErrorKind, Result};
pub use session::{SessionManager, SessionState};

/// Environment variable holding the server URL.
pub const ENV_SERVER_URL: &str = "SHOTGUN_SERVER_URL";
/// Environment variable holding the script name.
pub const ENV_SCRIPT_NAME: &str = "SHOTGUN_SCRIPT_NAME";
/// Environment variable holding the script key.
pub const ENV_API_KEY: &str = "SHOTGUN_API_KEY";
/// Environment variable holding an optional `host[:port]` proxy.
pub const ENV_HTTP_PROXY: &str = "SHOTGUN_HTTP_PROXY";
/// Environment variable holding an optional browser session uuid.
pub const ENV_SESSION_UUID: &str = "SHOTGUN_SESSION_UUID";
