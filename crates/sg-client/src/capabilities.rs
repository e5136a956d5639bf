//! Server version and the features it implies.

use std::fmt;

use serde_json::Value;

/// Server version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// What the connected server supports, derived from its `info` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerCapabilities {
    host: String,
    version: Version,
    is_dev: bool,
    info: Value,
}

impl ServerCapabilities {
    const PAGING_VERSION: Version = Version::new(2, 3, 4);
    const SESSION_UUID_VERSION: Version = Version::new(2, 4, 0);
    const SESSION_TOKEN_VERSION: Version = Version::new(2, 5, 0);

    /// Build from an `info` reply such as `{"version": [3, 0, 2, "Dev"]}`.
    ///
    /// A fourth version element of `"Dev"` marks a development build. A reply
    /// without a version is treated as 0.0.0: every call still works, only the
    /// version-gated features are off.
    pub fn from_info(host: impl Into<String>, info: Value) -> Self {
        let host = host.into();
        let parts = info.get("version").and_then(Value::as_array);

        let number_at = |i: usize| -> u32 {
            parts
                .and_then(|p| p.get(i))
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        let version = Version::new(number_at(0), number_at(1), number_at(2));
        let is_dev = parts
            .and_then(|p| p.get(3))
            .and_then(Value::as_str)
            .is_some_and(|tag| tag == "Dev");

        Self {
            host,
            version,
            is_dev,
            info,
        }
    }

    /// Host these capabilities were negotiated with.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_dev(&self) -> bool {
        self.is_dev
    }

    /// Raw `info` reply.
    pub fn info(&self) -> &Value {
        &self.info
    }

    /// Server honours `paging` and can return paging info.
    pub fn has_paging(&self) -> bool {
        self.version >= Self::PAGING_VERSION
    }

    /// Server accepts a browser `session_uuid` in the auth block.
    pub fn supports_session_uuid(&self) -> bool {
        self.version >= Self::SESSION_UUID_VERSION
    }

    /// Server issues session tokens and accepts them in place of a script key.
    pub fn supports_session_token_auth(&self) -> bool {
        self.version >= Self::SESSION_TOKEN_VERSION
    }
}
