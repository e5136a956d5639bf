//! Client configuration.

use std::time::Duration;

/// Configuration for the HTTP client and the layers above it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Pool idle timeout.
    pub pool_idle_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Whether to accept gzip/deflate encoded responses.
    pub accept_compressed: bool,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
    /// API version path segment, `api3` unless the server says otherwise.
    pub api_version: String,
    /// Treat naive datetimes as local time and convert them to UTC on the wire.
    pub convert_datetimes_to_utc: bool,
    /// Page size used when a query does not set a limit.
    pub records_per_page: u32,
    /// Replace `image` fields of returned records with their thumbnail URL.
    pub resolve_thumbnail_urls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: crate::USER_AGENT.to_string(),
            accept_compressed: true,
            enable_tracing: true,
            api_version: crate::DEFAULT_API_VERSION.to_string(),
            convert_datetimes_to_utc: true,
            records_per_page: crate::DEFAULT_RECORDS_PER_PAGE,
            resolve_thumbnail_urls: false,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set pool idle timeout.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Accept compressed responses.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Set the API version path segment.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = api_version.into();
        self
    }

    /// Enable or disable local-to-UTC conversion of naive datetimes.
    pub fn with_convert_datetimes_to_utc(mut self, enabled: bool) -> Self {
        self.config.convert_datetimes_to_utc = enabled;
        self
    }

    /// Set the default page size. Zero falls back to the built-in default.
    pub fn with_records_per_page(mut self, records_per_page: u32) -> Self {
        self.config.records_per_page = if records_per_page == 0 {
            crate::DEFAULT_RECORDS_PER_PAGE
        } else {
            records_per_page
        };
        self
    }

    /// Resolve `image` fields to thumbnail URLs after every read.
    pub fn with_thumbnail_urls(mut self, enabled: bool) -> Self {
        self.config.resolve_thumbnail_urls = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
