//! Reusable connections keyed by (scheme, host, proxy).

use std::collections::HashMap;

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};

/// Identity of a connection. Requests with equal keys share one connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    pub scheme: String,
    pub host: String,
    pub proxy: Option<String>,
}

/// Owns at most one live connection per key.
///
/// Connections are created on first use and kept until a transport failure
/// or [`close`](Self::close). Each is a reqwest client with a single idle
/// slot, so consecutive calls reuse the same socket.
#[derive(Debug)]
pub struct ConnectionManager {
    config: ClientConfig,
    connections: HashMap<ConnectionKey, reqwest::Client>,
}

impl ConnectionManager {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            connections: HashMap::new(),
        }
    }

    /// Connection for `key`, created if none is open.
    pub fn acquire(&mut self, key: &ConnectionKey) -> Result<reqwest::Client> {
        if let Some(client) = self.connections.get(key) {
            return Ok(client.clone());
        }
        let client = self.build(key)?;
        debug!(scheme = %key.scheme, host = %key.host, proxied = key.proxy.is_some(), "Opened connection");
        self.connections.insert(key.clone(), client.clone());
        Ok(client)
    }

    /// Drop the connection for `key` after a transport failure; the next
    /// acquire opens a fresh one. Returns whether a connection was dropped.
    pub fn release_on_error(&mut self, key: &ConnectionKey) -> bool {
        let dropped = self.connections.remove(key).is_some();
        if dropped {
            debug!(host = %key.host, "Discarded connection after transport error");
        }
        dropped
    }

    /// Drop every connection.
    pub fn close(&mut self) {
        if !self.connections.is_empty() {
            debug!(count = self.connections.len(), "Closing connections");
        }
        self.connections.clear();
    }

    pub fn is_open(&self, key: &ConnectionKey) -> bool {
        self.connections.contains_key(key)
    }

    pub fn open_connections(&self) -> usize {
        self.connections.len()
    }

    fn build(&self, key: &ConnectionKey) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .connect_timeout(self.config.connect_timeout)
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(1)
            .user_agent(&self.config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .gzip(self.config.accept_compressed)
            .deflate(self.config.accept_compressed);

        if let Some(proxy) = &key.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::with_source(ErrorKind::Config(format!("invalid proxy: {e}")), e))?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))
    }
}
