//! HTTP client for the JSON API: request execution and RPC calls.

use tracing::{debug, info, instrument, warn};

use crate::codec::TypeCodec;
use crate::config::ClientConfig;
use crate::connection::ConnectionManager;
use crate::endpoint::ServerEndpoint;
use crate::envelope::{AuthBlock, Envelope, RpcRequest, RpcResponse};
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestBuilder, RequestMethod};
use crate::response::{sanitize_error_message, Response};

/// Executes requests against one server endpoint.
///
/// Requests are never retried here. A socket-level failure discards the
/// connection so the next request starts on a fresh one.
#[derive(Debug)]
pub struct SgHttpClient {
    config: ClientConfig,
    endpoint: ServerEndpoint,
    connections: ConnectionManager,
    codec: TypeCodec,
}

impl SgHttpClient {
    pub fn new(endpoint: ServerEndpoint, config: ClientConfig) -> Self {
        let codec = TypeCodec::new(config.convert_datetimes_to_utc);
        Self {
            connections: ConnectionManager::new(config.clone()),
            config,
            endpoint,
            codec,
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub fn codec(&self) -> &TypeCodec {
        &self.codec
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Create a GET request builder for a server path.
    pub fn get(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, self.endpoint.url(path))
    }

    /// Create a POST request builder for a server path.
    pub fn post(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, self.endpoint.url(path))
    }

    /// Drop all open connections.
    pub fn close(&mut self) {
        self.connections.close();
    }

    /// Execute a request.
    ///
    /// Redirects and non-2xx statuses are errors; a success response is
    /// returned with its body unread.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn execute(&mut self, request: RequestBuilder) -> Result<Response> {
        let key = self.endpoint.connection_key();
        let http = self.connections.acquire(&key)?;

        let response = match self.execute_once(&http, request).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_connection_level() {
                    self.connections.release_on_error(&key);
                }
                warn!(error = %err, "Request failed");
                return Err(err);
            }
        };

        let status = response.status();
        if (300..400).contains(&status) {
            let location = response.header("location").unwrap_or_default().to_string();
            return Err(Error::new(ErrorKind::Redirect { status, location }));
        }
        if !response.is_success() {
            let message = match response.text().await {
                Ok(body) => sanitize_error_message(&body),
                Err(err) => {
                    self.connections.release_on_error(&key);
                    format!("error body could not be read: {err}")
                }
            };
            return Err(Error::new(ErrorKind::Http { status, message }));
        }
        Ok(response)
    }

    async fn execute_once(&self, http: &reqwest::Client, request: RequestBuilder) -> Result<Response> {
        let mut req = http.request(request.method.to_reqwest(), &request.url);

        if let Some(authorization) = self.endpoint.authorization() {
            req = req.header("Authorization", authorization);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if !request.query_params.is_empty() {
            req = req.query(&request.query_params);
        }

        if let Some(body) = request.body {
            req = match body {
                RequestBody::Bytes(bytes) => req.body(bytes),
                RequestBody::Multipart(form) => req.multipart(form),
            };
        }

        if self.config.enable_tracing {
            debug!(method = ?request.method, url = %request.url, "Sending request");
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }

    /// Send one RPC call and classify the reply.
    ///
    /// `auth` must be present for every method except `info`.
    #[instrument(skip(self, request, auth), fields(method_name = request.method_name()))]
    pub async fn call_rpc(
        &mut self,
        request: &RpcRequest,
        auth: Option<&AuthBlock>,
    ) -> Result<RpcResponse> {
        let envelope = Envelope::build(request, auth, &self.codec)?;
        let body = serde_json::to_vec(&envelope)?;

        let api_path = self.endpoint.api_path().to_string();
        let http_request = self
            .post(&api_path)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Connection", "keep-alive")
            .bytes(body);

        let response = self.execute(http_request).await?;
        let content_type = response.content_type().map(str::to_owned);
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.connections.release_on_error(&self.endpoint.connection_key());
                return Err(err);
            }
        };

        let parsed = RpcResponse::parse(content_type.as_deref(), &bytes);
        match &parsed {
            Ok(_) => debug!("RPC call completed"),
            Err(err) if err.is_fault() => info!(error = %err, "RPC call returned a fault"),
            Err(err) => warn!(error = %err, "RPC reply was malformed"),
        }
        parsed
    }
}
