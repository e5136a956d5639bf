use serde_json::{json, Value};
use shotgun_json::api::{ClientConfig, ScriptCredentials, ShotgunClient};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SCRIPT_NAME: &str = "pipeline_tool";
pub const SCRIPT_KEY: &str = "0123456789abcdef";

/// A mock server answering the JSON endpoint the way a live site would.
pub struct MockShotgun {
    pub server: MockServer,
}

impl MockShotgun {
    /// Server reporting the given `[major, minor, patch]` version.
    pub async fn start(version: Value) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api3/json"))
            .and(body_partial_json(json!({"method_name": "info"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": version,
                "s3_uploads_enabled": false,
            })))
            .mount(&server)
            .await;
        Self { server }
    }

    /// A 3.x server issuing session tokens `token-1`, `token-2`, ...
    pub async fn with_token_auth() -> Self {
        let mock = Self::start(json!([3, 0, 0])).await;
        for n in 1..=3 {
            Mock::given(method("POST"))
                .and(body_partial_json(json!({"method_name": "get_session_token"})))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"session_id": format!("token-{n}")})),
                )
                .up_to_n_times(1)
                .mount(&mock.server)
                .await;
        }
        mock
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn credentials(&self) -> ScriptCredentials {
        ScriptCredentials::new(self.uri(), SCRIPT_NAME, SCRIPT_KEY)
    }

    pub fn client(&self) -> ShotgunClient {
        ShotgunClient::new(self.credentials()).expect("client")
    }

    pub fn client_with(&self, config: ClientConfig) -> ShotgunClient {
        ShotgunClient::with_config(self.credentials(), config).expect("client")
    }

    /// Answer every call to `method_name` with `{"results": results}`.
    pub async fn results(&self, method_name: &str, results: Value) {
        self.reply(method_name, json!({"results": results}), None).await;
    }

    /// Answer the next call to `method_name` only.
    pub async fn results_once(&self, method_name: &str, results: Value) {
        self.reply(method_name, json!({"results": results}), Some(1)).await;
    }

    /// Answer the next `times` calls to `method_name` with a fault.
    pub async fn fault(&self, method_name: &str, message: &str, error_code: i64, times: u64) {
        let body = json!({"exception": true, "message": message, "error_code": error_code});
        self.reply(method_name, body, Some(times)).await;
    }

    async fn reply(&self, method_name: &str, body: Value, times: Option<u64>) {
        let mock = Mock::given(method("POST"))
            .and(path("/api3/json"))
            .and(body_partial_json(json!({"method_name": method_name})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body));
        let mock = match times {
            Some(n) => mock.up_to_n_times(n),
            None => mock,
        };
        mock.mount(&self.server).await;
    }

    /// Bodies of every call to `method_name`, oldest first.
    pub async fn calls(&self, method_name: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/api3/json")
            .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
            .filter(|b| b["method_name"] == method_name)
            .collect()
    }
}
