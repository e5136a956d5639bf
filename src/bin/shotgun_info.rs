//! Print what a server reports about itself.
//!
//! Reads credentials from the environment, negotiates capabilities and
//! prints them together with the raw `info` reply.
//!
//! ```sh
//! export SHOTGUN_SERVER_URL=https://studio.shotgunstudio.com
//! export SHOTGUN_SCRIPT_NAME=pipeline_tool
//! export SHOTGUN_API_KEY=...
//! RUST_LOG=shotgun_json_api=debug cargo run --bin shotgun-info
//! ```

use shotgun_json_api::ShotgunClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut sg = ShotgunClient::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("  Set SHOTGUN_SERVER_URL, SHOTGUN_SCRIPT_NAME and SHOTGUN_API_KEY.");
        eprintln!("  Optional: SHOTGUN_HTTP_PROXY, SHOTGUN_SESSION_UUID.");
        std::process::exit(1);
    });

    let host = sg.endpoint().host().to_string();
    let caps = match sg.server_caps().await {
        Ok(caps) => caps.clone(),
        Err(e) => {
            eprintln!("Error: could not negotiate with {host}: {e}");
            std::process::exit(1);
        }
    };

    println!("Server:        {}", caps.host());
    println!("Version:       {}{}", caps.version(), if caps.is_dev() { " (dev)" } else { "" });
    println!("Paging:        {}", caps.has_paging());
    println!("Session uuid:  {}", caps.supports_session_uuid());
    println!("Token auth:    {}", caps.supports_session_token_auth());
    match sg.client_caps().local_path_field() {
        Some(field) => println!("Local paths:   {field}"),
        None => println!("Local paths:   unsupported platform"),
    }

    match serde_json::to_string_pretty(caps.info()) {
        Ok(info) => println!("\n{info}"),
        Err(e) => eprintln!("Error: could not render info reply: {e}"),
    }

    sg.close();
}
