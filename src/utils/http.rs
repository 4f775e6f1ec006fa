//! HTTP client utilities.

use reqwest::header::HeaderMap;
use reqwest::Client;
use std::time::Duration;

/// Build the HTTP client used for completion requests.
///
/// `headers` are sent with every request (authorization, content type).
pub fn build_client(headers: HeaderMap, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
}
