//! Common test utilities for platform-health
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{healthy_service, fast_options};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let server = healthy_service("/healthz").await;
//!     let options = fast_options();
//!     // ...
//! }
//! ```

use platform_health::{HealthcheckOptions, ServiceEndpoint};
use std::net::TcpListener;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Options with short timeouts and no retries, sequential by default
pub fn fast_options() -> HealthcheckOptions {
    HealthcheckOptions::default()
        .with_timeout(Duration::from_millis(500))
        .with_retry_count(0)
        .with_retry_delay(Duration::from_millis(10))
        .with_parallel(false)
}

/// Mock server answering `GET {route}` with `status`, optionally after `delay`
pub async fn service_with(route: &str, status: u16, delay: Option<Duration>) -> MockServer {
    let server = MockServer::start().await;
    let mut response = ResponseTemplate::new(status);
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

/// Mock server answering 200 on `route`
pub async fn healthy_service(route: &str) -> MockServer {
    service_with(route, 200, None).await
}

/// Endpoint pointing at a mock server
pub fn endpoint_for(name: &str, server: &MockServer, route: &str) -> ServiceEndpoint {
    ServiceEndpoint::new(name, server.uri()).with_health_path(route)
}

/// A localhost URL that refuses connections
///
/// The port comes from a listener that is dropped before returning.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// A localhost URL whose listener accepts each connection and closes it
/// without answering
pub async fn hang_up_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// Number of requests a mock server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
