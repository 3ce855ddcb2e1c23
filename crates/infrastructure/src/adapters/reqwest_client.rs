//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It resolves endpoint paths
//! against a fixed base URL, attaches query parameters or a JSON body, and
//! hands back whatever the server answered.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use apiprobe_application::ports::{HttpClient, TransportError};
use apiprobe_domain::{Endpoint, HttpMethod, Payload, Response};
use reqwest::{Client, Method, Url};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("apiprobe/", env!("CARGO_PKG_VERSION"));

/// HTTP client implementation using reqwest.
///
/// Holds no mutable state: the pooled reqwest client, the base URL and the
/// timeout are fixed at construction.
pub struct ReqwestHttpClient {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the client cannot
    /// be created.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Self::with_client(client, base_url, timeout_ms)
    }

    /// Creates a client around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| TransportError::InvalidUrl(format!("{e}: {base_url}")))?;
        Ok(Self {
            client,
            base_url,
            timeout_ms,
        })
    }

    /// Resolves an endpoint to its full URL, query string included.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidUrl` if the result does not parse.
    pub fn resolve(&self, endpoint: &Endpoint) -> Result<Url, TransportError> {
        let raw = format!("{}/{}", self.base_url, endpoint.path());
        let mut url = Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{e}: {raw}")))?;

        if let Some(query) = endpoint.query().filter(|q| !q.is_empty()) {
            let pairs: Vec<(&str, &str)> = query.pairs().collect();
            let encoded = serde_urlencoded::to_string(&pairs)
                .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let message = error_chain(error);
        let host = error
            .url()
            .and_then(Url::host_str)
            .unwrap_or("unknown")
            .to_string();

        if error.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::Dns { host, message };
            }
            if lower.contains("refused") {
                return TransportError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_body() || error.is_decode() {
            return TransportError::Body(message);
        }

        TransportError::Other(message)
    }
}

/// Joins an error with all of its sources; reqwest keeps the OS cause there.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        endpoint: &Endpoint,
    ) -> Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + '_>> {
        let method = endpoint.method();
        let url = self.resolve(endpoint);
        let json = match endpoint.payload() {
            Payload::Json(body) => Some(body.clone()),
            Payload::Query(_) | Payload::None => None,
        };
        let timeout_ms = self.timeout_ms;

        Box::pin(async move {
            let url = url?;
            let start = Instant::now();

            let mut builder = self.client.request(Self::to_reqwest_method(method), url);
            if let Some(body) = &json {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            Ok(Response::new(status, headers, &body, start.elapsed()))
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apiprobe_domain::QueryParams;
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn object(value: serde_json::Value) -> Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_resolve_joins_with_single_slash() {
        let client = ReqwestHttpClient::new("https://automationexercise.com/api/", 1000).unwrap();
        let url = client.resolve(&Endpoint::get("/productsList").unwrap()).unwrap();
        assert_eq!(url.as_str(), "https://automationexercise.com/api/productsList");
    }

    #[test]
    fn test_resolve_encodes_query() {
        let client = ReqwestHttpClient::new("http://localhost:8080/api", 1000).unwrap();
        let endpoint = Endpoint::get("getUserDetailByEmail")
            .unwrap()
            .with_query(QueryParams::new().with("email", "a b+c@example.com"))
            .unwrap();
        let url = client.resolve(&endpoint).unwrap();
        assert_eq!(url.query(), Some("email=a+b%2Bc%40example.com"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ReqwestHttpClient::new("not a url", 1000);
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/productsList"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"responseCode": 200, "products": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(format!("{}/api", server.uri()), 5000).unwrap();
        let response = client
            .execute(&Endpoint::get("productsList").unwrap())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.json().unwrap().get("products").is_some());
        assert!(response.headers["content-type"].contains("json"));
    }

    #[tokio::test]
    async fn test_error_status_is_a_response_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/deleteAccount"))
            .respond_with(ResponseTemplate::new(405).set_body_string("nope"))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(format!("{}/api", server.uri()), 5000).unwrap();
        let response = client
            .execute(&Endpoint::delete("deleteAccount").unwrap())
            .await
            .unwrap();

        assert_eq!(response.status, 405);
        assert_eq!(response.body, "nope");
    }

    #[tokio::test]
    async fn test_query_params_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/getUserDetailByEmail"))
            .and(query_param("email", "ana@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(server.uri(), 5000).unwrap();
        let endpoint = Endpoint::get("getUserDetailByEmail")
            .unwrap()
            .with_query(QueryParams::new().with("email", "ana@example.com"))
            .unwrap();
        let response = client.execute(&endpoint).await.unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_json_body_sent() {
        let body = object(json!({"email": "ana@example.com", "password": "secret"}));
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/verifyLogin"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"email": "ana@example.com", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "User exists!"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(server.uri(), 5000).unwrap();
        let endpoint = Endpoint::post("verifyLogin").unwrap().with_json(body).unwrap();
        let response = client.execute(&endpoint).await.unwrap();

        assert_eq!(response.json().unwrap()["message"], "User exists!");
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = ReqwestHttpClient::new(server.uri(), 50).unwrap();
        let err = client
            .execute(&Endpoint::get("brandsList").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err, TransportError::Timeout { timeout_ms: 50 });
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = ReqwestHttpClient::new(format!("http://127.0.0.1:{port}/api"), 2000).unwrap();
        let err = client
            .execute(&Endpoint::get("productsList").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransportError::ConnectionRefused { .. } | TransportError::ConnectionFailed(_)
        ));
    }

    #[tokio::test]
    async fn test_stalled_body_is_a_timeout() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            use std::io::{Read, Write};
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0_u8; 1024];
            let _ = stream.read(&mut request);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n{\"products\"")
                .unwrap();
            stream.flush().unwrap();
            std::thread::sleep(Duration::from_millis(1000));
        });

        let client = ReqwestHttpClient::new(format!("http://127.0.0.1:{port}"), 200).unwrap();
        let err = client
            .execute(&Endpoint::get("productsList").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err, TransportError::Timeout { timeout_ms: 200 });
    }
}
