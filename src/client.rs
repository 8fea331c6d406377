use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;

use crate::config::Config;
use crate::constants::GEO_JSON;
use crate::error::FetchError;

/// Source of JSON documents for the weather tools
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// HTTP client for the National Weather Service API
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
}

fn http_builder(config: &Config) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.request_timeout)
}

impl NwsClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_builder(config).build()?,
        })
    }
}

#[async_trait]
impl Upstream for NwsClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Talks to loopback directly even when a system proxy is configured
    fn local_client() -> NwsClient {
        let config = Config {
            request_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        NwsClient {
            http: http_builder(&config).no_proxy().build().unwrap(),
        }
    }

    /// Answers a single connection with a canned response and yields the request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/alerts?area=CA", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/geo+json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&head).to_lowercase()
        });

        (url, handle)
    }

    #[test]
    fn builds_from_default_config() {
        assert!(NwsClient::new(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn sends_identifying_headers_and_parses_json() {
        let (url, server) = serve_once("200 OK", r#"{"features":[]}"#).await;

        let value = local_client().get_json(&url).await.unwrap();
        assert_eq!(value, json!({ "features": [] }));

        let head = server.await.unwrap();
        assert!(head.starts_with("get /alerts?area=ca http/1.1\r\n"), "{head}");
        assert!(head.contains("user-agent: weather-app/1.0\r\n"), "{head}");
        assert!(head.contains("accept: application/geo+json\r\n"), "{head}");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (url, server) = serve_once("503 Service Unavailable", "{}").await;

        let err = local_client().get_json(&url).await.unwrap_err();
        assert_eq!(err, FetchError::Status(503));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_failure() {
        let (url, server) = serve_once("200 OK", "not json").await;

        let err = local_client().get_json(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_failure() {
        // Nothing listens on the discard port on loopback.
        let err = local_client()
            .get_json("http://127.0.0.1:9/alerts")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_) | FetchError::Timeout));
    }
}
