//! Provides the `HolfuyClient`, a thin wrapper around one GET against the live endpoint.
//!
//! The client owns no session of its own: the shared `reqwest::Client` is handed
//! in at construction and released by whoever created it.

use crate::config::HolfuyConfig;
use crate::error::HolfuyError;
use crate::types::payload::{normalize_response, LivePayload};
use crate::types::query::{station_selector, LiveQuery};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use std::time::Duration;

/// Anything that can produce a live payload for the coordinator.
#[async_trait]
pub trait LiveSource: Send + Sync {
    /// Fetches the latest measurements, `None` meaning every station visible
    /// to the key. Failures are returned classified.
    async fn try_fetch(&self, stations: Option<&[String]>) -> Result<LivePayload, HolfuyError>;
}

/// HTTP client for `http://api.holfuy.com/live/`.
#[derive(Debug, Clone)]
pub struct HolfuyClient {
    http: Client,
    api_url: String,
    query: LiveQuery,
    request_timeout: Duration,
}

impl HolfuyClient {
    pub fn new(http: Client, config: &HolfuyConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            query: LiveQuery::new(config.api_key.clone()),
            request_timeout: config.request_timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Gets the latest data, degrading every failure to `None`.
    ///
    /// HTTP status >= 400, transport errors, timeouts and unparsable bodies are
    /// logged and reported as "no data". A single requested station is
    /// returned in the same `measurements` list shape as a multi-station query.
    pub async fn fetch(&self, stations: Option<&[String]>) -> Option<LivePayload> {
        self.try_fetch(stations).await.ok()
    }

    async fn request(&self, stations: Option<&[String]>) -> Result<LivePayload, HolfuyError> {
        let params = self.query.params(stations);
        debug!(
            "Requesting live data from {} for stations '{}'",
            self.api_url,
            station_selector(stations)
        );

        let body = tokio::time::timeout(self.request_timeout, async {
            let response = self
                .http
                .get(&self.api_url)
                .query(&params)
                .send()
                .await
                .map_err(|e| HolfuyError::NetworkRequest(self.api_url.clone(), e))?;

            let status = response.status();
            if status.as_u16() >= 400 {
                return Err(HolfuyError::HttpStatus {
                    url: self.api_url.clone(),
                    status,
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| HolfuyError::NetworkRequest(self.api_url.clone(), e))
        })
        .await
        .map_err(|_| HolfuyError::Timeout(self.request_timeout))??;

        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| HolfuyError::JsonParse(self.api_url.clone(), e))?;

        LivePayload::from_value(normalize_response(value, stations))
    }

    fn log_failure(&self, err: &HolfuyError) {
        match err {
            HolfuyError::HttpStatus { status, .. } => {
                error!("{} returned {}", self.api_url, status.as_u16());
            }
            HolfuyError::NetworkRequest(..) | HolfuyError::Timeout(_) => {
                error!("Access to {} returned error '{}'", self.api_url, err.kind());
            }
            HolfuyError::JsonParse(_, source) | HolfuyError::Decode(source) => {
                error!("Unable to parse json response from {}: {}", self.api_url, source);
            }
            other => error!("Request to {} failed: {}", self.api_url, other),
        }
    }
}

#[async_trait]
impl LiveSource for HolfuyClient {
    async fn try_fetch(&self, stations: Option<&[String]>) -> Result<LivePayload, HolfuyError> {
        let result = self.request(stations).await;
        if let Err(e) = &result {
            self.log_failure(e);
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Canned response served by [`serve`].
    #[derive(Clone)]
    pub struct Canned {
        pub status: &'static str,
        pub body: String,
        pub stall: bool,
    }

    impl Canned {
        pub fn json(status: &'static str, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                stall: false,
            }
        }

        pub fn stall() -> Self {
            Self {
                status: "200 OK",
                body: String::new(),
                stall: true,
            }
        }
    }

    /// Serves the given responses in order, one per connection, and yields
    /// the request lines it saw.
    pub async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/live/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for canned in responses {
                let (stream, _) = listener.accept().await.unwrap();
                seen.push(answer(stream, canned).await);
            }
            seen
        });

        (url, handle)
    }

    async fn answer(mut stream: TcpStream, canned: Canned) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request_line = String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();

        if canned.stall {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            return request_line;
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            canned.status,
            canned.body.len(),
            canned.body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
        request_line
    }
}
