use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const RATELIMIT_RESET_HEADER: &str = "x-ratelimit-retry-after";

/// A raw HTTP exchange as seen by the retry layer: status, body text and the
/// rate-limit reset header (epoch seconds) when the server sent one.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub ratelimit_reset: Option<u64>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            ratelimit_reset: None,
        }
    }

    pub fn with_ratelimit_reset(mut self, reset: u64) -> Self {
        self.ratelimit_reset = Some(reset);
        self
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(version: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent(format!("mu-talker/{version}"))
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(30))
                .gzip(true)
                .build()
                .unwrap(),
        }
    }

    async fn convert(&self, res: reqwest::Response) -> Result<HttpResponse> {
        let status = res.status().as_u16();
        let ratelimit_reset = res
            .headers()
            .get(RATELIMIT_RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = res.text().await?;
        Ok(HttpResponse {
            status,
            body,
            ratelimit_reset,
        })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let res = self.client.get(url).send().await?;
        self.convert(res).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        let res = self.client.post(url).json(body).send().await?;
        self.convert(res).await
    }
}
