use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::error::{TalkerError, TalkerResult};
use crate::http::HttpTransport;

/// MangaUpdates asks for reasonable spacing between requests.
const REQUESTS_PER_SECOND: u32 = 5;
/// Retries allowed on server errors before giving up.
const SERVER_ERROR_RETRIES: u32 = 3;
const SERVER_ERROR_BACKOFF: Duration = Duration::from_secs(1);
const RATELIMIT_FALLBACK_BACKOFF: Duration = Duration::from_secs(5);

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Paces and retries calls to the remote API. One `Fetcher` is shared for the
/// whole process so the request budget is global; it is constructed explicitly
/// and injected, never reached through an ambient global.
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    limiter: DirectLimiter,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let per_second = NonZeroU32::new(REQUESTS_PER_SECOND).expect("nonzero request rate");
        Self {
            transport,
            limiter: RateLimiter::direct(Quota::per_second(per_second)),
        }
    }

    pub async fn get(&self, url: &str) -> TalkerResult<Value> {
        self.request(url, None).await
    }

    pub async fn post_json(&self, url: &str, body: &Value) -> TalkerResult<Value> {
        self.request(url, Some(body)).await
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn request(&self, url: &str, body: Option<&Value>) -> TalkerResult<Value> {
        self.limiter.until_ready().await;

        let mut server_errors = 0u32;
        loop {
            let response = match body {
                Some(body) => self.transport.post_json(url, body).await,
                None => self.transport.get(url).await,
            }
            .map_err(|err| TalkerError::Network(format!("request failed: {err}")))?;

            match response.status {
                200 => {
                    let value: Value = serde_json::from_str(&response.body).map_err(|err| {
                        TalkerError::Data(format!("response was not json: {err}"))
                    })?;
                    // Even a 200 can carry an application-level failure.
                    if value.get("status").and_then(|s| s.as_str()) == Some("exception") {
                        let reason = value
                            .get("reason")
                            .and_then(|r| r.as_str())
                            .unwrap_or("no reason given");
                        debug!(reason, "query failed with an exception payload");
                        return Err(TalkerError::Network(format!("query failed: {reason}")));
                    }
                    return Ok(value);
                }
                status @ 500..=599 => {
                    server_errors += 1;
                    if server_errors > SERVER_ERROR_RETRIES {
                        return Err(TalkerError::Network(format!(
                            "giving up after {SERVER_ERROR_RETRIES} retries, last status {status}"
                        )));
                    }
                    debug!(status, attempt = server_errors, "server error, retrying");
                    sleep(SERVER_ERROR_BACKOFF).await;
                }
                429 => {
                    debug!("rate limit reached");
                    // Does not consume the retry budget; loops until the
                    // server stops answering 429.
                    match response.ratelimit_reset {
                        Some(reset) => {
                            let now = SystemTime::now()
                                .duration_since(UNIX_EPOCH)
                                .map(|d| d.as_secs())
                                .unwrap_or(0);
                            if reset > now {
                                sleep(Duration::from_secs(reset - now + 1)).await;
                            }
                        }
                        None => sleep(RATELIMIT_FALLBACK_BACKOFF).await,
                    }
                }
                status => {
                    return Err(TalkerError::Network(format!(
                        "status {status}: {}",
                        response.body
                    )));
                }
            }
        }
    }
}
