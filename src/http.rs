use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::HarvestError;

const BASE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub max_retries: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

pub fn build_client(
    settings: &HttpSettings,
    on_error: fn(String) -> HarvestError,
) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("eva-harvest/{}", env!("CARGO_PKG_VERSION")))
            .map_err(|err| on_error(err.to_string()))?,
    );
    Client::builder()
        .default_headers(headers)
        .timeout(settings.timeout)
        .build()
        .map_err(|err| on_error(err.to_string()))
}

/// Sends the request, retrying throttling, gateway and connection failures
/// with a linear backoff. The last response is returned as-is so callers
/// decide what its status means.
pub fn send_with_retries<F>(
    max_retries: usize,
    mut make_req: F,
    on_error: fn(String) -> HarvestError,
) -> Result<Response, HarvestError>
where
    F: FnMut() -> RequestBuilder,
{
    let mut attempt = 0usize;
    loop {
        match make_req().send() {
            Ok(resp) => {
                let status = resp.status().as_u16();
                if attempt < max_retries && is_retryable_status(status) {
                    tracing::debug!(status, attempt, "retrying request");
                    backoff(attempt);
                    attempt += 1;
                    continue;
                }
                return Ok(resp);
            }
            Err(err) => {
                if attempt < max_retries && is_retryable_error(&err) {
                    tracing::debug!(error = %err, attempt, "retrying request");
                    backoff(attempt);
                    attempt += 1;
                    continue;
                }
                return Err(on_error(err.to_string()));
            }
        }
    }
}

fn backoff(attempt: usize) {
    let delay = BASE_DELAY_MS * (attempt as u64 + 1);
    thread::sleep(Duration::from_millis(delay));
}

pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
