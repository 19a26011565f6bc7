//! Blocking HTTP exchanges over libcurl (via the `curl` crate).
//!
//! Two calls are needed: a GET for the listing page and a JSON POST for the
//! webhook. Both run on the calling thread with a hard total timeout and no
//! retries.

mod error;

pub use error::HttpError;

use curl::easy::{Easy, List};
use std::time::Duration;

const USER_AGENT: &str = concat!("awatch/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// GET `url`, following redirects. Non-2xx is returned as `HttpError::Status`.
pub fn get(url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.accept_encoding("")?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(CONNECT_TIMEOUT.min(timeout))?;
    easy.timeout(timeout)?;

    let response = perform(&mut easy)?;
    tracing::debug!(url, status = response.status, bytes = response.body.len(), "GET done");
    ensure_success(response)
}

/// POST `body` as `application/json` to `url`. Non-2xx is returned as `HttpError::Status`.
pub fn post_json(url: &str, body: &[u8], timeout: Duration) -> Result<HttpResponse, HttpError> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;
    easy.useragent(USER_AGENT)?;
    easy.connect_timeout(CONNECT_TIMEOUT.min(timeout))?;
    easy.timeout(timeout)?;

    let mut headers = List::new();
    headers.append("Content-Type: application/json")?;
    // No 100-continue round trip.
    headers.append("Expect:")?;
    easy.http_headers(headers)?;

    let response = perform(&mut easy)?;
    tracing::debug!(status = response.status, "POST done");
    ensure_success(response)
}

fn perform(easy: &mut Easy) -> Result<HttpResponse, HttpError> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let status = easy.response_code()?;
    Ok(HttpResponse { status, body })
}

fn ensure_success(response: HttpResponse) -> Result<HttpResponse, HttpError> {
    if (200..300).contains(&response.status) {
        Ok(response)
    } else {
        Err(HttpError::Status(response.status))
    }
}
