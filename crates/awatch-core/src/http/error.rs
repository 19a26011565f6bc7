//! Error type for a single HTTP exchange.

/// Transport failure or non-2xx status from a GET or POST.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Curl(e) if e.is_operation_timedout())
    }
}
