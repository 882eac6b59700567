pub mod flickr;

use async_trait::async_trait;
use crate::models::photo::PageResponse;

/// Why a page fetch produced nothing usable.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network, timeout, HTTP status or body decoding failure.
    #[error("transport: {0}")]
    Transport(String),

    /// The provider answered but reported a non-"ok" status.
    #[error("provider status {status:?}: {}", .message.as_deref().unwrap_or("no message"))]
    Provider { status: String, message: Option<String> },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

/// Remote photo search. Implementations own their timeouts.
#[async_trait]
pub trait PhotoProvider: Send + Sync + 'static {
    /// First page of results for `query`.
    async fn search(&self, query: &str) -> Result<PageResponse, FetchError> {
        self.search_page(query, 1).await
    }

    async fn search_page(&self, query: &str, page: u32) -> Result<PageResponse, FetchError>;
}

/// Anything but an "ok" status is a failure, whatever the transport said.
pub fn accept(response: PageResponse) -> Result<PageResponse, FetchError> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(FetchError::Provider { status: response.status, message: response.message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::photo::PhotoRecord;

    #[test]
    fn test_accept_ok() {
        let resp = PageResponse::ok(vec![PhotoRecord::with_id("1")]);
        let accepted = accept(resp).unwrap();
        assert_eq!(accepted.photos.len(), 1);
    }

    #[test]
    fn test_accept_fail_status() {
        let err = accept(PageResponse::failed("fail", Some("Invalid API Key".into()))).unwrap_err();
        assert_eq!(err, FetchError::Provider { status: "fail".into(), message: Some("Invalid API Key".into()) });
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[test]
    fn test_accept_error_status_without_message() {
        let err = accept(PageResponse::failed("error", None)).unwrap_err();
        assert_eq!(err.to_string(), "provider status \"error\": no message");
    }
}
