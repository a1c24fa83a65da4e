//! JSON HTTP client bound to a fixed base address

use crate::client::error::{SubmitError, SubmitResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Preconfigured request client.
///
/// Every request carries a JSON content type and is resolved against the
/// base address given at construction. The client holds no per-request
/// state.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
}

impl HttpClient {
    /// Create a new client for the given base address
    pub fn new(base_url: &str, request_timeout: Duration) -> SubmitResult<Self> {
        let base_url = Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| SubmitError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
        })
    }

    /// Base address requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path against the base address
    pub fn endpoint(&self, path: &str) -> SubmitResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> SubmitResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let bytes = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn map_send_error(&self, err: reqwest::Error) -> SubmitError {
        if err.is_timeout() {
            SubmitError::timeout(self.request_timeout)
        } else {
            SubmitError::from(err)
        }
    }
}

/// Map a non-success HTTP status to an error.
///
/// 400 and 422 mean the backend rejected the payload itself.
fn status_error(status: StatusCode, body: &str) -> SubmitError {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string()
    } else {
        body.trim().chars().take(200).collect()
    };

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            SubmitError::validation(message)
        }
        _ => SubmitError::server(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ErrorKind;

    #[test]
    fn test_endpoint_joins_path() {
        let client = HttpClient::new("https://cms.example.com/", Duration::from_secs(5)).unwrap();
        let url = client.endpoint("/graphql").unwrap();
        assert_eq!(url.as_str(), "https://cms.example.com/graphql");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(SubmitError::Configuration { .. })));
    }

    #[test]
    fn test_status_error_classification() {
        let error = status_error(StatusCode::UNPROCESSABLE_ENTITY, "");
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.to_string(), "Invalid form data: Unprocessable Entity");

        let error = status_error(StatusCode::BAD_REQUEST, "missing email");
        assert_eq!(error, SubmitError::validation("missing email"));

        let error = status_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(error, SubmitError::server(503, "Service Unavailable"));
        assert!(error.is_retryable());
    }
}
