use std::borrow::Cow;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ApiError;

/// A fully-read HTTP response.
///
/// Dispatch never interprets the status code; callers that care can use
/// [`RawResponse::error_for_status`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Read the whole body of a reqwest response.
    ///
    /// If the body cannot be read, the error comes back with a response that
    /// keeps the status and headers but has an empty body.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, (reqwest::Error, Self)> {
        let status = response.status();
        let headers = response.headers().clone();
        match response.bytes().await {
            Ok(body) => Ok(Self::new(status, headers, body.to_vec())),
            Err(e) => Err((e, Self::new(status, headers, Vec::new()))),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Map non-2xx statuses onto the matching [`ApiError`] variant.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_status(self.status, &self.text()))
        }
    }
}

/// A decoded payload together with the response it came from.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub raw: RawResponse,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}
