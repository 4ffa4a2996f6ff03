//! Status classification and body decoding.
//!
//! Everything here is a pure function of the status code and body bytes: no
//! logging, no retries, no shared state.

use api::{ClientError, Operation, Result};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// A response received from the daemon, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A response without headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// What a status code means for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// HTTP 204: success, and there is nothing to decode.
    NoContent,
    /// Any other status below 400, with its body.
    Success(Vec<u8>),
    /// Status 400 or above, with the raw body.
    Failure { status: u16, body: Vec<u8> },
}

impl ResponseOutcome {
    pub fn classify(response: RawResponse) -> Self {
        match response.status {
            204 => Self::NoContent,
            status if status >= 400 => Self::Failure {
                status,
                body: response.body,
            },
            _ => Self::Success(response.body),
        }
    }

    /// Turns a failure into [`ClientError::Http`]; `None` for no-content.
    pub fn into_body(self, operation: &Operation) -> Result<Option<Vec<u8>>> {
        match self {
            Self::NoContent => Ok(None),
            Self::Success(body) => Ok(Some(body)),
            Self::Failure { status, body } => Err(ClientError::Http {
                status,
                operation: operation.clone(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }
}

/// Classifies the response and discards any success body.
pub fn check(operation: &Operation, response: RawResponse) -> Result<()> {
    ResponseOutcome::classify(response)
        .into_body(operation)
        .map(drop)
}

/// Classifies the response and decodes a success body into `destination`.
///
/// On 204 the destination is left exactly as it was.
pub fn decode_into<T>(operation: &Operation, response: RawResponse, destination: &mut T) -> Result<()>
where
    T: DeserializeOwned,
{
    if let Some(body) = ResponseOutcome::classify(response).into_body(operation)? {
        *destination = parse(operation, &body)?;
    }
    Ok(())
}

/// Classifies the response and decodes a success body; 204 yields
/// `T::default()`.
pub fn decode<T>(operation: &Operation, response: RawResponse) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let mut value = T::default();
    decode_into(operation, response, &mut value)?;
    Ok(value)
}

/// Classifies the response and returns the success body verbatim; empty on
/// 204.
pub fn into_bytes(operation: &Operation, response: RawResponse) -> Result<Vec<u8>> {
    ResponseOutcome::classify(response)
        .into_body(operation)
        .map(Option::unwrap_or_default)
}

fn parse<T: DeserializeOwned>(operation: &Operation, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode {
        operation: operation.clone(),
        source,
    })
}
