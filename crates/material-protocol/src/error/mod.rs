//! Errors raised while decoding plugin responses or exchanging messages.
//!
//! Every rejected payload surfaces as one [`DecodeError`]. The error carries
//! an [`ErrorKind`] so callers can inspect the failure programmatically, the
//! offending field or property key where one applies, and a message naming
//! the expected type or shape. The JSON parser error is wrapped in `Arc` so
//! the type stays `Clone + Send + Sync`.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::client::RequestName;

/// Category of a decoding failure.
///
/// # Example
///
/// ```
/// use material_protocol::ErrorKind;
///
/// assert_eq!(ErrorKind::EmptyPayload.as_str(), "empty_payload");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The payload is not valid JSON.
    MalformedPayload,
    /// The top-level JSON type does not match the operation.
    UnexpectedShape,
    /// A map-shaped result was expected but the body was empty.
    EmptyPayload,
    /// A mandatory field is absent.
    MissingRequiredField,
    /// A field is present with the wrong type.
    FieldTypeMismatch,
    /// A configuration entry is not a map.
    PropertyNotAMap,
    /// A configuration entry has an empty key.
    EmptyPropertyKey,
    /// A timestamp does not follow `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`.
    InvalidTimestampFormat,
    /// A connection-check message is not a string.
    MessageTypeMismatch,
    /// A validation error entry is not a map.
    ValidationErrorNotAMap,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedPayload => "malformed_payload",
            Self::UnexpectedShape => "unexpected_shape",
            Self::EmptyPayload => "empty_payload",
            Self::MissingRequiredField => "missing_required_field",
            Self::FieldTypeMismatch => "field_type_mismatch",
            Self::PropertyNotAMap => "property_not_a_map",
            Self::EmptyPropertyKey => "empty_property_key",
            Self::InvalidTimestampFormat => "invalid_timestamp_format",
            Self::MessageTypeMismatch => "message_type_mismatch",
            Self::ValidationErrorNotAMap => "validation_error_not_a_map",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plugin response that could not be decoded into its typed result.
#[derive(Debug, Clone, Error)]
#[error("unable to de-serialize json response: {message}")]
pub struct DecodeError {
    kind: ErrorKind,
    field: Option<String>,
    message: String,
    #[source]
    source: Option<Arc<serde_json::Error>>,
}

impl DecodeError {
    /// Creates an error of the given kind with a human-readable message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps a JSON syntax error.
    #[must_use]
    pub fn malformed(source: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::MalformedPayload,
            field: None,
            message: format!("response body is not valid json ({source})"),
            source: Some(Arc::new(source)),
        }
    }

    /// Attaches the offending field or property key.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the offending field or property key, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the failure detail without the outer prefix.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Failure reported by a [`MaterialTransport`](crate::client::MaterialTransport).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Creates a transport error with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the failure description.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors arising from a full request/response exchange with a plugin.
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    /// The transport failed to deliver the request or fetch the response.
    #[error("plugin request '{request}' failed: {source}")]
    Transport {
        /// Request that was being sent.
        request: RequestName,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The plugin answered with a payload that violates the protocol.
    #[error("plugin request '{request}' returned an invalid response: {source}")]
    Decode {
        /// Request whose response was rejected.
        request: RequestName,
        /// Underlying decoding failure.
        #[source]
        source: DecodeError,
    },
}

impl ExchangeError {
    /// Returns the request that failed.
    #[must_use]
    pub const fn request(&self) -> RequestName {
        match self {
            Self::Transport { request, .. } | Self::Decode { request, .. } => *request,
        }
    }
}
