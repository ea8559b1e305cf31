//! Versioned JSON message protocol for package material plugins.
//!
//! The `material-protocol` crate translates between the server's domain
//! objects (configuration sets, validation results, connection-check results
//! and package revisions) and the JSON documents exchanged with external
//! package repository plugins.
//!
//! Requests are encoded deterministically: configuration sets become
//! `{"<key>": {"value": ...}}` maps and revisions carry a timestamp in the
//! fixed `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'` format. Responses are validated
//! field by field before any domain object is built, so a malformed plugin
//! response surfaces as a single [`DecodeError`] naming the offending field
//! and never as a half-populated value.
//!
//! # Architecture
//!
//! A [`JsonMessageHandler`] implements one protocol version.
//! [`JsonMessageHandlerV1`] speaks version `1.0`. The
//! [`PackageMaterialClient`] combines a handler with a [`MaterialTransport`]
//! that carries request bodies to a plugin and returns its raw responses.
//!
//! # Example
//!
//! ```
//! use material_protocol::{
//!     ConfigurationProperty, ConfigurationSet, JsonMessageHandler, JsonMessageHandlerV1,
//! };
//!
//! let handler = JsonMessageHandlerV1;
//! let repository = ConfigurationSet::new()
//!     .with(ConfigurationProperty::new("url").with_value("http://repo"));
//!
//! let request = handler.request_for_check_repository_connection(&repository);
//! assert_eq!(request, r#"{"repository-configuration":{"url":{"value":"http://repo"}}}"#);
//!
//! let result = handler
//!     .response_for_check_repository_connection(r#"{"status":"success","messages":["ok"]}"#)
//!     .expect("valid response");
//! assert!(result.is_successful());
//! ```

pub mod client;
pub mod configuration;
mod decode;
pub mod encode;
pub mod error;
mod fields;
pub mod handler;
pub mod results;
pub mod revision;
pub mod wire;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

#[cfg(test)]
mod tests;

pub use self::client::{MaterialRequest, MaterialTransport, PackageMaterialClient, RequestName};
pub use self::configuration::{
    ConfigurationProperty, ConfigurationSet, PackageConfiguration, RepositoryConfiguration,
};
pub use self::encode::RequestEnvelope;
pub use self::error::{DecodeError, ErrorKind, ExchangeError, TransportError};
pub use self::handler::{JsonMessageHandler, JsonMessageHandlerV1};
pub use self::results::{CheckConnectionResult, ValidationError, ValidationResult};
pub use self::revision::PackageRevision;
