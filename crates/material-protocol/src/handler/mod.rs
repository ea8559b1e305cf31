//! Versioned message handlers.
//!
//! A [`JsonMessageHandler`] pairs every plugin request with the encoder for
//! its request body and the decoder for its response body. The plugin
//! invocation layer picks the handler matching the version a plugin
//! declares and hands it raw response text; this crate never selects a
//! version itself.

use crate::configuration::{PackageConfiguration, RepositoryConfiguration};
use crate::decode;
use crate::encode::RequestEnvelope;
use crate::error::DecodeError;
use crate::results::{CheckConnectionResult, ValidationResult};
use crate::revision::PackageRevision;

/// Encodes requests to, and decodes responses from, package material
/// plugins for one protocol version.
///
/// Request methods are pure and infallible. Response methods either return
/// a fully validated result or a [`DecodeError`].
///
/// # Example
///
/// ```
/// use material_protocol::{JsonMessageHandler, JsonMessageHandlerV1};
///
/// let handler = JsonMessageHandlerV1;
/// let result = handler
///     .response_for_check_repository_connection(r#"{"status":"success"}"#)
///     .expect("valid response");
/// assert!(result.is_successful());
/// ```
pub trait JsonMessageHandler: Send + Sync {
    /// Returns the protocol version this handler speaks.
    fn version(&self) -> &'static str;

    /// Decodes the repository configuration a plugin accepts.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body is not a non-empty map of
    /// well-formed property descriptions.
    fn response_for_repository_configuration(
        &self,
        body: &str,
    ) -> Result<RepositoryConfiguration, DecodeError>;

    /// Decodes the package configuration a plugin accepts.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body is not a non-empty map of
    /// well-formed property descriptions.
    fn response_for_package_configuration(
        &self,
        body: &str,
    ) -> Result<PackageConfiguration, DecodeError>;

    /// Encodes a request to validate a repository configuration.
    fn request_for_validate_repository_configuration(
        &self,
        repository: &RepositoryConfiguration,
    ) -> String;

    /// Decodes the outcome of validating a repository configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body is not a list of
    /// well-formed validation errors.
    fn response_for_validate_repository_configuration(
        &self,
        body: &str,
    ) -> Result<ValidationResult, DecodeError>;

    /// Encodes a request to check the connection to a repository.
    fn request_for_check_repository_connection(
        &self,
        repository: &RepositoryConfiguration,
    ) -> String;

    /// Decodes the outcome of checking the connection to a repository.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body lacks a status or carries
    /// malformed messages.
    fn response_for_check_repository_connection(
        &self,
        body: &str,
    ) -> Result<CheckConnectionResult, DecodeError>;

    /// Encodes a request to validate a package configuration.
    fn request_for_validate_package_configuration(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> String;

    /// Decodes the outcome of validating a package configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body is not a list of
    /// well-formed validation errors.
    fn response_for_validate_package_configuration(
        &self,
        body: &str,
    ) -> Result<ValidationResult, DecodeError>;

    /// Encodes a request to check the connection to a package.
    fn request_for_check_package_connection(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> String;

    /// Decodes the outcome of checking the connection to a package.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body lacks a status or carries
    /// malformed messages.
    fn response_for_check_package_connection(
        &self,
        body: &str,
    ) -> Result<CheckConnectionResult, DecodeError>;

    /// Encodes a request for the latest revision of a package.
    fn request_for_latest_revision(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> String;

    /// Decodes the latest revision of a package.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body is empty or any revision
    /// field is missing or malformed.
    fn response_for_latest_revision(&self, body: &str) -> Result<PackageRevision, DecodeError>;

    /// Encodes a request for a revision newer than `previous`.
    fn request_for_latest_revision_since(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
        previous: &PackageRevision,
    ) -> String;

    /// Decodes a revision newer than the previous one.
    ///
    /// Returns `Ok(None)` when the plugin reports nothing newer.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when a non-empty body is not a well-formed
    /// revision.
    fn response_for_latest_revision_since(
        &self,
        body: &str,
    ) -> Result<Option<PackageRevision>, DecodeError>;
}

/// Handler for version `1.0` of the package material protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonMessageHandlerV1;

impl JsonMessageHandlerV1 {
    /// Protocol version implemented by this handler.
    pub const VERSION: &'static str = "1.0";
}

impl JsonMessageHandler for JsonMessageHandlerV1 {
    fn version(&self) -> &'static str {
        Self::VERSION
    }

    fn response_for_repository_configuration(
        &self,
        body: &str,
    ) -> Result<RepositoryConfiguration, DecodeError> {
        decode::configuration(body, "repository configuration")
    }

    fn response_for_package_configuration(
        &self,
        body: &str,
    ) -> Result<PackageConfiguration, DecodeError> {
        decode::configuration(body, "package configuration")
    }

    fn request_for_validate_repository_configuration(
        &self,
        repository: &RepositoryConfiguration,
    ) -> String {
        RequestEnvelope::new().repository(repository).into_json()
    }

    fn response_for_validate_repository_configuration(
        &self,
        body: &str,
    ) -> Result<ValidationResult, DecodeError> {
        decode::validation_result(body)
    }

    fn request_for_check_repository_connection(
        &self,
        repository: &RepositoryConfiguration,
    ) -> String {
        RequestEnvelope::new().repository(repository).into_json()
    }

    fn response_for_check_repository_connection(
        &self,
        body: &str,
    ) -> Result<CheckConnectionResult, DecodeError> {
        decode::check_connection_result(body)
    }

    fn request_for_validate_package_configuration(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> String {
        RequestEnvelope::new()
            .repository(repository)
            .package(package)
            .into_json()
    }

    fn response_for_validate_package_configuration(
        &self,
        body: &str,
    ) -> Result<ValidationResult, DecodeError> {
        decode::validation_result(body)
    }

    fn request_for_check_package_connection(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> String {
        RequestEnvelope::new()
            .repository(repository)
            .package(package)
            .into_json()
    }

    fn response_for_check_package_connection(
        &self,
        body: &str,
    ) -> Result<CheckConnectionResult, DecodeError> {
        decode::check_connection_result(body)
    }

    fn request_for_latest_revision(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> String {
        RequestEnvelope::new()
            .repository(repository)
            .package(package)
            .into_json()
    }

    fn response_for_latest_revision(&self, body: &str) -> Result<PackageRevision, DecodeError> {
        decode::package_revision(body)
    }

    fn request_for_latest_revision_since(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
        previous: &PackageRevision,
    ) -> String {
        RequestEnvelope::new()
            .repository(repository)
            .package(package)
            .previous_revision(previous)
            .into_json()
    }

    fn response_for_latest_revision_since(
        &self,
        body: &str,
    ) -> Result<Option<PackageRevision>, DecodeError> {
        decode::package_revision_since(body)
    }
}
