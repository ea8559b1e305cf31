//! Request/response exchange with a package material plugin.
//!
//! The [`PackageMaterialClient`] is the entry point the plugin invocation
//! layer calls. It encodes the request body with a [`JsonMessageHandler`],
//! hands it to a [`MaterialTransport`], and decodes the raw response with
//! the same handler.
//!
//! The transport abstraction enables test doubles that return
//! pre-configured responses without talking to a real plugin.

use std::fmt;

use tracing::{debug, warn};

use crate::configuration::{PackageConfiguration, RepositoryConfiguration};
use crate::error::{DecodeError, ExchangeError, TransportError};
use crate::handler::{JsonMessageHandler, JsonMessageHandlerV1};
use crate::results::{CheckConnectionResult, ValidationResult};
use crate::revision::PackageRevision;

/// Tracing target for plugin exchanges.
const CLIENT_TARGET: &str = "material_protocol::client";

/// Name of a request understood by package material plugins.
///
/// # Example
///
/// ```
/// use material_protocol::RequestName;
///
/// assert_eq!(RequestName::LatestRevisionSince.as_str(), "latest-revision-since");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestName {
    /// Ask which repository properties the plugin accepts.
    RepositoryConfiguration,
    /// Ask which package properties the plugin accepts.
    PackageConfiguration,
    /// Validate a repository configuration.
    ValidateRepositoryConfiguration,
    /// Validate a package configuration.
    ValidatePackageConfiguration,
    /// Check that the repository is reachable.
    CheckRepositoryConnection,
    /// Check that the package is reachable.
    CheckPackageConnection,
    /// Fetch the latest revision of a package.
    LatestRevision,
    /// Fetch a revision newer than a previous one.
    LatestRevisionSince,
}

impl RequestName {
    /// Returns the canonical request name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RepositoryConfiguration => "repository-configuration",
            Self::PackageConfiguration => "package-configuration",
            Self::ValidateRepositoryConfiguration => "validate-repository-configuration",
            Self::ValidatePackageConfiguration => "validate-package-configuration",
            Self::CheckRepositoryConnection => "check-repository-connection",
            Self::CheckPackageConnection => "check-package-connection",
            Self::LatestRevision => "latest-revision",
            Self::LatestRevisionSince => "latest-revision-since",
        }
    }
}

impl fmt::Display for RequestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message to deliver to a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRequest {
    name: RequestName,
    body: Option<String>,
}

impl MaterialRequest {
    /// Creates a request without a body.
    #[must_use]
    pub const fn new(name: RequestName) -> Self {
        Self { name, body: None }
    }

    /// Creates a request carrying a JSON body.
    #[must_use]
    pub const fn with_body(name: RequestName, body: String) -> Self {
        Self {
            name,
            body: Some(body),
        }
    }

    /// Returns the request name.
    #[must_use]
    pub const fn name(&self) -> RequestName {
        self.name
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Delivers requests to a plugin and returns its raw response text.
///
/// Timeouts, retries and plugin lifecycle are the transport's concern.
///
/// # Example
///
/// ```
/// use material_protocol::{MaterialRequest, MaterialTransport, TransportError};
///
/// struct Canned;
///
/// impl MaterialTransport for Canned {
///     fn submit(&self, _request: &MaterialRequest) -> Result<String, TransportError> {
///         Ok(String::from(r#"{"status":"success"}"#))
///     }
/// }
/// ```
pub trait MaterialTransport {
    /// Sends the request and returns the plugin's response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the plugin cannot be reached or does
    /// not answer.
    fn submit(&self, request: &MaterialRequest) -> Result<String, TransportError>;
}

/// Talks to one package material plugin through a transport.
///
/// # Example
///
/// ```
/// use material_protocol::{
///     ConfigurationProperty, ConfigurationSet, MaterialRequest, MaterialTransport,
///     PackageMaterialClient, TransportError,
/// };
///
/// struct Canned;
///
/// impl MaterialTransport for Canned {
///     fn submit(&self, _request: &MaterialRequest) -> Result<String, TransportError> {
///         Ok(String::from(r#"{"status":"failure","messages":["timeout"]}"#))
///     }
/// }
///
/// let client = PackageMaterialClient::new(Canned);
/// let repository = ConfigurationSet::new()
///     .with(ConfigurationProperty::new("url").with_value("http://repo"));
/// let result = client.check_repository_connection(&repository).expect("exchange");
/// assert!(!result.is_successful());
/// ```
#[derive(Debug)]
pub struct PackageMaterialClient<T, H = JsonMessageHandlerV1> {
    transport: T,
    handler: H,
}

impl<T> PackageMaterialClient<T> {
    /// Creates a client speaking protocol version 1.0.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            handler: JsonMessageHandlerV1,
        }
    }
}

impl<T, H> PackageMaterialClient<T, H> {
    /// Creates a client with an explicit message handler.
    #[must_use]
    pub const fn with_handler(transport: T, handler: H) -> Self {
        Self { transport, handler }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the message handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }
}

impl<T: MaterialTransport, H: JsonMessageHandler> PackageMaterialClient<T, H> {
    /// Fetches the repository properties the plugin accepts.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn repository_configuration(&self) -> Result<RepositoryConfiguration, ExchangeError> {
        self.exchange(
            &MaterialRequest::new(RequestName::RepositoryConfiguration),
            H::response_for_repository_configuration,
        )
    }

    /// Fetches the package properties the plugin accepts.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn package_configuration(&self) -> Result<PackageConfiguration, ExchangeError> {
        self.exchange(
            &MaterialRequest::new(RequestName::PackageConfiguration),
            H::response_for_package_configuration,
        )
    }

    /// Asks the plugin to validate a repository configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn validate_repository_configuration(
        &self,
        repository: &RepositoryConfiguration,
    ) -> Result<ValidationResult, ExchangeError> {
        let body = self
            .handler
            .request_for_validate_repository_configuration(repository);
        self.exchange(
            &MaterialRequest::with_body(RequestName::ValidateRepositoryConfiguration, body),
            H::response_for_validate_repository_configuration,
        )
    }

    /// Asks the plugin to validate a package configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn validate_package_configuration(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> Result<ValidationResult, ExchangeError> {
        let body = self
            .handler
            .request_for_validate_package_configuration(package, repository);
        self.exchange(
            &MaterialRequest::with_body(RequestName::ValidatePackageConfiguration, body),
            H::response_for_validate_package_configuration,
        )
    }

    /// Asks the plugin whether the repository is reachable.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn check_repository_connection(
        &self,
        repository: &RepositoryConfiguration,
    ) -> Result<CheckConnectionResult, ExchangeError> {
        let body = self
            .handler
            .request_for_check_repository_connection(repository);
        self.exchange(
            &MaterialRequest::with_body(RequestName::CheckRepositoryConnection, body),
            H::response_for_check_repository_connection,
        )
    }

    /// Asks the plugin whether the package is reachable.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn check_package_connection(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> Result<CheckConnectionResult, ExchangeError> {
        let body = self
            .handler
            .request_for_check_package_connection(package, repository);
        self.exchange(
            &MaterialRequest::with_body(RequestName::CheckPackageConnection, body),
            H::response_for_check_package_connection,
        )
    }

    /// Fetches the latest revision of a package.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn latest_revision(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
    ) -> Result<PackageRevision, ExchangeError> {
        let body = self.handler.request_for_latest_revision(package, repository);
        self.exchange(
            &MaterialRequest::with_body(RequestName::LatestRevision, body),
            H::response_for_latest_revision,
        )
    }

    /// Fetches a revision newer than `previous`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the transport fails or the response
    /// is invalid.
    pub fn latest_revision_since(
        &self,
        package: &PackageConfiguration,
        repository: &RepositoryConfiguration,
        previous: &PackageRevision,
    ) -> Result<Option<PackageRevision>, ExchangeError> {
        let body = self
            .handler
            .request_for_latest_revision_since(package, repository, previous);
        self.exchange(
            &MaterialRequest::with_body(RequestName::LatestRevisionSince, body),
            H::response_for_latest_revision_since,
        )
    }

    fn exchange<R>(
        &self,
        request: &MaterialRequest,
        decode: impl FnOnce(&H, &str) -> Result<R, DecodeError>,
    ) -> Result<R, ExchangeError> {
        let name = request.name();
        debug!(
            target: CLIENT_TARGET,
            request = name.as_str(),
            version = self.handler.version(),
            request_bytes = request.body().map_or(0, str::len),
            "submitting plugin request"
        );

        let response = self.transport.submit(request).map_err(|source| {
            warn!(
                target: CLIENT_TARGET,
                request = name.as_str(),
                error = %source,
                "plugin transport failed"
            );
            ExchangeError::Transport {
                request: name,
                source,
            }
        })?;

        debug!(
            target: CLIENT_TARGET,
            request = name.as_str(),
            response_bytes = response.len(),
            "received plugin response"
        );

        decode(&self.handler, &response).map_err(|source| {
            warn!(
                target: CLIENT_TARGET,
                request = name.as_str(),
                kind = %source.kind(),
                error = %source,
                "plugin response rejected"
            );
            ExchangeError::Decode {
                request: name,
                source,
            }
        })
    }
}
