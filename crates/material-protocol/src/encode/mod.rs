//! Request envelopes sent to package material plugins.
//!
//! An envelope is a JSON object with fixed top-level labels. Configuration
//! sets travel as `{"<key>": {"value": <string or null>}}` in insertion
//! order; display metadata never leaves the host. Building an envelope
//! cannot fail.

use serde_json::{Map, Value};

use crate::configuration::ConfigurationSet;
use crate::revision::PackageRevision;
use crate::wire::{
    PACKAGE_CONFIGURATION, PREVIOUS_REVISION, REPOSITORY_CONFIGURATION, format_timestamp,
};

/// Builder for one request envelope.
///
/// Sections are emitted in the order they are added.
///
/// # Example
///
/// ```
/// use material_protocol::{ConfigurationProperty, ConfigurationSet, RequestEnvelope};
///
/// let repository = ConfigurationSet::new()
///     .with(ConfigurationProperty::new("url").with_value("http://repo"));
/// let json = RequestEnvelope::new().repository(&repository).into_json();
/// assert_eq!(json, r#"{"repository-configuration":{"url":{"value":"http://repo"}}}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestEnvelope {
    body: Map<String, Value>,
}

impl RequestEnvelope {
    /// Creates an empty envelope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the `repository-configuration` section.
    #[must_use]
    pub fn repository(mut self, repository: &ConfigurationSet) -> Self {
        self.body
            .insert(REPOSITORY_CONFIGURATION.to_owned(), configuration_to_value(repository));
        self
    }

    /// Adds the `package-configuration` section.
    #[must_use]
    pub fn package(mut self, package: &ConfigurationSet) -> Self {
        self.body
            .insert(PACKAGE_CONFIGURATION.to_owned(), configuration_to_value(package));
        self
    }

    /// Adds the `previous-revision` section.
    #[must_use]
    pub fn previous_revision(mut self, revision: &PackageRevision) -> Self {
        self.body
            .insert(PREVIOUS_REVISION.to_owned(), revision_to_value(revision));
        self
    }

    /// Returns the envelope as a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    /// Serialises the envelope to compact JSON text.
    #[must_use]
    pub fn into_json(self) -> String {
        self.into_value().to_string()
    }
}

/// Encodes a configuration set as `key -> {"value": ...}`.
fn configuration_to_value(configuration: &ConfigurationSet) -> Value {
    let entries = configuration
        .iter()
        .map(|property| {
            let value = property
                .resolved_value()
                .map_or(Value::Null, |text| Value::String(text.to_owned()));
            let mut entry = Map::new();
            entry.insert("value".to_owned(), value);
            (property.key().to_owned(), Value::Object(entry))
        })
        .collect();
    Value::Object(entries)
}

/// Encodes the fields of a revision the plugin needs to resume polling.
fn revision_to_value(revision: &PackageRevision) -> Value {
    let mut map = Map::new();
    map.insert(
        "revision".to_owned(),
        Value::String(revision.revision().to_owned()),
    );
    map.insert(
        "timestamp".to_owned(),
        Value::String(format_timestamp(revision.timestamp())),
    );
    map.insert("data".to_owned(), Value::Object(revision.data().clone()));
    Value::Object(map)
}
