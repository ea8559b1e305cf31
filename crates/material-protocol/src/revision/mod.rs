//! Package revisions polled from a repository.

use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::wire::truncate_to_millis;

/// A single unit of change reported by a package material plugin.
///
/// Timestamps are held in UTC with millisecond precision, matching what the
/// wire format can carry. The `data` bag is opaque to the protocol and is
/// handed back to the plugin on the next "latest revision since" query.
///
/// # Example
///
/// ```
/// use material_protocol::PackageRevision;
/// use material_protocol::wire::parse_timestamp;
///
/// let timestamp = parse_timestamp("2014-01-01T10:00:00.000Z").expect("valid timestamp");
/// let revision = PackageRevision::new("go-agent-13.1.0-1234", timestamp)
///     .with_user("builder")
///     .with_data_entry("VERSION", "13.1.0");
/// assert_eq!(revision.revision(), "go-agent-13.1.0-1234");
/// assert_eq!(revision.user(), Some("builder"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRevision {
    revision: String,
    timestamp: OffsetDateTime,
    user: Option<String>,
    revision_comment: Option<String>,
    trackback_url: Option<String>,
    data: Map<String, Value>,
}

impl PackageRevision {
    /// Creates a revision with the given label and timestamp.
    #[must_use]
    pub fn new(revision: impl Into<String>, timestamp: OffsetDateTime) -> Self {
        Self {
            revision: revision.into(),
            timestamp: truncate_to_millis(timestamp),
            user: None,
            revision_comment: None,
            trackback_url: None,
            data: Map::new(),
        }
    }

    /// Sets the user who made the change.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the change comment.
    #[must_use]
    pub fn with_revision_comment(mut self, comment: impl Into<String>) -> Self {
        self.revision_comment = Some(comment.into());
        self
    }

    /// Sets the URL describing the change.
    #[must_use]
    pub fn with_trackback_url(mut self, url: impl Into<String>) -> Self {
        self.trackback_url = Some(url.into());
        self
    }

    /// Replaces the metadata bag.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Adds one metadata entry.
    #[must_use]
    pub fn with_data_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Returns the revision label.
    #[must_use]
    pub const fn revision(&self) -> &str {
        self.revision.as_str()
    }

    /// Returns when the change happened, in UTC.
    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// Returns the user who made the change.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the change comment.
    #[must_use]
    pub fn revision_comment(&self) -> Option<&str> {
        self.revision_comment.as_deref()
    }

    /// Returns the URL describing the change.
    #[must_use]
    pub fn trackback_url(&self) -> Option<&str> {
        self.trackback_url.as_deref()
    }

    /// Returns the metadata bag.
    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}
