//! Validation and connection-check outcomes reported by plugins.

/// A single problem a plugin found with a configuration.
///
/// An error without a key applies to the configuration as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    key: Option<String>,
    message: String,
}

impl ValidationError {
    /// Creates an error scoped to an optional property key.
    #[must_use]
    pub fn new(key: Option<String>, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }

    /// Creates an error for the given property key.
    #[must_use]
    pub fn for_key(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Some(key.into()), message)
    }

    /// Creates an error that is not tied to a property.
    #[must_use]
    pub fn global(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    /// Returns the property key, or `None` for a global error.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the error message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns `true` when the error is not tied to a property.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.key.is_none()
    }
}

/// Outcome of asking a plugin to validate a configuration.
///
/// # Example
///
/// ```
/// use material_protocol::{ValidationError, ValidationResult};
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_successful());
/// result.add_error(ValidationError::for_key("url", "url is required"));
/// assert!(!result.is_successful());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates a result with no errors.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records an error.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns the errors in the order the plugin reported them.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the error messages in order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(ValidationError::message)
    }

    /// Returns `true` when no errors were reported.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }
}

impl FromIterator<ValidationError> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

/// Outcome of asking a plugin to reach a repository or package.
///
/// # Example
///
/// ```
/// use material_protocol::CheckConnectionResult;
///
/// let result = CheckConnectionResult::failure(vec!["timeout".into()]);
/// assert!(!result.is_successful());
/// assert_eq!(result.messages(), ["timeout"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConnectionResult {
    succeeded: bool,
    messages: Vec<String>,
}

impl CheckConnectionResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn success(messages: Vec<String>) -> Self {
        Self {
            succeeded: true,
            messages,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub const fn failure(messages: Vec<String>) -> Self {
        Self {
            succeeded: false,
            messages,
        }
    }

    /// Returns whether the connection succeeded.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.succeeded
    }

    /// Returns the messages attached to the outcome.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}
