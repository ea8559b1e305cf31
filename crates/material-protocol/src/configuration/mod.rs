//! Configuration properties exchanged with package material plugins.
//!
//! A [`ConfigurationSet`] is an ordered collection of
//! [`ConfigurationProperty`] values describing either a package repository
//! or a single package within it. Keys are unique; insertion order is kept
//! so plugins and the host see properties in the same order.

/// A single configuration property and its display metadata.
///
/// Only the key and the resolved value travel to the plugin. The remaining
/// attributes are populated when a plugin describes the configuration it
/// accepts.
///
/// # Example
///
/// ```
/// use material_protocol::ConfigurationProperty;
///
/// let property = ConfigurationProperty::new("url")
///     .with_default("http://localhost")
///     .with_required(true);
/// assert_eq!(property.key(), "url");
/// assert_eq!(property.resolved_value(), Some("http://localhost"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationProperty {
    key: String,
    value: Option<String>,
    default_value: Option<String>,
    part_of_identity: Option<bool>,
    secure: Option<bool>,
    required: Option<bool>,
    display_name: Option<String>,
    display_order: Option<i32>,
}

impl ConfigurationProperty {
    /// Creates a property with the given key and no value or metadata.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the configured value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Marks whether the property contributes to the material's identity.
    #[must_use]
    pub const fn with_part_of_identity(mut self, part_of_identity: bool) -> Self {
        self.part_of_identity = Some(part_of_identity);
        self
    }

    /// Marks whether the value must be stored encrypted.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Marks whether a value must be supplied.
    #[must_use]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Sets the label shown to users.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the position among sibling properties when displayed.
    #[must_use]
    pub const fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = Some(display_order);
        self
    }

    /// Returns the property key.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the configured value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the configured value, falling back to the default.
    #[must_use]
    pub fn resolved_value(&self) -> Option<&str> {
        self.value().or(self.default_value.as_deref())
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns whether the property is part of the material's identity.
    #[must_use]
    pub const fn part_of_identity(&self) -> Option<bool> {
        self.part_of_identity
    }

    /// Returns whether the property is secure.
    #[must_use]
    pub const fn secure(&self) -> Option<bool> {
        self.secure
    }

    /// Returns whether the property is required.
    #[must_use]
    pub const fn required(&self) -> Option<bool> {
        self.required
    }

    /// Returns the display label.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the display position.
    #[must_use]
    pub const fn display_order(&self) -> Option<i32> {
        self.display_order
    }
}

/// Ordered, key-unique collection of configuration properties.
///
/// Two sets compare equal when they hold the same keys with the same
/// values; display metadata and ordering are ignored.
///
/// # Example
///
/// ```
/// use material_protocol::{ConfigurationProperty, ConfigurationSet};
///
/// let mut set = ConfigurationSet::new();
/// set.add(ConfigurationProperty::new("url").with_value("http://a"));
/// set.add(ConfigurationProperty::new("url").with_value("http://b"));
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.get("url").and_then(|p| p.value()), Some("http://b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigurationSet {
    properties: Vec<ConfigurationProperty>,
}

/// Configuration describing a package repository.
pub type RepositoryConfiguration = ConfigurationSet;

/// Configuration describing a package within a repository.
pub type PackageConfiguration = ConfigurationSet;

impl ConfigurationSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Adds a property, replacing any earlier property with the same key in
    /// place.
    pub fn add(&mut self, property: ConfigurationProperty) {
        if let Some(existing) = self
            .properties
            .iter_mut()
            .find(|candidate| candidate.key == property.key)
        {
            *existing = property;
            return;
        }
        self.properties.push(property);
    }

    /// Adds a property and returns the set, for building literals.
    #[must_use]
    pub fn with(mut self, property: ConfigurationProperty) -> Self {
        self.add(property);
        self
    }

    /// Looks up a property by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigurationProperty> {
        self.properties.iter().find(|property| property.key == key)
    }

    /// Iterates over the properties in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigurationProperty> {
        self.properties.iter()
    }

    /// Returns the property keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(ConfigurationProperty::key)
    }

    /// Returns the number of properties.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` when the set holds no properties.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PartialEq for ConfigurationSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|property| {
                other
                    .get(property.key())
                    .is_some_and(|candidate| candidate.value() == property.value())
            })
    }
}

impl Eq for ConfigurationSet {}

impl FromIterator<ConfigurationProperty> for ConfigurationSet {
    fn from_iter<I: IntoIterator<Item = ConfigurationProperty>>(iter: I) -> Self {
        let mut set = Self::new();
        for property in iter {
            set.add(property);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ConfigurationSet {
    type Item = &'a ConfigurationProperty;
    type IntoIter = std::slice::Iter<'a, ConfigurationProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for ConfigurationSet {
    type Item = ConfigurationProperty;
    type IntoIter = std::vec::IntoIter<ConfigurationProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.into_iter()
    }
}
