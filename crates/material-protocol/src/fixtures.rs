//! Canned domain objects for tests.
//!
//! Enabled for this crate's own tests and, through the `test-support`
//! feature, for downstream crates exercising plugin integrations.

use time::macros::datetime;

use crate::configuration::{
    ConfigurationProperty, ConfigurationSet, PackageConfiguration, RepositoryConfiguration,
};
use crate::revision::PackageRevision;

/// Repository configuration with `k1=repo-v1` and `k2=repo-v2`.
#[must_use]
pub fn repository_configuration() -> RepositoryConfiguration {
    ConfigurationSet::new()
        .with(ConfigurationProperty::new("k1").with_value("repo-v1"))
        .with(ConfigurationProperty::new("k2").with_value("repo-v2"))
}

/// Package configuration with `k3=package-v1`.
#[must_use]
pub fn package_configuration() -> PackageConfiguration {
    ConfigurationSet::new().with(ConfigurationProperty::new("k3").with_value("package-v1"))
}

/// A revision of `go-agent-13.1.1-16714.noarch.rpm` carrying one data entry.
#[must_use]
pub fn package_revision() -> PackageRevision {
    PackageRevision::new(
        "go-agent-13.1.1-16714.noarch.rpm",
        datetime!(2013-12-18 10:15:30.123 UTC),
    )
    .with_user("go-builder")
    .with_revision_comment("release 13.1.1")
    .with_trackback_url("http://repo.example.com/go-agent")
    .with_data_entry("VERSION", "13.1.1")
}
