//! Response decoding for package material plugins.
//!
//! Each entry point parses one raw response body into its typed result in a
//! single pass. Fields are declared in per-result tables below; every
//! rejection is reported as a [`DecodeError`] naming the offending field and
//! the expected type, and no partially decoded result is ever returned.

use serde_json::{Map, Value};
use tracing::debug;

use crate::configuration::{ConfigurationProperty, ConfigurationSet};
use crate::error::{DecodeError, ErrorKind};
use crate::fields::{
    FieldSpec, Fields, Flag, IntegerText, NonEmptyText, Object, Optional, Required, Text,
    TextList, Timestamp,
};
use crate::results::{CheckConnectionResult, ValidationError, ValidationResult};
use crate::revision::PackageRevision;

/// Tracing target for response decoding.
const DECODE_TARGET: &str = "material_protocol::decode";

/// Fields of one entry in a configuration response.
mod property_fields {
    use super::{FieldSpec, Flag, IntegerText, NonEmptyText, Optional};

    pub(super) const DEFAULT_VALUE: FieldSpec<NonEmptyText, Optional> =
        FieldSpec::new("default-value");
    pub(super) const PART_OF_IDENTITY: FieldSpec<Flag, Optional> =
        FieldSpec::new("part-of-identity");
    pub(super) const SECURE: FieldSpec<Flag, Optional> = FieldSpec::new("secure");
    pub(super) const REQUIRED: FieldSpec<Flag, Optional> = FieldSpec::new("required");
    pub(super) const DISPLAY_NAME: FieldSpec<NonEmptyText, Optional> =
        FieldSpec::new("display-name");
    pub(super) const DISPLAY_ORDER: FieldSpec<IntegerText, Optional> =
        FieldSpec::new("display-order");
}

/// Fields of one entry in a validation response.
mod validation_fields {
    use super::{FieldSpec, NonEmptyText, Optional, Required, Text};

    pub(super) const KEY: FieldSpec<NonEmptyText, Optional> = FieldSpec::new("key");
    pub(super) const MESSAGE: FieldSpec<Text, Required> = FieldSpec::new("message");
}

/// Fields of a connection-check response.
mod connection_fields {
    use super::{FieldSpec, NonEmptyText, Optional, Required, TextList};

    pub(super) const STATUS: FieldSpec<NonEmptyText, Required> = FieldSpec::new("status");
    pub(super) const MESSAGES: FieldSpec<TextList, Optional> = FieldSpec::new("messages");
}

/// Fields of a package revision response.
mod revision_fields {
    use super::{FieldSpec, Object, Optional, Required, Text, Timestamp};

    pub(super) const REVISION: FieldSpec<Text, Required> = FieldSpec::new("revision");
    pub(super) const TIMESTAMP: FieldSpec<Timestamp, Required> = FieldSpec::new("timestamp");
    pub(super) const USER: FieldSpec<Text, Optional> = FieldSpec::new("user");
    pub(super) const REVISION_COMMENT: FieldSpec<Text, Optional> =
        FieldSpec::new("revisionComment");
    pub(super) const TRACKBACK_URL: FieldSpec<Text, Optional> = FieldSpec::new("trackbackUrl");
    pub(super) const DATA: FieldSpec<Object, Optional> = FieldSpec::new("data");
}

/// Status value marking a successful connection check.
const SUCCESS_STATUS: &str = "success";

/// Decodes a configuration response.
///
/// `subject` names the configuration in diagnostics, for example
/// `repository configuration`.
pub(crate) fn configuration(body: &str, subject: &str) -> Result<ConfigurationSet, DecodeError> {
    decode_configuration(body, subject).inspect_err(|error| log_rejection(subject, error))
}

/// Decodes a validation response; an empty body means valid.
pub(crate) fn validation_result(body: &str) -> Result<ValidationResult, DecodeError> {
    decode_validation_result(body).inspect_err(|error| log_rejection("validation result", error))
}

/// Decodes a connection-check response.
pub(crate) fn check_connection_result(body: &str) -> Result<CheckConnectionResult, DecodeError> {
    decode_check_connection_result(body)
        .inspect_err(|error| log_rejection("check connection result", error))
}

/// Decodes a package revision response.
pub(crate) fn package_revision(body: &str) -> Result<PackageRevision, DecodeError> {
    non_empty_object(body, "package revision")
        .and_then(|map| revision_from_map(&map))
        .inspect_err(|error| log_rejection("package revision", error))
}

/// Decodes a "latest revision since" response.
///
/// An empty body, `null`, or `{}` means the plugin found nothing newer and
/// decodes to `None`.
pub(crate) fn package_revision_since(body: &str) -> Result<Option<PackageRevision>, DecodeError> {
    decode_package_revision_since(body)
        .inspect_err(|error| log_rejection("package revision", error))
}

fn decode_configuration(body: &str, subject: &str) -> Result<ConfigurationSet, DecodeError> {
    let entries = non_empty_object(body, subject)?;
    let mut configuration = ConfigurationSet::new();
    for (key, entry) in &entries {
        if key.is_empty() {
            return Err(DecodeError::new(
                ErrorKind::EmptyPropertyKey,
                format!("{subject} key cannot be empty"),
            ));
        }
        let Value::Object(attributes) = entry else {
            return Err(DecodeError::new(
                ErrorKind::PropertyNotAMap,
                format!("{subject} properties for key '{key}' should be represented as a map"),
            )
            .with_field(key.as_str()));
        };
        configuration.add(property_from_map(key, attributes)?);
    }
    Ok(configuration)
}

fn property_from_map(
    key: &str,
    attributes: &Map<String, Value>,
) -> Result<ConfigurationProperty, DecodeError> {
    let fields = Fields::new(attributes, format!("property for key '{key}'"));
    let default_value = fields.read(&property_fields::DEFAULT_VALUE)?;
    let part_of_identity = fields.read(&property_fields::PART_OF_IDENTITY)?;
    let secure = fields.read(&property_fields::SECURE)?;
    let required = fields.read(&property_fields::REQUIRED)?;
    let display_name = fields.read(&property_fields::DISPLAY_NAME)?;
    let display_order = fields.read(&property_fields::DISPLAY_ORDER)?;

    let mut property = ConfigurationProperty::new(key);
    if let Some(default) = default_value {
        property = property.with_default(default);
    }
    if let Some(flag) = part_of_identity {
        property = property.with_part_of_identity(flag);
    }
    if let Some(flag) = secure {
        property = property.with_secure(flag);
    }
    if let Some(flag) = required {
        property = property.with_required(flag);
    }
    if let Some(name) = display_name {
        property = property.with_display_name(name);
    }
    if let Some(order) = display_order {
        property = property.with_display_order(order);
    }
    Ok(property)
}

fn decode_validation_result(body: &str) -> Result<ValidationResult, DecodeError> {
    let Some(payload) = parse(body)? else {
        return Ok(ValidationResult::new());
    };
    let Value::Array(items) = &payload else {
        return Err(DecodeError::new(
            ErrorKind::UnexpectedShape,
            format!(
                "validation errors should be returned as a list, with each error represented \
                 as a map, found {}",
                shape_name(&payload)
            ),
        ));
    };
    items
        .iter()
        .map(|item| {
            let Value::Object(entry) = item else {
                return Err(DecodeError::new(
                    ErrorKind::ValidationErrorNotAMap,
                    format!(
                        "each validation error should be represented as a map, found {}",
                        shape_name(item)
                    ),
                ));
            };
            let fields = Fields::new(entry, "validation error");
            let key = fields.read(&validation_fields::KEY)?;
            let message = fields.read(&validation_fields::MESSAGE)?;
            Ok(ValidationError::new(key, message))
        })
        .collect()
}

fn decode_check_connection_result(body: &str) -> Result<CheckConnectionResult, DecodeError> {
    let map = non_empty_object(body, "check connection result")?;
    let fields = Fields::new(&map, "check connection result");
    let status = fields.read(&connection_fields::STATUS)?;
    let messages = fields
        .read(&connection_fields::MESSAGES)?
        .unwrap_or_default();
    if status.eq_ignore_ascii_case(SUCCESS_STATUS) {
        Ok(CheckConnectionResult::success(messages))
    } else {
        Ok(CheckConnectionResult::failure(messages))
    }
}

fn decode_package_revision_since(body: &str) -> Result<Option<PackageRevision>, DecodeError> {
    match parse(body)? {
        Some(Value::Object(map)) if !map.is_empty() => revision_from_map(&map).map(Some),
        None | Some(Value::Object(_)) => {
            debug!(target: DECODE_TARGET, "plugin reported no new revision");
            Ok(None)
        }
        Some(other) => Err(unexpected_shape("package revision", &other)),
    }
}

fn revision_from_map(map: &Map<String, Value>) -> Result<PackageRevision, DecodeError> {
    let fields = Fields::new(map, "package revision");
    let revision = fields.read(&revision_fields::REVISION)?;
    let timestamp = fields.read(&revision_fields::TIMESTAMP)?;
    let user = fields.read(&revision_fields::USER)?;
    let revision_comment = fields.read(&revision_fields::REVISION_COMMENT)?;
    let trackback_url = fields.read(&revision_fields::TRACKBACK_URL)?;
    let data = fields.read(&revision_fields::DATA)?.unwrap_or_default();

    let mut package_revision = PackageRevision::new(revision, timestamp).with_data(data);
    if let Some(name) = user {
        package_revision = package_revision.with_user(name);
    }
    if let Some(comment) = revision_comment {
        package_revision = package_revision.with_revision_comment(comment);
    }
    if let Some(url) = trackback_url {
        package_revision = package_revision.with_trackback_url(url);
    }
    Ok(package_revision)
}

/// Parses the body; a blank body or JSON `null` yields `None`.
fn parse(body: &str) -> Result<Option<Value>, DecodeError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(source) => Err(DecodeError::malformed(source)),
    }
}

/// Parses a body that must be a non-empty JSON object.
fn non_empty_object(body: &str, subject: &str) -> Result<Map<String, Value>, DecodeError> {
    match parse(body)? {
        Some(Value::Object(map)) if !map.is_empty() => Ok(map),
        None | Some(Value::Object(_)) => Err(DecodeError::new(
            ErrorKind::EmptyPayload,
            format!("empty response body, expected {subject} as a non-empty map"),
        )),
        Some(other) => Err(unexpected_shape(subject, &other)),
    }
}

fn unexpected_shape(subject: &str, found: &Value) -> DecodeError {
    DecodeError::new(
        ErrorKind::UnexpectedShape,
        format!(
            "{subject} should be returned as a map, found {}",
            shape_name(found)
        ),
    )
}

const fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

fn log_rejection(subject: &str, error: &DecodeError) {
    debug!(
        target: DECODE_TARGET,
        subject,
        kind = %error.kind(),
        field = error.field().unwrap_or_default(),
        "rejected plugin response"
    );
}
