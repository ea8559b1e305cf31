//! Typed field descriptors and the reader that applies them.
//!
//! Each response field is declared once as a [`FieldSpec`] naming its wire
//! key, the [`FieldKind`] it must hold, and whether it is [`Required`] or
//! [`Optional`]. The presence marker decides the Rust type a read yields:
//! a required field reads as `T` and an optional one as `Option<T>`. JSON
//! `null` counts as absent.

use std::marker::PhantomData;

use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::error::{DecodeError, ErrorKind};
use crate::wire::parse_timestamp;

/// Conversion from a present JSON value to a typed field.
pub(crate) trait FieldKind {
    /// Rust type produced by the conversion.
    type Output;

    /// Name of the expected type, used in diagnostics.
    const EXPECTED: &'static str;

    /// Converts a non-null value.
    ///
    /// `Ok(None)` means the value is present but carries nothing, and is
    /// treated as absent.
    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind>;
}

/// Any string, including the empty string.
pub(crate) enum Text {}

/// A string where the empty string counts as absent.
pub(crate) enum NonEmptyText {}

/// A JSON boolean.
pub(crate) enum Flag {}

/// A 32-bit signed integer carried as a string.
pub(crate) enum IntegerText {}

/// A timestamp string in the fixed wire format.
pub(crate) enum Timestamp {}

/// A JSON object, kept opaque.
pub(crate) enum Object {}

/// A JSON array whose elements are all strings.
pub(crate) enum TextList {}

impl FieldKind for Text {
    type Output = String;
    const EXPECTED: &'static str = "string";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        value
            .as_str()
            .map(|text| Some(text.to_owned()))
            .ok_or(ErrorKind::FieldTypeMismatch)
    }
}

impl FieldKind for NonEmptyText {
    type Output = String;
    const EXPECTED: &'static str = "string";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        value
            .as_str()
            .map(|text| (!text.is_empty()).then(|| text.to_owned()))
            .ok_or(ErrorKind::FieldTypeMismatch)
    }
}

impl FieldKind for Flag {
    type Output = bool;
    const EXPECTED: &'static str = "boolean";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        value.as_bool().map(Some).ok_or(ErrorKind::FieldTypeMismatch)
    }
}

impl FieldKind for IntegerText {
    type Output = i32;
    const EXPECTED: &'static str = "integer encoded as a string";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        value
            .as_str()
            .and_then(|text| text.parse::<i32>().ok())
            .map(Some)
            .ok_or(ErrorKind::FieldTypeMismatch)
    }
}

impl FieldKind for Timestamp {
    type Output = OffsetDateTime;
    const EXPECTED: &'static str = "string with format yyyy-MM-dd'T'HH:mm:ss.SSS'Z'";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        let text = value.as_str().ok_or(ErrorKind::FieldTypeMismatch)?;
        parse_timestamp(text)
            .map(Some)
            .map_err(|_| ErrorKind::InvalidTimestampFormat)
    }
}

impl FieldKind for Object {
    type Output = Map<String, Value>;
    const EXPECTED: &'static str = "map";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        value
            .as_object()
            .map(|object| Some(object.clone()))
            .ok_or(ErrorKind::FieldTypeMismatch)
    }
}

impl FieldKind for TextList {
    type Output = Vec<String>;
    const EXPECTED: &'static str = "list of strings";

    fn convert(value: &Value) -> Result<Option<Self::Output>, ErrorKind> {
        let items = value.as_array().ok_or(ErrorKind::FieldTypeMismatch)?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or(ErrorKind::MessageTypeMismatch)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Policy applied when a field is absent.
pub(crate) trait Presence {
    /// Shape of a successfully read field.
    type Slot<T>;

    /// Resolves an absent or present value against the policy.
    ///
    /// `expected` names the field's type for diagnostics.
    fn settle<T>(
        value: Option<T>,
        field: &str,
        expected: &str,
        subject: &str,
    ) -> Result<Self::Slot<T>, DecodeError>;
}

/// Absence fails with [`ErrorKind::MissingRequiredField`].
pub(crate) enum Required {}

/// Absence yields `None`.
pub(crate) enum Optional {}

impl Presence for Required {
    type Slot<T> = T;

    fn settle<T>(
        value: Option<T>,
        field: &str,
        expected: &str,
        subject: &str,
    ) -> Result<Self::Slot<T>, DecodeError> {
        value.ok_or_else(|| {
            DecodeError::new(
                ErrorKind::MissingRequiredField,
                format!("'{field}' of type {expected} is a required field of {subject}"),
            )
            .with_field(field)
        })
    }
}

impl Presence for Optional {
    type Slot<T> = Option<T>;

    fn settle<T>(
        value: Option<T>,
        _field: &str,
        _expected: &str,
        _subject: &str,
    ) -> Result<Self::Slot<T>, DecodeError> {
        Ok(value)
    }
}

/// Declaration of one response field.
pub(crate) struct FieldSpec<K, P> {
    name: &'static str,
    policy: PhantomData<fn() -> (K, P)>,
}

impl<K, P> FieldSpec<K, P> {
    /// Declares a field with the given wire key.
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            policy: PhantomData,
        }
    }

    /// Returns the wire key.
    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }
}

/// Reads declared fields from one JSON object.
///
/// The subject describes the object in diagnostics, for example
/// `property for key 'url'` or `package revision`.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    subject: String,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>, subject: impl Into<String>) -> Self {
        Self {
            map,
            subject: subject.into(),
        }
    }

    /// Reads and validates one field.
    pub(crate) fn read<K: FieldKind, P: Presence>(
        &self,
        spec: &FieldSpec<K, P>,
    ) -> Result<P::Slot<K::Output>, DecodeError> {
        let value = match self.map.get(spec.name()) {
            None | Some(Value::Null) => None,
            Some(value) => {
                K::convert(value).map_err(|kind| self.rejection::<K>(kind, spec.name()))?
            }
        };
        P::settle(value, spec.name(), K::EXPECTED, &self.subject)
    }

    fn rejection<K: FieldKind>(&self, kind: ErrorKind, field: &str) -> DecodeError {
        let subject = &self.subject;
        let message = match kind {
            ErrorKind::MessageTypeMismatch => {
                format!("every entry of '{field}' in {subject} should be of type string")
            }
            _ => format!("'{field}' in {subject} should be of type {}", K::EXPECTED),
        };
        DecodeError::new(kind, message).with_field(field)
    }
}

#[cfg(test)]
mod tests;
