//! Fixed wire labels and the timestamp format shared by both directions.

use time::error::{Parse, ParseFromDescription};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Envelope key holding the repository configuration.
pub const REPOSITORY_CONFIGURATION: &str = "repository-configuration";

/// Envelope key holding the package configuration.
pub const PACKAGE_CONFIGURATION: &str = "package-configuration";

/// Envelope key holding the previously seen revision.
pub const PREVIOUS_REVISION: &str = "previous-revision";

/// Human-readable form of the timestamp layout, used in diagnostics.
pub const TIMESTAMP_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ss.SSS'Z'";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Parses a wire timestamp as a UTC instant.
///
/// # Errors
///
/// Returns the underlying parse error when `text` does not follow
/// [`TIMESTAMP_PATTERN`] exactly. A signed year is rejected.
///
/// # Example
///
/// ```
/// use material_protocol::wire::parse_timestamp;
///
/// let instant = parse_timestamp("2014-01-01T10:00:00.000Z").expect("valid timestamp");
/// assert_eq!(instant.unix_timestamp(), 1_388_570_400);
/// assert!(parse_timestamp("2014-01-01 10:00:00").is_err());
/// assert!(parse_timestamp("+2014-01-01T10:00:00.000Z").is_err());
/// ```
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, Parse> {
    // `[year]` also accepts a leading sign.
    if !text.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        return Err(Parse::ParseFromDescription(
            ParseFromDescription::InvalidComponent("year"),
        ));
    }
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT).map(PrimitiveDateTime::assume_utc)
}

/// Formats an instant in UTC with millisecond precision.
///
/// Sub-millisecond digits are truncated. Instants whose UTC date falls
/// outside the supported calendar range are clamped to its nearest bound.
///
/// # Example
///
/// ```
/// use material_protocol::wire::{format_timestamp, parse_timestamp};
///
/// let instant = parse_timestamp("2014-01-01T10:00:00.250Z").expect("valid timestamp");
/// assert_eq!(format_timestamp(instant), "2014-01-01T10:00:00.250Z");
/// ```
#[must_use]
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    let utc = to_utc(instant);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        utc.millisecond()
    )
}

/// Normalises an instant to UTC with millisecond precision.
///
/// Out-of-range instants are clamped as in [`format_timestamp`].
#[must_use]
pub fn truncate_to_millis(instant: OffsetDateTime) -> OffsetDateTime {
    let utc = to_utc(instant);
    utc.replace_millisecond(utc.millisecond()).unwrap_or(utc)
}

fn to_utc(instant: OffsetDateTime) -> OffsetDateTime {
    instant
        .checked_to_offset(UtcOffset::UTC)
        .unwrap_or_else(|| {
            let bound = if instant.year() < 0 {
                PrimitiveDateTime::MIN
            } else {
                PrimitiveDateTime::MAX
            };
            bound.assume_utc()
        })
}
