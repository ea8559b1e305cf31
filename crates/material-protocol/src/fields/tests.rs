//! Unit tests for field descriptors and the typed reader.

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::wire::TIMESTAMP_PATTERN;

const NAME: FieldSpec<Text, Required> = FieldSpec::new("name");
const LABEL: FieldSpec<NonEmptyText, Optional> = FieldSpec::new("label");
const ENABLED: FieldSpec<Flag, Optional> = FieldSpec::new("enabled");
const ORDER: FieldSpec<IntegerText, Optional> = FieldSpec::new("order");
const WHEN: FieldSpec<Timestamp, Required> = FieldSpec::new("when");
const TAGS: FieldSpec<TextList, Optional> = FieldSpec::new("tags");
const EXTRA: FieldSpec<Object, Optional> = FieldSpec::new("extra");

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn reads_required_text() {
    let map = object(json!({"name": "rpm"}));
    let fields = Fields::new(&map, "sample");
    assert_eq!(fields.read(&NAME).expect("read"), "rpm");
}

#[test]
fn required_field_absent_is_missing() {
    let map = object(json!({"other": 1}));
    let error = Fields::new(&map, "sample")
        .read(&NAME)
        .expect_err("should fail");
    assert_eq!(error.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(error.field(), Some("name"));
    assert!(error.message().contains("sample"), "{}", error.message());
    assert!(
        error.message().contains("of type string"),
        "expected type in message: {}",
        error.message()
    );
}

#[test]
fn required_timestamp_absent_names_format() {
    let map = object(json!({"name": "x"}));
    let error = Fields::new(&map, "sample")
        .read(&WHEN)
        .expect_err("should fail");
    assert_eq!(error.kind(), ErrorKind::MissingRequiredField);
    assert!(
        error.message().contains(TIMESTAMP_PATTERN),
        "expected pattern in message: {}",
        error.message()
    );
}

#[test]
fn null_counts_as_absent() {
    let map = object(json!({"name": "x", "enabled": null}));
    let fields = Fields::new(&map, "sample");
    assert_eq!(fields.read(&ENABLED).expect("read"), None);
}

#[test]
fn empty_text_is_absent_for_non_empty_kind() {
    let map = object(json!({"label": ""}));
    let fields = Fields::new(&map, "sample");
    assert_eq!(fields.read(&LABEL).expect("read"), None);
}

#[rstest]
#[case::text_as_number(json!({"name": 1}), "name")]
#[case::flag_as_string(json!({"name": "x", "enabled": "true"}), "enabled")]
#[case::order_as_number(json!({"name": "x", "order": 3}), "order")]
#[case::order_not_numeric(json!({"name": "x", "order": "abc"}), "order")]
#[case::order_overflow(json!({"name": "x", "order": "99999999999"}), "order")]
#[case::order_padded(json!({"name": "x", "order": " 3 "}), "order")]
#[case::tags_not_list(json!({"name": "x", "tags": "a"}), "tags")]
#[case::extra_not_object(json!({"name": "x", "extra": [1]}), "extra")]
fn wrong_type_names_field(#[case] value: Value, #[case] field: &str) {
    let map = object(value);
    let fields = Fields::new(&map, "sample");
    let error = match field {
        "name" => fields.read(&NAME).map(drop),
        "enabled" => fields.read(&ENABLED).map(drop),
        "order" => fields.read(&ORDER).map(drop),
        "tags" => fields.read(&TAGS).map(drop),
        _ => fields.read(&EXTRA).map(drop),
    }
    .expect_err("should fail");
    assert_eq!(error.kind(), ErrorKind::FieldTypeMismatch);
    assert_eq!(error.field(), Some(field));
    assert!(
        error.message().contains(field),
        "expected field in message: {}",
        error.message()
    );
}

#[test]
fn integer_text_is_parsed() {
    let map = object(json!({"order": "-7"}));
    let fields = Fields::new(&map, "sample");
    assert_eq!(fields.read(&ORDER).expect("read"), Some(-7));
}

#[test]
fn list_with_non_string_entry_is_message_mismatch() {
    let map = object(json!({"tags": ["a", 2]}));
    let error = Fields::new(&map, "sample")
        .read(&TAGS)
        .expect_err("should fail");
    assert_eq!(error.kind(), ErrorKind::MessageTypeMismatch);
    assert_eq!(error.field(), Some("tags"));
}

#[test]
fn timestamp_in_other_format_is_rejected() {
    let map = object(json!({"when": "01/01/2014"}));
    let error = Fields::new(&map, "sample")
        .read(&WHEN)
        .expect_err("should fail");
    assert_eq!(error.kind(), ErrorKind::InvalidTimestampFormat);
    assert!(
        error.message().contains(TIMESTAMP_PATTERN),
        "expected pattern in message: {}",
        error.message()
    );
}

#[test]
fn timestamp_as_number_is_type_mismatch() {
    let map = object(json!({"when": 1_388_570_400_000_i64}));
    let error = Fields::new(&map, "sample")
        .read(&WHEN)
        .expect_err("should fail");
    assert_eq!(error.kind(), ErrorKind::FieldTypeMismatch);
}

#[test]
fn object_field_is_copied() {
    let map = object(json!({"extra": {"a": 1}}));
    let extra = Fields::new(&map, "sample")
        .read(&EXTRA)
        .expect("read")
        .expect("present");
    assert_eq!(extra.get("a"), Some(&json!(1)));
}
