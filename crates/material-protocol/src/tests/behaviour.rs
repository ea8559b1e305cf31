//! Behaviour-driven tests for plugin exchanges.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::client::PackageMaterialClient;
use crate::configuration::ConfigurationSet;
use crate::error::ExchangeError;
use crate::fixtures;
use crate::results::{CheckConnectionResult, ValidationResult};
use crate::revision::PackageRevision;

use super::CannedTransport;

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    client: Option<PackageMaterialClient<CannedTransport>>,
    outcome: Option<Result<Outcome, ExchangeError>>,
}

enum Outcome {
    Configuration(ConfigurationSet),
    Validation(ValidationResult),
    Connection(CheckConnectionResult),
    Revision(PackageRevision),
    RevisionSince(Option<PackageRevision>),
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn canned_response(name: &str) -> &'static str {
    match name {
        "repository configuration" => {
            r#"{"url":{"display-name":"Repository URL","display-order":"0","part-of-identity":true},"username":{"required":false,"secure":false}}"#
        }
        "invalid configuration" => r#"{"url":"http://repo"}"#,
        "validation errors" => {
            r#"[{"key":"url","message":"invalid url"},{"message":"repository unreachable"}]"#
        }
        "successful connection" => r#"{"status":"success","messages":["found repository"]}"#,
        "failed connection" => r#"{"status":"failure","messages":["no such package"]}"#,
        "latest revision" => {
            r#"{"revision":"go-agent-13.2.0.rpm","timestamp":"2014-02-01T08:30:00.000Z","user":"go-builder"}"#
        }
        "malformed timestamp" => r#"{"revision":"r1","timestamp":"2014-02-01 08:30:00"}"#,
        "empty" => "",
        other => panic!("unknown canned response: '{other}'"),
    }
}

fn client(world: &TestWorld) -> &PackageMaterialClient<CannedTransport> {
    world.client.as_ref().expect("no plugin configured")
}

fn successful_outcome(world: &TestWorld) -> &Outcome {
    world
        .outcome
        .as_ref()
        .expect("no exchange performed")
        .as_ref()
        .expect("expected success but got error")
}

fn record<T>(world: &mut TestWorld, result: Result<T, ExchangeError>, wrap: fn(T) -> Outcome) {
    world.outcome = Some(result.map(wrap));
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a plugin answering with the {response} response")]
fn given_plugin(world: &mut TestWorld, response: String) {
    let body = canned_response(response.trim_matches('"'));
    world.client = Some(PackageMaterialClient::new(CannedTransport::answering(body)));
}

#[given("an unreachable plugin")]
fn given_unreachable_plugin(world: &mut TestWorld) {
    world.client = Some(PackageMaterialClient::new(CannedTransport::unreachable()));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the repository configuration is requested")]
fn when_repository_configuration(world: &mut TestWorld) {
    let result = client(world).repository_configuration();
    record(world, result, Outcome::Configuration);
}

#[when("the repository configuration is validated")]
fn when_validate_repository(world: &mut TestWorld) {
    let result =
        client(world).validate_repository_configuration(&fixtures::repository_configuration());
    record(world, result, Outcome::Validation);
}

#[when("the repository connection is checked")]
fn when_check_repository(world: &mut TestWorld) {
    let result = client(world).check_repository_connection(&fixtures::repository_configuration());
    record(world, result, Outcome::Connection);
}

#[when("the package connection is checked")]
fn when_check_package(world: &mut TestWorld) {
    let result = client(world).check_package_connection(
        &fixtures::package_configuration(),
        &fixtures::repository_configuration(),
    );
    record(world, result, Outcome::Connection);
}

#[when("the latest revision is requested")]
fn when_latest_revision(world: &mut TestWorld) {
    let result = client(world).latest_revision(
        &fixtures::package_configuration(),
        &fixtures::repository_configuration(),
    );
    record(world, result, Outcome::Revision);
}

#[when("a revision newer than the previous one is requested")]
fn when_latest_revision_since(world: &mut TestWorld) {
    let result = client(world).latest_revision_since(
        &fixtures::package_configuration(),
        &fixtures::repository_configuration(),
        &fixtures::package_revision(),
    );
    record(world, result, Outcome::RevisionSince);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the configuration has {count} properties")]
fn then_configuration_size(world: &mut TestWorld, count: usize) {
    let Outcome::Configuration(configuration) = successful_outcome(world) else {
        panic!("expected a configuration");
    };
    assert_eq!(configuration.len(), count);
}

#[then("property {key} is part of the identity")]
fn then_part_of_identity(world: &mut TestWorld, key: String) {
    let Outcome::Configuration(configuration) = successful_outcome(world) else {
        panic!("expected a configuration");
    };
    let property_key = key.trim_matches('"');
    let property = configuration.get(property_key).expect("property present");
    assert_eq!(property.part_of_identity(), Some(true));
}

#[then("{count} validation error(s) are reported")]
fn then_validation_errors(world: &mut TestWorld, count: usize) {
    let Outcome::Validation(result) = successful_outcome(world) else {
        panic!("expected a validation result");
    };
    assert_eq!(result.errors().len(), count);
}

#[then("the validation error for {key} says {message}")]
fn then_validation_message(world: &mut TestWorld, key: String, message: String) {
    let Outcome::Validation(result) = successful_outcome(world) else {
        panic!("expected a validation result");
    };
    let field = key.trim_matches('"');
    let expected = message.trim_matches('"');
    assert!(
        result
            .errors()
            .iter()
            .any(|error| error.key() == Some(field) && error.message() == expected),
        "no error for '{field}' with message '{expected}' in {:?}",
        result.errors()
    );
}

#[then("the connection check succeeds")]
fn then_connection_succeeds(world: &mut TestWorld) {
    let Outcome::Connection(result) = successful_outcome(world) else {
        panic!("expected a connection result");
    };
    assert!(result.is_successful());
}

#[then("the connection check fails with message {message}")]
fn then_connection_fails(world: &mut TestWorld, message: String) {
    let Outcome::Connection(result) = successful_outcome(world) else {
        panic!("expected a connection result");
    };
    assert!(!result.is_successful());
    assert_eq!(result.messages(), [message.trim_matches('"')]);
}

#[then("the revision is {revision}")]
fn then_revision(world: &mut TestWorld, revision: String) {
    let Outcome::Revision(found) = successful_outcome(world) else {
        panic!("expected a revision");
    };
    assert_eq!(found.revision(), revision.trim_matches('"'));
}

#[then("no newer revision is reported")]
fn then_no_newer_revision(world: &mut TestWorld) {
    let Outcome::RevisionSince(found) = successful_outcome(world) else {
        panic!("expected a revision lookup");
    };
    assert!(found.is_none(), "unexpected revision: {found:?}");
}

#[then("the exchange fails with {error_kind}")]
fn then_exchange_fails(world: &mut TestWorld, error_kind: String) {
    let err = world
        .outcome
        .as_ref()
        .expect("no exchange performed")
        .as_ref()
        .err()
        .expect("expected error but got success");
    match (error_kind.trim_matches('"'), err) {
        ("transport", ExchangeError::Transport { .. }) => {}
        (kind, ExchangeError::Decode { source, .. }) => {
            assert_eq!(source.kind().as_str(), kind, "unexpected decode error: {err}");
        }
        (kind, other) => panic!("expected '{kind}' failure, got: {other}"),
    }
}

#[then("the plugin was sent {name} with a body")]
fn then_request_sent(world: &mut TestWorld, name: String) {
    let request = client(world)
        .transport()
        .last_request()
        .expect("no request sent");
    assert_eq!(request.name().as_str(), name.trim_matches('"'));
    assert!(request.body().is_some(), "request should carry a body");
}

#[then("the plugin was sent {name} without a body")]
fn then_request_sent_without_body(world: &mut TestWorld, name: String) {
    let request = client(world)
        .transport()
        .last_request()
        .expect("no request sent");
    assert_eq!(request.name().as_str(), name.trim_matches('"'));
    assert!(request.body().is_none(), "request should not carry a body");
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Decoding the repository configuration"
)]
fn repository_configuration_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Rejecting a configuration entry that is not a map"
)]
fn invalid_configuration_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Reporting validation errors"
)]
fn validation_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Checking a reachable repository"
)]
fn repository_connection_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Checking a missing package"
)]
fn package_connection_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Fetching the latest revision"
)]
fn latest_revision_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Rejecting a revision with a malformed timestamp"
)]
fn malformed_timestamp_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "No revision newer than the previous one"
)]
fn no_newer_revision_behaviour(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_exchange.feature",
    name = "Reporting an unreachable plugin"
)]
fn unreachable_plugin_behaviour(world: TestWorld) {
    let _ = world;
}
