//! Crate-level integration and BDD tests.

use std::cell::RefCell;

use serde_json::Value;
use tracing::Level;

use crate::client::{MaterialRequest, MaterialTransport, PackageMaterialClient, RequestName};
use crate::error::{ErrorKind, ExchangeError, TransportError};
use crate::fixtures;

mod behaviour;

/// Transport double answering every request with one canned outcome and
/// remembering what it was sent.
struct CannedTransport {
    outcome: Result<String, TransportError>,
    received: RefCell<Vec<MaterialRequest>>,
}

impl CannedTransport {
    fn answering(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_owned()),
            received: RefCell::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            outcome: Err(TransportError::new("connection refused")),
            received: RefCell::new(Vec::new()),
        }
    }

    fn last_request(&self) -> Option<MaterialRequest> {
        self.received.borrow().last().cloned()
    }
}

impl MaterialTransport for CannedTransport {
    fn submit(&self, request: &MaterialRequest) -> Result<String, TransportError> {
        self.received.borrow_mut().push(request.clone());
        self.outcome.clone()
    }
}

/// Runs `body` with a debug-level subscriber writing to the test output.
fn with_test_logging<R>(body: impl FnOnce() -> R) -> R {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, body)
}

#[test]
fn end_to_end_latest_revision_since_with_fixtures() {
    let transport = CannedTransport::answering(
        r#"{"revision":"go-agent-13.2.0.rpm","timestamp":"2014-02-01T08:30:00.000Z","data":{"VERSION":"13.2.0"}}"#,
    );
    let client = PackageMaterialClient::new(transport);
    let previous = fixtures::package_revision();

    let newer = with_test_logging(|| {
        client.latest_revision_since(
            &fixtures::package_configuration(),
            &fixtures::repository_configuration(),
            &previous,
        )
    })
    .expect("exchange")
    .expect("newer revision");
    assert_eq!(newer.revision(), "go-agent-13.2.0.rpm");
    assert!(newer.timestamp() > previous.timestamp());

    let request = client.transport().last_request().expect("request sent");
    assert_eq!(request.name(), RequestName::LatestRevisionSince);
    let body: Value = serde_json::from_str(request.body().expect("body")).expect("json body");
    assert_eq!(
        body.pointer("/repository-configuration/k2/value"),
        Some(&Value::from("repo-v2"))
    );
    assert_eq!(
        body.pointer("/package-configuration/k3/value"),
        Some(&Value::from("package-v1"))
    );
    assert_eq!(
        body.pointer("/previous-revision/timestamp"),
        Some(&Value::from("2013-12-18T10:15:30.123Z"))
    );
    assert_eq!(
        body.pointer("/previous-revision/data/VERSION"),
        Some(&Value::from("13.1.1"))
    );
}

#[test]
fn rejected_responses_are_logged_and_reported() {
    let client = PackageMaterialClient::new(CannedTransport::answering(r#"{"status": 1}"#));
    let error = with_test_logging(|| {
        client.check_package_connection(
            &fixtures::package_configuration(),
            &fixtures::repository_configuration(),
        )
    })
    .expect_err("should fail");
    let ExchangeError::Decode { source, .. } = &error else {
        panic!("expected decode error, got {error}");
    };
    assert_eq!(source.kind(), ErrorKind::FieldTypeMismatch);
    assert_eq!(source.field(), Some("status"));
}

#[test]
fn unreachable_plugin_is_reported() {
    let client = PackageMaterialClient::new(CannedTransport::unreachable());
    let error = with_test_logging(|| client.package_configuration()).expect_err("should fail");
    assert_eq!(error.request(), RequestName::PackageConfiguration);
    assert!(error.to_string().contains("connection refused"), "{error}");
}
