//! Fixtures pairing a scripted Zabbix server with a handler pointed at it.
//! Handlers report into a [`CollectingReporter`] so tests can assert on
//! delivery failures without scraping stderr.

use std::time::Duration;

use _zabbix_handler_rs::{
    DestinationConfig, ZabbixHandler,
    test_utils::{CollectingReporter, MockServer},
};
use rstest::fixture;

/// Start a mock server that accepts every request.
#[fixture]
pub fn mock_server() -> MockServer {
    MockServer::start()
}

/// Return a handler logged in to `mock_server` as `admin`/`admin`, writing
/// to the `test.key` item.
#[fixture]
pub fn handler_pair(mock_server: MockServer) -> (MockServer, CollectingReporter, ZabbixHandler) {
    let reporter = CollectingReporter::new();
    let config = DestinationConfig::new(
        mock_server.host(),
        mock_server.port(),
        "test.key",
        "admin",
        "admin",
    )
    .with_timeout(Duration::from_secs(5));
    let handler = ZabbixHandler::with_reporter(config, reporter.as_reporter());
    (mock_server, reporter, handler)
}
