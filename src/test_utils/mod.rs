//! Helpers shared by unit and integration tests.
//!
//! Compiled for unit tests and, through the `test-util` feature, for the
//! integration tests under `tests/`.

pub mod collecting_handler;
pub mod collecting_reporter;
pub mod mock_server;

pub use collecting_handler::CollectingHandler;
pub use collecting_reporter::CollectingReporter;
pub use mock_server::{MockBehaviour, MockServer, request_kind, unused_port};
