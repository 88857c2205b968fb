//! Zabbix trapper logging handler.
//!
//! This module defines [`ZabbixHandler`], a handler that pushes each
//! [`LogRecord`](crate::log_record::LogRecord) to a pre-provisioned trapper
//! item on a Zabbix server. Every record is sent inside its own
//! login/`sender data`/logout exchange over a single persistent connection,
//! with each message wrapped in the `ZBXD` frame implemented by [`frame`].
//!
//! Nothing is buffered or retried: a record that cannot be delivered is
//! reported through the handler's [`ErrorReporter`] and dropped.

mod config;
mod error;
pub mod frame;
mod handler;
mod protocol;
mod reporter;
mod session;
mod submit;
mod transport;


pub use config::{DEFAULT_TIMEOUT, DestinationConfig};
pub use error::ZabbixError;
pub use frame::FrameError;
pub use handler::ZabbixHandler;
pub use protocol::{DataPoint, LoginRequest, LogoutRequest, SenderData};
pub use reporter::{ErrorReporter, StderrReporter, render as render_error};
pub use session::{Session, SessionState};
pub use submit::submit;
