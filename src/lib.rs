//! Logging handler that forwards records to a Zabbix server.
//!
//! [`ZabbixHandler`] pushes every record it accepts to a trapper item over
//! the Zabbix JSON API, wrapping each request in a `ZBXD` frame. Records
//! reach it through the [`Handler`] trait, the `log` crate bridge
//! ([`ZabbixLogAdapter`]), the `tracing` bridge ([`ZabbixLayer`]) or the
//! Python bindings.

pub mod handler;
pub mod handlers;
pub mod level;
pub mod log_record;
pub mod zabbix;

#[cfg(feature = "log-compat")]
pub mod log_compat;
#[cfg(feature = "tracing-compat")]
pub mod tracing_compat;
#[cfg(feature = "python")]
mod python_module;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use handler::{Handler, HandlerError};
pub use handlers::{HandlerBuildError, HandlerBuilderTrait, ZabbixHandlerBuilder};
pub use level::{LogLevel, ParseLevelError};
pub use log_record::{LogRecord, RecordMetadata};
pub use zabbix::{
    DEFAULT_TIMEOUT, DestinationConfig, ErrorReporter, FrameError, SessionState, StderrReporter,
    ZabbixError, ZabbixHandler,
};

#[cfg(feature = "log-compat")]
pub use log_compat::{ZabbixLogAdapter, install_global_logger};
#[cfg(feature = "tracing-compat")]
pub use tracing_compat::ZabbixLayer;
