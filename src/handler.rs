//! Handler abstraction shared by the framework bridges.

use std::any::Any;

use thiserror::Error;

use crate::log_record::LogRecord;

/// Errors a handler may return from [`Handler::handle`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler has been shut down and no longer accepts records.
    #[error("handler is closed")]
    Closed,
}

/// Trait implemented by all log handlers.
///
/// Handlers are `Send + Sync` so a single instance can be shared between the
/// threads of the host application.
pub trait Handler: Send + Sync {
    /// Dispatch a log record for handling.
    fn handle(&self, record: LogRecord) -> Result<(), HandlerError>;

    /// Flush any buffered records. Returns `true` on success.
    fn flush(&self) -> bool {
        true
    }

    /// Release the resources held by the handler.
    fn close(&self) {}

    /// Downcast support for callers holding a trait object.
    fn as_any(&self) -> &dyn Any;
}
