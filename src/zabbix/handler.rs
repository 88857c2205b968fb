//! Public handler type exported by the crate.

use std::{
    cell::Cell,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

#[cfg(feature = "python")]
use pyo3::prelude::*;

use parking_lot::{Mutex, RwLock};

use crate::{
    handler::{Handler, HandlerError},
    level::LogLevel,
    log_record::LogRecord,
};

use super::{
    config::DestinationConfig,
    error::ZabbixError,
    reporter::{ErrorReporter, StderrReporter},
    session::{Session, SessionState},
    submit::submit,
};

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as busy inside the handler until dropped.
struct ReentryGuard {
    outer: bool,
}

impl ReentryGuard {
    fn enter() -> Self {
        Self {
            outer: IN_HANDLER.with(|flag| flag.replace(true)),
        }
    }

    fn active() -> bool {
        IN_HANDLER.with(Cell::get)
    }
}

impl Drop for ReentryGuard {
    fn drop(&mut self) {
        IN_HANDLER.with(|flag| flag.set(self.outer));
    }
}

#[cfg_attr(feature = "python", pyclass)]
/// Handler forwarding records to a Zabbix trapper item.
///
/// Each record is delivered synchronously: the calling thread logs in, sends
/// the value and logs out before `dispatch` returns. Failures never reach
/// the caller; they go to the configured [`ErrorReporter`] and the record is
/// dropped.
pub struct ZabbixHandler {
    config: DestinationConfig,
    session: Mutex<Session>,
    level: RwLock<LogLevel>,
    reporter: Arc<dyn ErrorReporter>,
    closed: AtomicBool,
}

impl ZabbixHandler {
    /// Connect to `ip:port` and authenticate, reporting failures to stderr.
    pub fn new(
        ip: impl Into<String>,
        port: u16,
        key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_reporter(
            DestinationConfig::new(ip, port, key, username, password),
            Arc::new(StderrReporter),
        )
    }

    /// Construct the handler from a configuration object.
    ///
    /// Validation, connection and login failures are passed to `reporter`
    /// instead of being returned, so a misconfigured handler never aborts
    /// start-up. A handler whose configuration is invalid reports every
    /// subsequent record as undeliverable.
    pub fn with_reporter(config: DestinationConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        let _guard = ReentryGuard::enter();
        let session = match config.validate() {
            Ok(()) => {
                let mut session = Session::open(&config);
                if let Err(err) = session.login(&config) {
                    reporter.report(&err);
                }
                session
            }
            Err(err) => {
                reporter.report(&err);
                Session::closed(&config)
            }
        };
        Self {
            config,
            session: Mutex::new(session),
            level: RwLock::new(LogLevel::default()),
            reporter,
            closed: AtomicBool::new(false),
        }
    }

    /// Destination this handler writes to.
    pub fn config(&self) -> &DestinationConfig {
        &self.config
    }

    /// Minimum severity a record needs to be forwarded by [`Handler::handle`].
    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    /// Change the minimum severity forwarded by [`Handler::handle`].
    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    /// Lifecycle position of the underlying session.
    pub fn session_state(&self) -> SessionState {
        self.session.lock().state()
    }

    /// `true` once [`shutdown`](Self::shutdown) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Deliver `record`, returning any failure to the caller.
    ///
    /// The session lock is held for the whole login/submit/logout cycle so
    /// concurrent callers are served one at a time.
    pub fn submit_record(&self, record: &LogRecord) -> Result<(), ZabbixError> {
        let _guard = ReentryGuard::enter();
        let mut session = self.session.lock();
        submit(&mut session, &self.config, record)
    }

    /// Deliver `record`, reporting failures instead of returning them.
    pub fn dispatch(&self, record: &LogRecord) {
        let _guard = ReentryGuard::enter();
        if let Err(err) = self.submit_record(record) {
            self.reporter.report(&err);
        }
    }

    /// Nothing is buffered, so there is nothing to flush.
    pub fn flush(&self) -> bool {
        true
    }

    /// Log out if a session token is held, then release the connection.
    ///
    /// A failed logout is reported but never prevents the connection from
    /// being released. Repeated calls are no-ops.
    ///
    /// Logout is skipped when no token is held: every dispatched record has
    /// already logged out its own session, and only the construct-time login
    /// can still be open here.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _guard = ReentryGuard::enter();
        let mut session = self.session.lock();
        if session.state() == SessionState::Authenticated {
            if let Err(err) = session.logout() {
                self.reporter.report(&err);
            }
        }
        session.close();
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl ZabbixHandler {
    /// Connect and log in with the GIL released.
    #[new]
    pub(crate) fn py_new(
        py: Python<'_>,
        ip: &str,
        port: i64,
        key: &str,
        zabbix_username: &str,
        zabbix_password: &str,
    ) -> Self {
        // Out-of-range ports become 0 so validation reports them.
        let port = u16::try_from(port).unwrap_or(0);
        py.detach(|| Self::new(ip, port, key, zabbix_username, zabbix_password))
    }

    /// Deliver one record. The GIL is released for the network exchange.
    #[pyo3(name = "handle")]
    pub(crate) fn py_handle(
        &self,
        py: Python<'_>,
        logger: &str,
        level: &str,
        message: &str,
    ) -> PyResult<()> {
        let level = level
            .parse::<LogLevel>()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        let record = LogRecord::new(logger, level, message);
        py.detach(|| self.handle(record))
            .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(format!("Handler error: {e}")))
    }

    /// Set the minimum level forwarded to Zabbix, e.g. ``"ERROR"``.
    #[pyo3(name = "set_level")]
    fn py_set_level(&self, level: &str) -> PyResult<()> {
        let level = level
            .parse::<LogLevel>()
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        self.set_level(level);
        Ok(())
    }

    /// Records are sent immediately; always returns ``True``.
    #[pyo3(name = "flush")]
    fn py_flush(&self) -> bool {
        self.flush()
    }

    /// Log out and release the connection to the server.
    #[pyo3(name = "close")]
    pub(crate) fn py_close(&self, py: Python<'_>) {
        py.detach(|| self.shutdown());
    }
}

impl Handler for ZabbixHandler {
    fn handle(&self, record: LogRecord) -> Result<(), HandlerError> {
        // Records emitted while this thread is inside the handler (for
        // example by the HTTP client) would deadlock on the session lock.
        if ReentryGuard::active() {
            return Ok(());
        }
        if self.is_closed() {
            return Err(HandlerError::Closed);
        }
        if record.level < self.level() {
            return Ok(());
        }
        self.dispatch(&record);
        Ok(())
    }

    fn flush(&self) -> bool {
        ZabbixHandler::flush(self)
    }

    fn close(&self) {
        self.shutdown();
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Drop for ZabbixHandler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ZabbixHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZabbixHandler")
            .field("config", &self.config)
            .field("level", &self.level())
            .field("closed", &self.is_closed())
            .finish()
    }
}
