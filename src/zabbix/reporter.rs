//! Error-reporting channel for failures the handler must not propagate.
//!
//! Logging must never abort the application being logged, so construction
//! and per-event failures are handed to an [`ErrorReporter`] instead of being
//! returned. The default reporter prints one diagnostic line to standard
//! error.

use std::error::Error as _;
use std::fmt::Write as _;
use std::io::{self, Write};

use super::error::ZabbixError;

/// Sink for errors raised inside the handler.
pub trait ErrorReporter: Send + Sync {
    /// Report `err`. Implementations must not panic.
    fn report(&self, err: &ZabbixError);
}

/// Reporter writing diagnostics to standard error.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&self, err: &ZabbixError) {
        let line = render(err);
        let _ = writeln!(io::stderr().lock(), "{line}");
    }
}

/// Render `err` with its chain of causes on a single line.
pub fn render(err: &ZabbixError) -> String {
    let mut line = format!("ZabbixHandler: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(line, ": caused by: {cause}");
        source = cause.source();
    }
    line
}

impl<F> ErrorReporter for F
where
    F: Fn(&ZabbixError) + Send + Sync,
{
    fn report(&self, err: &ZabbixError) {
        self(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rstest::rstest;

    #[rstest]
    fn render_includes_cause_chain() {
        let err = ZabbixError::Auth("logout returned false".into()).into_submission();
        assert_eq!(
            render(&err),
            concat!(
                "ZabbixHandler: unable to send log entry to Zabbix server: caused by: ",
                "Zabbix authentication failed: logout returned false"
            )
        );
    }

    #[rstest]
    fn closures_act_as_reporters() {
        let seen = Mutex::new(Vec::new());
        let reporter = |err: &ZabbixError| seen.lock().push(err.to_string());
        reporter.report(&ZabbixError::InvalidConfig("port must be non-zero".into()));
        assert_eq!(
            seen.lock().as_slice(),
            ["invalid Zabbix handler configuration: port must be non-zero"]
        );
    }
}
