//! Error reporter that keeps every reported error for inspection.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::zabbix::{ErrorReporter, ZabbixError, render_error};

/// Snapshot of one reported error.
#[derive(Clone, Debug)]
pub struct Reported {
    /// Rendered diagnostic line including the cause chain.
    pub line: String,
    /// Variant name of the innermost cause.
    pub kind: &'static str,
}

#[derive(Clone, Default)]
pub struct CollectingReporter {
    reports: Arc<Mutex<Vec<Reported>>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Reported> {
        self.reports.lock().clone()
    }

    /// Variant names of the innermost causes, in report order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.reports.lock().iter().map(|r| r.kind).collect()
    }

    pub fn as_reporter(&self) -> Arc<dyn ErrorReporter> {
        Arc::new(self.clone())
    }
}

fn kind_of(err: &ZabbixError) -> &'static str {
    match err.root_cause() {
        ZabbixError::InvalidConfig(_) => "InvalidConfig",
        ZabbixError::Connection { .. } => "Connection",
        ZabbixError::Status { .. } => "Status",
        ZabbixError::Auth(_) => "Auth",
        ZabbixError::Parse(_) => "Parse",
        ZabbixError::Submission(_) => "Submission",
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, err: &ZabbixError) {
        self.reports.lock().push(Reported {
            line: render_error(err),
            kind: kind_of(err),
        });
    }
}
