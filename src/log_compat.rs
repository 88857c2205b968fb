//! Compatibility bridge for the Rust `log` crate.
//!
//! [`ZabbixLogAdapter`] implements `log::Log` and forwards each record to a
//! shared [`Handler`], normally a [`ZabbixHandler`](crate::ZabbixHandler).
//! [`install_global_logger`] registers the adapter as the process-wide
//! logger.

use std::borrow::Cow;
use std::sync::Arc;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

use crate::handler::Handler;
use crate::level::LogLevel;
use crate::log_record::{LogRecord, RecordMetadata};

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogLevel::Trace,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Error => LogLevel::Error,
        }
    }
}

/// Adapter implementing the Rust `log::Log` trait on top of a [`Handler`].
///
/// The record target becomes the logger name, with `::` separators rewritten
/// to dots. Records above `max_level` are ignored before conversion.
pub struct ZabbixLogAdapter {
    handler: Arc<dyn Handler>,
    max_level: LevelFilter,
}

impl ZabbixLogAdapter {
    pub fn new(handler: Arc<dyn Handler>, max_level: LevelFilter) -> Self {
        Self { handler, max_level }
    }

    fn convert(record: &Record<'_>) -> LogRecord {
        let metadata = RecordMetadata {
            module_path: record.module_path().unwrap_or_default().to_string(),
            filename: record.file().unwrap_or_default().to_string(),
            line_number: record.line().unwrap_or(0),
        };
        LogRecord::with_metadata(
            &normalise_target(record.target()),
            LogLevel::from(record.level()),
            &record.args().to_string(),
            metadata,
        )
    }
}

fn normalise_target(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

impl log::Log for ZabbixLogAdapter {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // A closed handler has nowhere to send the record.
        let _ = self.handler.handle(Self::convert(record));
    }

    fn flush(&self) {
        self.handler.flush();
    }
}

/// Install `handler` as the global Rust logger.
///
/// Fails when another global logger has already been set. On success the
/// `log` crate's maximum level is raised to `max_level`.
pub fn install_global_logger(
    handler: Arc<dyn Handler>,
    max_level: LevelFilter,
) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ZabbixLogAdapter::new(handler, max_level)))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for the `log` crate bridge.

    use super::*;
    use crate::test_utils::CollectingHandler;
    use log::Log;
    use rstest::rstest;
    use serial_test::serial;

    #[rstest]
    #[case(log::Level::Trace, LogLevel::Trace)]
    #[case(log::Level::Debug, LogLevel::Debug)]
    #[case(log::Level::Info, LogLevel::Info)]
    #[case(log::Level::Warn, LogLevel::Warn)]
    #[case(log::Level::Error, LogLevel::Error)]
    fn level_mapping_is_direct(#[case] level: log::Level, #[case] expected: LogLevel) {
        assert_eq!(LogLevel::from(level), expected);
    }

    #[rstest]
    fn adapter_converts_records() {
        let collector = CollectingHandler::new();
        let adapter = ZabbixLogAdapter::new(Arc::new(collector.clone()), LevelFilter::Trace);

        let record = log::Record::builder()
            .args(format_args!("hello"))
            .level(log::Level::Info)
            .target("bridge::test")
            .module_path(Some("bridge::test"))
            .file(Some("src/bridge.rs"))
            .line(Some(42))
            .build();
        adapter.log(&record);

        let records = collector.collected();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.logger, "bridge.test");
        assert_eq!(rec.level, LogLevel::Info);
        assert_eq!(rec.message, "hello");
        assert_eq!(rec.metadata.module_path, "bridge::test");
        assert_eq!(rec.metadata.line_number, 42);
        assert_eq!(rec.origin(), "src/bridge.rs");
    }

    #[rstest]
    fn adapter_respects_max_level() {
        let collector = CollectingHandler::new();
        let adapter = ZabbixLogAdapter::new(Arc::new(collector.clone()), LevelFilter::Warn);

        for (level, text) in [(log::Level::Info, "info"), (log::Level::Error, "error")] {
            adapter.log(
                &log::Record::builder()
                    .args(format_args!("{text}"))
                    .level(level)
                    .target("bridge")
                    .build(),
            );
        }

        let records = collector.collected();
        assert_eq!(records.len(), 1, "only ERROR should pass the filter");
        assert_eq!(records[0].message, "error");
    }

    #[rstest]
    #[serial]
    fn install_routes_log_macros_and_refuses_second_logger() {
        let collector = CollectingHandler::new();
        install_global_logger(Arc::new(collector.clone()), LevelFilter::Info)
            .expect("first install succeeds");

        log::info!(target: "installed", "through the macro");
        log::debug!(target: "installed", "filtered out");

        let messages: Vec<_> = collector
            .collected()
            .into_iter()
            .filter(|r| r.logger == "installed")
            .map(|r| r.message)
            .collect();
        assert_eq!(messages, ["through the macro"]);

        let again = install_global_logger(Arc::new(CollectingHandler::new()), LevelFilter::Info);
        assert!(again.is_err());
    }
}
