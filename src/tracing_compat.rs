//! Compatibility bridge for the `tracing` ecosystem.
//!
//! [`ZabbixLayer`] is a `tracing_subscriber` layer that turns each event into
//! a [`LogRecord`] and hands it to a shared [`Handler`]. The `message` field
//! becomes the record message; other fields are appended as `name=value`.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::handler::Handler;
use crate::level::LogLevel;
use crate::log_record::{LogRecord, RecordMetadata};

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

/// Layer forwarding `tracing` events to a [`Handler`].
pub struct ZabbixLayer {
    handler: Arc<dyn Handler>,
}

impl ZabbixLayer {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for ZabbixLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let metadata = RecordMetadata {
            module_path: meta.module_path().unwrap_or_default().to_string(),
            filename: meta.file().unwrap_or_default().to_string(),
            line_number: meta.line().unwrap_or(0),
        };
        let record = LogRecord::with_metadata(
            meta.target(),
            LogLevel::from(meta.level()),
            &visitor.finish(),
            metadata,
        );
        let _ = self.handler.handle(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::CollectingHandler;
    use rstest::rstest;
    use tracing_subscriber::prelude::*;

    fn collect(emit: impl FnOnce()) -> Vec<LogRecord> {
        let collector = CollectingHandler::new();
        let subscriber =
            tracing_subscriber::registry().with(ZabbixLayer::new(Arc::new(collector.clone())));
        tracing::subscriber::with_default(subscriber, emit);
        collector.collected()
    }

    #[rstest]
    fn event_becomes_record() {
        let records = collect(|| tracing::error!(target: "payments", "card declined"));
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.logger, "payments");
        assert_eq!(rec.level, LogLevel::Error);
        assert_eq!(rec.message, "card declined");
        assert!(rec.origin().ends_with("tracing_compat.rs"));
        assert!(rec.metadata.line_number > 0);
    }

    #[rstest]
    fn extra_fields_are_appended() {
        let records = collect(|| tracing::warn!(order = 42, user = "ann", "slow checkout"));
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[0].message, "slow checkout order=42 user=ann");
    }

    #[rstest]
    fn fields_without_message() {
        let records = collect(|| tracing::info!(attempt = 3));
        assert_eq!(records[0].message, "attempt=3");
    }
}
