//! Log record representation passed to handlers.
//!
//! A [`LogRecord`] captures one event from the host logging framework and
//! where in the source it came from. Records are read-only inputs to the
//! Zabbix handler and are never persisted.

use std::fmt;

use crate::level::LogLevel;

/// Source location of a log call, as far as the host framework knows it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordMetadata {
    /// Rust module path where the log call originated.
    pub module_path: String,
    /// Source file name for the log call. Empty when unknown.
    pub filename: String,
    /// Line number in the source file, or 0.
    pub line_number: u32,
}

#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Name of the logger that created this record.
    pub logger: String,
    /// Severity of the record.
    pub level: LogLevel,
    /// Rendered message text.
    pub message: String,
    /// Where the record was emitted.
    pub metadata: RecordMetadata,
}

impl LogRecord {
    /// Construct a record with no source location.
    pub fn new(logger: &str, level: LogLevel, message: &str) -> Self {
        Self::with_metadata(logger, level, message, RecordMetadata::default())
    }

    /// Construct a record emitted at `metadata`'s source location.
    pub fn with_metadata(
        logger: &str,
        level: LogLevel,
        message: &str,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            metadata,
        }
    }

    /// Identifier of the code that produced the record.
    ///
    /// The source filename is preferred; records without one fall back to
    /// the logger name.
    pub fn origin(&self) -> &str {
        if self.metadata.filename.is_empty() {
            &self.logger
        } else {
            &self.metadata.filename
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn origin_falls_back_to_logger_name() {
        let record = LogRecord::new("myLogger", LogLevel::Critical, "Hello, Zabbix");
        assert_eq!(record.origin(), "myLogger");
    }

    #[rstest]
    fn origin_prefers_source_filename() {
        let metadata = RecordMetadata {
            filename: "src/app.rs".into(),
            line_number: 12,
            ..Default::default()
        };
        let record = LogRecord::with_metadata("app", LogLevel::Error, "boom", metadata);
        assert_eq!(record.origin(), "src/app.rs");
        assert_eq!(record.metadata.line_number, 12);
    }

    #[rstest]
    fn display_shows_level_and_message() {
        let record = LogRecord::new("core", LogLevel::Warn, "careful");
        assert_eq!(record.to_string(), "WARN - careful");
    }
}
