//! Failure taxonomy for the Zabbix handler.

use thiserror::Error;

use super::frame::FrameError;

/// Errors produced while talking to the Zabbix server.
#[derive(Debug, Error)]
pub enum ZabbixError {
    /// The destination configuration cannot be used.
    #[error("invalid Zabbix handler configuration: {0}")]
    InvalidConfig(String),

    /// The server could not be reached, or the connection failed mid-request.
    #[error("cannot reach Zabbix server at {addr}: {reason}")]
    Connection { addr: String, reason: String },

    /// The server answered with a non-2xx HTTP status.
    #[error("Zabbix server at {addr} answered with status {status}")]
    Status { addr: String, status: u16 },

    /// Login or logout did not return the expected result.
    #[error("Zabbix authentication failed: {0}")]
    Auth(String),

    /// The response frame or its JSON body is malformed.
    #[error("malformed Zabbix response")]
    Parse(#[from] FrameError),

    /// A log event could not be delivered.
    #[error("unable to send log entry to Zabbix server")]
    Submission(#[source] Box<ZabbixError>),
}

impl ZabbixError {
    /// Wrap `self` as the cause of a failed submission.
    ///
    /// Errors that already describe a submission are returned unchanged.
    pub fn into_submission(self) -> Self {
        match self {
            err @ ZabbixError::Submission(_) => err,
            other => ZabbixError::Submission(Box::new(other)),
        }
    }

    /// The innermost error when `self` wraps a submission failure.
    pub fn root_cause(&self) -> &ZabbixError {
        match self {
            ZabbixError::Submission(inner) => inner.root_cause(),
            other => other,
        }
    }
}
