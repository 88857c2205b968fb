//! Connection used to exchange frames with the server.
//!
//! Requests are written as `PUT /` with the frame as the body and the whole
//! response body is read back. The underlying `ureq::Agent` keeps the TCP
//! connection alive between requests, so fully draining each response lets
//! the next exchange reuse it.

use std::io::Read;

use ureq::{Agent, AgentBuilder};

use super::{config::DestinationConfig, error::ZabbixError};

/// Upper bound on a response body read into memory.
pub const MAX_RESPONSE_BYTES: u64 = 16 << 20;

/// Persistent connection to one Zabbix endpoint.
pub struct Connection {
    agent: Agent,
    url: String,
    addr: String,
}

impl Connection {
    /// Prepare a connection to the server described by `config`.
    ///
    /// The connect and per-request timeouts both use `config.timeout`.
    pub fn open(config: &DestinationConfig) -> Self {
        let agent = AgentBuilder::new()
            .timeout_connect(config.timeout)
            .timeout(config.timeout)
            .max_idle_connections_per_host(1)
            .build();
        Self {
            agent,
            url: config.url(),
            addr: config.addr(),
        }
    }

    /// Send one frame and return the complete response body.
    pub fn exchange(&self, frame: &[u8]) -> Result<Vec<u8>, ZabbixError> {
        let response = self
            .agent
            .put(&self.url)
            .set("Content-Type", "application/octet-stream")
            .send_bytes(frame)
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut body)
            .map_err(|err| self.connection_error(err.to_string()))?;

        if !(200..=299).contains(&status) {
            return Err(ZabbixError::Status {
                addr: self.addr.clone(),
                status,
            });
        }
        Ok(body)
    }

    fn classify(&self, err: ureq::Error) -> ZabbixError {
        match err {
            ureq::Error::Status(status, response) => {
                // Drain the body so the pooled connection stays usable.
                let _ = std::io::copy(
                    &mut response.into_reader().take(MAX_RESPONSE_BYTES),
                    &mut std::io::sink(),
                );
                ZabbixError::Status {
                    addr: self.addr.clone(),
                    status,
                }
            }
            ureq::Error::Transport(transport) => self.connection_error(transport.to_string()),
        }
    }

    fn connection_error(&self, reason: String) -> ZabbixError {
        ZabbixError::Connection {
            addr: self.addr.clone(),
            reason,
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("addr", &self.addr).finish()
    }
}
