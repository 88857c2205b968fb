//! Authenticated session with the Zabbix server.
//!
//! A [`Session`] owns the connection and the current API token. Tokens are
//! replaced on every [`Session::login`] and cleared by [`Session::logout`];
//! [`Session::close`] releases the connection for good.

use log::debug;
use serde::Serialize;
use serde_json::Value;

use super::{
    config::DestinationConfig,
    error::ZabbixError,
    frame,
    protocol::{self, LoginRequest, LogoutRequest},
    transport::Connection,
};

/// Lifecycle position of a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Connection prepared, no token held.
    Connected,
    /// A token from a successful login is held.
    Authenticated,
    /// The connection has been released.
    Closed,
}

pub struct Session {
    connection: Option<Connection>,
    token: Option<String>,
    addr: String,
}

impl Session {
    /// Open a connection to the server described by `config`.
    pub fn open(config: &DestinationConfig) -> Self {
        debug!("ZabbixHandler: opening session to {}", config.addr());
        Self {
            connection: Some(Connection::open(config)),
            token: None,
            addr: config.addr(),
        }
    }

    /// A session whose connection has already been released.
    pub(crate) fn closed(config: &DestinationConfig) -> Self {
        Self {
            connection: None,
            token: None,
            addr: config.addr(),
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.connection, &self.token) {
            (None, _) => SessionState::Closed,
            (Some(_), None) => SessionState::Connected,
            (Some(_), Some(_)) => SessionState::Authenticated,
        }
    }

    /// Current API token, if authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Authenticate with `config`'s credentials and store the new token.
    ///
    /// Any previously held token is discarded first, so a failed login never
    /// leaves a usable token behind.
    pub fn login(&mut self, config: &DestinationConfig) -> Result<&str, ZabbixError> {
        self.token = None;
        let response = self.call(&LoginRequest::new(&config.username, &config.password))?;
        let token = protocol::login_token(&response).ok_or_else(|| {
            let reason = protocol::api_error(&response)
                .unwrap_or_else(|| "login returned an empty result".to_owned());
            ZabbixError::Auth(reason)
        })?;
        debug!("ZabbixHandler: authenticated as {}", config.username);
        Ok(self.token.insert(token))
    }

    /// End the session identified by the held token.
    ///
    /// The token is cleared whatever the outcome.
    pub fn logout(&mut self) -> Result<(), ZabbixError> {
        let token = self
            .token
            .take()
            .ok_or_else(|| ZabbixError::Auth("logout requires an active session token".into()))?;
        let response = self.call(&LogoutRequest::new(&token))?;
        if !protocol::logout_succeeded(&response) {
            let reason = protocol::api_error(&response)
                .unwrap_or_else(|| "logout did not return true".to_owned());
            return Err(ZabbixError::Auth(reason));
        }
        debug!("ZabbixHandler: session logged out");
        Ok(())
    }

    /// Frame `message`, send it, and decode the response.
    pub fn call<T: Serialize>(&mut self, message: &T) -> Result<Value, ZabbixError> {
        let body = self.send(message)?;
        Ok(frame::decode(&body)?)
    }

    /// Frame `message`, send it, and return the raw response body.
    pub fn send<T: Serialize>(&mut self, message: &T) -> Result<Vec<u8>, ZabbixError> {
        let connection = self.connection()?;
        let packet = frame::encode_json(message)?;
        connection.exchange(&packet)
    }

    /// Release the connection. Calling this more than once has no effect.
    pub fn close(&mut self) {
        self.token = None;
        if self.connection.take().is_some() {
            debug!("ZabbixHandler: closed session to {}", self.addr);
        }
    }

    fn connection(&self) -> Result<&Connection, ZabbixError> {
        self.connection.as_ref().ok_or_else(|| ZabbixError::Connection {
            addr: self.addr.clone(),
            reason: "session closed".into(),
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("addr", &self.addr)
            .field("state", &self.state())
            .finish()
    }
}
