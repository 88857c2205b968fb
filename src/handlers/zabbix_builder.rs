//! Builder for [`ZabbixHandler`](crate::zabbix::ZabbixHandler).
//!
//! Collects the destination, credentials, timeout and level threshold,
//! validates them up front, and only then constructs the handler. Failures
//! found here are returned as [`HandlerBuildError`]; connection and login
//! failures during construction still go to the handler's error reporter.

use std::{fmt, sync::Arc, time::Duration};

use crate::{
    level::LogLevel,
    zabbix::{DestinationConfig, ErrorReporter, StderrReporter, ZabbixError, ZabbixHandler},
};

use super::{HandlerBuildError, HandlerBuilderTrait};

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`ZabbixHandler`] instances.
#[derive(Clone, Default)]
pub struct ZabbixHandlerBuilder {
    host: Option<String>,
    port: Option<u16>,
    key: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout_ms: Option<u64>,
    level: Option<LogLevel>,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl ZabbixHandlerBuilder {
    /// Create a new builder with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server address.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the key of the trapper item receiving log messages.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the API user the handler logs in as.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    option_setter!(
        #[doc = "Set the server port."]
        with_port,
        port,
        u16
    );
    option_setter!(
        #[doc = "Override the connect and request timeout in milliseconds."]
        with_timeout_ms,
        timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the minimum level forwarded to Zabbix."]
        with_level,
        level,
        LogLevel
    );

    /// Route construction and delivery failures to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, HandlerBuildError> {
        value
            .as_deref()
            .ok_or_else(|| HandlerBuildError::InvalidConfig(format!("{field} is required")))
    }

    fn build_config(&self) -> Result<DestinationConfig, HandlerBuildError> {
        let host = Self::required(&self.host, "host")?;
        let port = self
            .port
            .ok_or_else(|| HandlerBuildError::InvalidConfig("port is required".into()))?;
        let key = Self::required(&self.key, "key")?;
        let username = Self::required(&self.username, "username")?;
        let password = Self::required(&self.password, "password")?;

        let mut config = DestinationConfig::new(host, port, key, username, password);
        if let Some(timeout) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout));
        }
        config.validate().map_err(|err| match err {
            ZabbixError::InvalidConfig(msg) => HandlerBuildError::InvalidConfig(msg),
            other => HandlerBuildError::InvalidConfig(other.to_string()),
        })?;
        Ok(config)
    }
}

impl HandlerBuilderTrait for ZabbixHandlerBuilder {
    type Handler = ZabbixHandler;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        let config = self.build_config()?;
        let reporter = self
            .reporter
            .clone()
            .unwrap_or_else(|| Arc::new(StderrReporter));
        let handler = ZabbixHandler::with_reporter(config, reporter);
        if let Some(level) = self.level {
            handler.set_level(level);
        }
        Ok(handler)
    }
}

impl fmt::Debug for ZabbixHandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZabbixHandlerBuilder")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("key", &self.key)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("level", &self.level)
            .field("reporter", &self.reporter.as_ref().map(|_| "<reporter>"))
            .finish()
    }
}
