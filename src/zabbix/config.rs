//! Destination configuration consumed by the Zabbix handler.
//!
//! `ZabbixHandlerBuilder` and `ZabbixHandler::new` both produce a
//! [`DestinationConfig`] before any connection is attempted.

use std::fmt;
use std::time::Duration;

use super::error::ZabbixError;

/// Connect and request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One Zabbix endpoint plus the trapper item that receives values.
#[derive(Clone, PartialEq, Eq)]
pub struct DestinationConfig {
    /// Hostname or IP address of the server.
    pub host: String,
    /// TCP port of the server.
    pub port: u16,
    /// Key of the trapper item receiving log messages.
    pub key: String,
    /// API user name.
    pub username: String,
    /// API password.
    pub password: String,
    /// Bound on connection establishment and on each request.
    pub timeout: Duration,
}

impl DestinationConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            key: key.into(),
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the connect/request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the fields needed to reach the server and address the item.
    pub fn validate(&self) -> Result<(), ZabbixError> {
        if self.host.trim().is_empty() {
            return Err(ZabbixError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ZabbixError::InvalidConfig(
                "port must be in the range 1-65535".into(),
            ));
        }
        if self.key.trim().is_empty() {
            return Err(ZabbixError::InvalidConfig("item key must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(ZabbixError::InvalidConfig(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// `host:port` as used in diagnostics.
    pub fn addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// URL every request is written to.
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr())
    }
}

impl fmt::Debug for DestinationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("key", &self.key)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config() -> DestinationConfig {
        DestinationConfig::new("localhost", 10051, "test.key", "admin", "secret")
    }

    #[rstest]
    fn defaults_to_sixty_second_timeout() {
        assert_eq!(config().timeout, Duration::from_secs(60));
        assert!(config().validate().is_ok());
    }

    #[rstest]
    #[case::empty_host(DestinationConfig { host: " ".into(), ..config() }, "host")]
    #[case::zero_port(DestinationConfig { port: 0, ..config() }, "port")]
    #[case::empty_key(DestinationConfig { key: String::new(), ..config() }, "key")]
    #[case::zero_timeout(config().with_timeout(Duration::ZERO), "timeout")]
    fn validate_rejects(#[case] config: DestinationConfig, #[case] field: &str) {
        let err = config.validate().expect_err("config must be rejected");
        assert!(
            matches!(&err, ZabbixError::InvalidConfig(msg) if msg.contains(field)),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn url_brackets_ipv6_hosts() {
        let config = DestinationConfig { host: "::1".into(), ..config() };
        assert_eq!(config.url(), "http://[::1]:10051/");
        assert_eq!(DestinationConfig::new("10.0.0.5", 80, "k", "u", "p").url(), "http://10.0.0.5:80/");
    }

    #[rstest]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
