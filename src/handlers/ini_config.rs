//! INI loading for [`ZabbixHandlerBuilder`].
//!
//! A section such as
//!
//! ```ini
//! [zabbix]
//! host = zabbix.example.net
//! port = 10051
//! key = app.log
//! username = Admin
//! password = zabbix
//! timeout_ms = 5000
//! level = ERROR
//! ```
//!
//! populates a builder. Unknown keys are ignored. `timeout_ms` and `level`
//! are optional; everything else is checked when the builder is built.

use std::{fs, io::ErrorKind, path::Path};

use ini::{Ini, Properties};

use crate::level::LogLevel;

use super::{HandlerBuildError, ZabbixHandlerBuilder};

impl ZabbixHandlerBuilder {
    /// Populate a builder from `section` of INI `text`.
    pub fn from_ini_str(text: &str, section: &str) -> Result<Self, HandlerBuildError> {
        let ini =
            Ini::load_from_str(text).map_err(|err| HandlerBuildError::Ini(err.to_string()))?;
        let props = ini.section(Some(section)).ok_or_else(|| {
            HandlerBuildError::InvalidConfig(format!("section [{section}] not found"))
        })?;
        apply_section(Self::new(), props)
    }

    /// Populate a builder from `section` of the INI file at `path`.
    pub fn from_ini_file(
        path: impl AsRef<Path>,
        section: &str,
    ) -> Result<Self, HandlerBuildError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => HandlerBuildError::InvalidConfig(format!(
                "{} doesn't exist",
                path.display()
            )),
            _ => HandlerBuildError::Io(err),
        })?;
        Self::from_ini_str(&text, section)
    }
}

fn apply_section(
    mut builder: ZabbixHandlerBuilder,
    props: &Properties,
) -> Result<ZabbixHandlerBuilder, HandlerBuildError> {
    if let Some(host) = props.get("host") {
        builder = builder.with_host(host);
    }
    if let Some(port) = props.get("port") {
        builder = builder.with_port(parse_port(port)?);
    }
    if let Some(key) = props.get("key") {
        builder = builder.with_key(key);
    }
    match (props.get("username"), props.get("password")) {
        (Some(user), Some(pass)) => builder = builder.with_credentials(user, pass),
        (None, None) => {}
        _ => {
            return Err(HandlerBuildError::InvalidConfig(
                "username and password must be given together".into(),
            ));
        }
    }
    if let Some(timeout) = props.get("timeout_ms") {
        let timeout = timeout.trim().parse::<u64>().map_err(|_| {
            HandlerBuildError::InvalidConfig(format!("timeout_ms must be an integer: {timeout}"))
        })?;
        builder = builder.with_timeout_ms(timeout);
    }
    if let Some(level) = props.get("level") {
        let level = level
            .parse::<LogLevel>()
            .map_err(|err| HandlerBuildError::InvalidConfig(err.to_string()))?;
        builder = builder.with_level(level);
    }
    Ok(builder)
}

fn parse_port(raw: &str) -> Result<u16, HandlerBuildError> {
    raw.trim().parse::<u16>().map_err(|_| {
        HandlerBuildError::InvalidConfig(format!(
            "port must be an integer in the range 1-65535: {raw}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerBuilderTrait;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
[zabbix]
host = 127.0.0.1
port = 10051
key = app.log
username = Admin
password = zabbix
timeout_ms = 1500
level = warning

[other]
host = elsewhere
";

    #[rstest]
    fn loads_named_section() {
        let builder = ZabbixHandlerBuilder::from_ini_str(SAMPLE, "zabbix").expect("valid INI");
        let rendered = format!("{builder:?}");
        assert!(rendered.contains("\"127.0.0.1\""));
        assert!(rendered.contains("Some(10051)"));
        assert!(rendered.contains("\"app.log\""));
        assert!(rendered.contains("Some(1500)"));
        assert!(rendered.contains("Warn"));
        assert!(!rendered.contains("\"zabbix\""));
    }

    #[rstest]
    fn missing_section_is_reported() {
        let err = ZabbixHandlerBuilder::from_ini_str(SAMPLE, "absent").expect_err("no section");
        assert!(matches!(err, HandlerBuildError::InvalidConfig(msg) if msg.contains("[absent]")));
    }

    #[rstest]
    fn incomplete_section_fails_at_build() {
        let builder = ZabbixHandlerBuilder::from_ini_str(SAMPLE, "other").expect("parses");
        let err = builder.build_inner().expect_err("port is missing");
        assert!(matches!(err, HandlerBuildError::InvalidConfig(msg) if msg.contains("port")));
    }

    #[rstest]
    #[case::port("[z]\nport = http\n", "port")]
    #[case::port_range("[z]\nport = 70000\n", "port")]
    #[case::timeout("[z]\ntimeout_ms = soon\n", "timeout_ms")]
    #[case::level("[z]\nlevel = LOUD\n", "LOUD")]
    #[case::half_credentials("[z]\nusername = Admin\n", "together")]
    fn rejects_bad_values(#[case] text: &str, #[case] needle: &str) {
        let err = ZabbixHandlerBuilder::from_ini_str(text, "z").expect_err("bad value");
        assert!(
            matches!(&err, HandlerBuildError::InvalidConfig(msg) if msg.contains(needle)),
            "unexpected error {err:?}"
        );
    }

    #[rstest]
    fn malformed_ini_is_reported() {
        let err = ZabbixHandlerBuilder::from_ini_str("[unterminated\nhost = x\n", "z")
            .expect_err("malformed INI");
        assert!(matches!(err, HandlerBuildError::Ini(_)));
    }

    #[rstest]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");
        let builder =
            ZabbixHandlerBuilder::from_ini_file(file.path(), "zabbix").expect("file loads");
        assert!(format!("{builder:?}").contains("\"app.log\""));
    }

    #[rstest]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.ini");
        let err = ZabbixHandlerBuilder::from_ini_file(&path, "zabbix").expect_err("no file");
        assert!(matches!(err, HandlerBuildError::InvalidConfig(msg) if msg.contains("doesn't exist")));
    }
}
