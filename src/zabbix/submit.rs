//! Per-event submission cycle.
//!
//! Every record gets its own login, `sender data` and logout exchange on the
//! shared connection. The token from one cycle is never reused by the next.

use log::warn;

use crate::log_record::LogRecord;

use super::{
    config::DestinationConfig, error::ZabbixError, protocol::SenderData, session::Session,
};

/// Deliver `record` to the trapper item configured in `config`.
///
/// Failures are wrapped in [`ZabbixError::Submission`]; the record is not
/// retried.
pub fn submit(
    session: &mut Session,
    config: &DestinationConfig,
    record: &LogRecord,
) -> Result<(), ZabbixError> {
    run_cycle(session, config, record).map_err(ZabbixError::into_submission)
}

fn run_cycle(
    session: &mut Session,
    config: &DestinationConfig,
    record: &LogRecord,
) -> Result<(), ZabbixError> {
    session.login(config)?;

    let payload = SenderData::from_record(record, &config.key);
    if let Err(err) = session.send(&payload) {
        if let Err(logout_err) = session.logout() {
            warn!("ZabbixHandler: logout after failed submission also failed: {logout_err}");
        }
        return Err(err);
    }

    session.logout()
}
