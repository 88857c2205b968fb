//! Python module registration for the feature-gated bindings.
//!
//! Keeps every `#[pymodule]` registration in one place so `lib.rs` stays
//! free of scattered `#[cfg(feature = "python")]` annotations.

use pyo3::{Bound, PyResult, prelude::*};

use crate::{DEFAULT_TIMEOUT, ZabbixHandler};

/// Python extension module exposing `ZabbixHandler`.
#[pymodule]
pub(crate) fn _zabbix_handler_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ZabbixHandler>()?;
    m.add("DEFAULT_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?;
    Ok(())
}
