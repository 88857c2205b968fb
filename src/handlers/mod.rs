//! Handler builders and associated traits.
//!
//! Provides a builder API for constructing handlers in a type‑safe manner.
//! Each builder implements [`HandlerBuilderTrait`] which returns the
//! concrete handler or a shared [`Handler`] trait object ready for
//! registration with a logging bridge.

use std::{io, sync::Arc};

use thiserror::Error;

use crate::handler::Handler;

pub mod ini_config;
pub mod zabbix_builder;

pub use zabbix_builder::ZabbixHandlerBuilder;

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// Underlying I/O error whilst reading configuration.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The configuration file is not valid INI.
    #[error("invalid INI configuration: {0}")]
    Ini(String),
}

/// Trait implemented by all handler builders.
pub trait HandlerBuilderTrait: Send + Sync {
    /// Concrete handler produced by the builder.
    type Handler: Handler + 'static;

    /// Build the concrete handler instance.
    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError>;

    /// Build the handler as a shareable trait object.
    fn build(&self) -> Result<Arc<dyn Handler>, HandlerBuildError> {
        Ok(Arc::new(self.build_inner()?))
    }
}
