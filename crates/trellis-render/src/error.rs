//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;
use trellis_router::RouteError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid router settings: {0}")]
    Router(#[from] RouteError),
    #[error("layout sizes must be positive and finite")]
    Layout,
}
