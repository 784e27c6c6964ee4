use std::io;

use crate::config::ConfigError;

/// Every failure the benchmark can hit. None of them are recovered from: the
/// binary reports the error and exits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid server address {addr}: {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("call with {size} byte payload failed: {source}")]
    Call {
        size: u64,
        #[source]
        source: tonic::Status,
    },

    #[error("echo of {size} byte payload came back altered ({received} bytes received)")]
    Mismatch { size: u64, received: u64 },

    #[error("server error: {0}")]
    Serve(#[source] tonic::transport::Error),

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}

impl Error {
    pub(crate) fn call(size: u64) -> impl FnOnce(tonic::Status) -> Self {
        move |source| Error::Call { size, source }
    }
}
