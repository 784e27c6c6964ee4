//! Round-trip latency benchmark for a gRPC echo service.
//!
//! The same binary runs either side: [`server`] echoes every payload back,
//! [`client`] sends payloads of growing size and reports the mean latency of
//! each size.

pub mod client;
pub mod config;
pub mod pb;
pub mod report;
pub mod series;
pub mod server;

mod error;

pub use config::{Config, Mode};
pub use error::Error;

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`). Logs go
/// to stderr so stdout carries only the report.
pub fn trace_init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
