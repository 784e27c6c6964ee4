//! Process configuration.
//!
//! [`Opts`] is what the command line says; [`Config`] is the validated,
//! immutable view of it that gets handed to the selected role.

use std::num::NonZeroU64;

use clap::{Parser, ValueEnum};

use crate::series::Sizes;

/// Bytes reserved on top of the payload for protobuf framing (field tag and
/// length varint) when checking the transport limit.
pub const FRAMING_OVERHEAD: usize = 16;

#[derive(Parser, Debug, Clone)]
#[command(name = "pingpong", about = "gRPC echo round-trip latency benchmark")]
pub struct Opts {
    /// Start the process as an echo server or as a benchmark client.
    #[arg(long, value_enum, default_value_t = Mode::Server)]
    pub mode: Mode,

    /// Address as hostname:port to listen on (server) or dial (client).
    #[arg(long = "server_address", default_value = "localhost:8080")]
    pub server_address: String,

    /// Run warm up calls before timing each message size.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub warmup: bool,

    /// Number of untimed warm up calls per message size.
    #[arg(long = "warmup_iterations", default_value_t = 50)]
    pub warmup_iterations: u64,

    /// Number of timed calls per message size.
    #[arg(long, default_value_t = 100_000)]
    pub iterations: u64,

    /// Benchmark only this message size in bytes. -1 sweeps all sizes.
    #[arg(long = "message_size", default_value_t = -1, allow_negative_numbers = true)]
    pub message_size: i64,

    /// Largest message size in bytes the sweep reaches.
    #[arg(long = "max_message_size", default_value_t = 1 << 22)]
    pub max_message_size: u64,

    /// Largest encoded message in bytes the transport accepts or sends.
    #[arg(long = "max_transport_message_size", default_value_t = 8 << 20)]
    pub max_transport_message_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Server,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub server_address: String,
    pub max_transport_message_size: usize,
    pub benchmark: BenchmarkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    pub warmup: bool,
    pub warmup_iterations: u64,
    pub iterations: NonZeroU64,
    pub sizes: Sizes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("iterations must be at least 1")]
    ZeroIterations,

    #[error("message_size must be -1 or a non-negative size, got {0}")]
    InvalidMessageSize(i64),

    #[error(
        "max_transport_message_size {limit} is too small for the largest payload, need at least {required}"
    )]
    TransportLimitTooSmall { limit: usize, required: u64 },
}

impl Config {
    /// Parses the process arguments. Exits the process on malformed flags.
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::from_opts(Opts::parse())
    }

    pub fn from_opts(opts: Opts) -> Result<Self, ConfigError> {
        let iterations = NonZeroU64::new(opts.iterations).ok_or(ConfigError::ZeroIterations)?;

        let sizes = match opts.message_size {
            -1 => Sizes::Sweep {
                max: opts.max_message_size,
            },
            size if size >= 0 => Sizes::Single(size as u64),
            size => return Err(ConfigError::InvalidMessageSize(size)),
        };

        let required = sizes.largest().saturating_add(FRAMING_OVERHEAD as u64);
        if (opts.max_transport_message_size as u64) < required {
            return Err(ConfigError::TransportLimitTooSmall {
                limit: opts.max_transport_message_size,
                required,
            });
        }

        Ok(Config {
            mode: opts.mode,
            server_address: opts.server_address,
            max_transport_message_size: opts.max_transport_message_size,
            benchmark: BenchmarkConfig {
                warmup: opts.warmup,
                warmup_iterations: opts.warmup_iterations,
                iterations,
                sizes,
            },
        })
    }
}
