//! The benchmark driver.
//!
//! Calls are issued strictly one after another over a single channel: each
//! `echo` is awaited before the next one starts, so the timed loop measures
//! round trips and nothing else.

use std::io::{self, Write};
use std::time::Instant;

use bytes::Bytes;
use tonic::transport::{Channel, Endpoint};

use crate::config::{BenchmarkConfig, Config};
use crate::pb::{ping_pong_client::PingPongClient, EchoMessage, Empty};
use crate::report::{Report, Sample};
use crate::Error;

pub struct Driver {
    client: PingPongClient<Channel>,
    config: BenchmarkConfig,
    rng: fastrand::Rng,
}

impl Driver {
    /// Dials the server and probes it once with `EmptyCall`.
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        let addr = &config.server_address;
        let endpoint = Endpoint::from_shared(format!("http://{addr}")).map_err(|source| {
            Error::InvalidAddress {
                addr: addr.clone(),
                source,
            }
        })?;
        let channel = endpoint.connect().await.map_err(|source| Error::Connect {
            addr: addr.clone(),
            source,
        })?;

        let mut client = PingPongClient::new(channel)
            .max_decoding_message_size(config.max_transport_message_size)
            .max_encoding_message_size(config.max_transport_message_size);

        client.empty_call(Empty {}).await.map_err(Error::call(0))?;
        tracing::info!(%addr, "connected");

        Ok(Driver {
            client,
            config: config.benchmark.clone(),
            rng: fastrand::Rng::new(),
        })
    }

    /// Benchmarks every configured size, writing one report row per size as
    /// soon as it is measured.
    pub async fn run<W: Write>(&mut self, report: &mut Report<W>) -> Result<Vec<Sample>, Error> {
        if self.config.warmup {
            tracing::info!(
                iterations = self.config.warmup_iterations,
                "warm up mode enabled"
            );
        }

        let mut samples = Vec::new();
        for size in self.config.sizes {
            let sample = self.measure(size).await?;
            report.row(&sample).map_err(Error::Report)?;
            samples.push(sample);
        }
        Ok(samples)
    }

    async fn measure(&mut self, size: u64) -> Result<Sample, Error> {
        let payload = self.payload(size);
        tracing::debug!(size, "benchmarking");

        self.verify(&payload).await?;

        if self.config.warmup {
            for _ in 0..self.config.warmup_iterations {
                self.echo(&payload).await?;
            }
        }

        let iterations = self.config.iterations;
        let start = Instant::now();
        for _ in 0..iterations.get() {
            self.echo(&payload).await?;
        }
        let elapsed = start.elapsed();

        Ok(Sample::new(size, iterations, elapsed))
    }

    // `Config` caps every size below the transport limit, which is a usize.
    fn payload(&mut self, size: u64) -> Bytes {
        let mut buf = vec![0u8; size as usize];
        self.rng.fill(&mut buf);
        Bytes::from(buf)
    }

    /// One untimed call whose response is compared byte for byte.
    async fn verify(&mut self, payload: &Bytes) -> Result<(), Error> {
        let echoed = self.echo(payload).await?;
        if echoed != *payload {
            return Err(Error::Mismatch {
                size: payload.len() as u64,
                received: echoed.len() as u64,
            });
        }
        Ok(())
    }

    /// Cloning `Bytes` bumps a refcount, so every call sends the same buffer.
    async fn echo(&mut self, payload: &Bytes) -> Result<Bytes, Error> {
        let size = payload.len() as u64;
        let response = self
            .client
            .echo(EchoMessage {
                payload: payload.clone(),
            })
            .await
            .map_err(Error::call(size))?;

        let echoed = response.into_inner().payload;
        if echoed.len() != payload.len() {
            return Err(Error::Mismatch {
                size,
                received: echoed.len() as u64,
            });
        }
        Ok(echoed)
    }
}

/// Connects to the configured server and streams the report to stdout.
pub async fn run(config: &Config) -> Result<Vec<Sample>, Error> {
    let mut driver = Driver::connect(config).await?;
    let mut report = Report::new(io::stdout()).map_err(Error::Report)?;
    driver.run(&mut report).await
}
