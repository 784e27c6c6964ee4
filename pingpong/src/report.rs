use std::io::{self, Write};
use std::time::Duration;

/// Measurement for one payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub size: u64,
    /// Timed calls the latency was averaged over. Warm up calls never count.
    pub iterations: u64,
    pub elapsed: Duration,
    /// Mean per-call latency, truncated to whole nanoseconds.
    pub latency_ns: u64,
}

impl Sample {
    pub fn new(size: u64, iterations: std::num::NonZeroU64, elapsed: Duration) -> Self {
        let latency_ns = elapsed.as_nanos() / u128::from(iterations.get());

        Sample {
            size,
            iterations: iterations.get(),
            elapsed,
            latency_ns: u64::try_from(latency_ns).unwrap_or(u64::MAX),
        }
    }
}

/// Tab separated `bytes`/`latency` table, flushed row by row so a long run
/// shows progress.
#[derive(Debug)]
pub struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "bytes\tlatency")?;
        out.flush()?;
        Ok(Report { out })
    }

    pub fn row(&mut self, sample: &Sample) -> io::Result<()> {
        writeln!(self.out, "{}\t{}", sample.size, sample.latency_ns)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
