//! The sequence of payload sizes a benchmark run walks through.

/// Which payload sizes to benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizes {
    /// `0`, then every power of two from `1` up to and including `max`.
    Sweep { max: u64 },
    /// Exactly one size.
    Single(u64),
}

impl Sizes {
    pub fn iter(&self) -> SizeSeries {
        match *self {
            Sizes::Sweep { max } => SizeSeries {
                next: Some(0),
                max,
                single: false,
            },
            Sizes::Single(size) => SizeSeries {
                next: Some(size),
                max: size,
                single: true,
            },
        }
    }

    /// The largest size the series produces.
    pub fn largest(&self) -> u64 {
        match *self {
            Sizes::Sweep { max } if max == 0 => 0,
            Sizes::Sweep { max } => 1 << max.ilog2(),
            Sizes::Single(size) => size,
        }
    }
}

impl IntoIterator for Sizes {
    type Item = u64;
    type IntoIter = SizeSeries;

    fn into_iter(self) -> SizeSeries {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SizeSeries {
    next: Option<u64>,
    max: u64,
    single: bool,
}

impl Iterator for SizeSeries {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next.filter(|size| *size <= self.max)?;
        self.next = match current {
            _ if self.single => None,
            // Doubling zero never terminates, so the sweep restarts at one.
            0 => Some(1),
            size => size.checked_mul(2),
        };
        Some(current)
    }
}
