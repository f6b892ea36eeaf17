//! Network Throughput Monitoring
//!
//! The [`NetworkMonitor`] turns cumulative per-interface byte counters into
//! receive/transmit rates by comparing each snapshot against the one taken on
//! the previous tick. Only the busiest few interfaces are reported, and the
//! aggregate of those is appended to two short trend buffers.
//!
//! # Examples
//!
//! ```no_run
//! use netpulse::counters::SystemCounters;
//! use netpulse::NetworkMonitor;
//! use std::time::{Duration, Instant};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = SystemCounters::new();
//! let mut monitor = NetworkMonitor::new();
//!
//! // First tick only establishes the baseline
//! assert!(monitor.sample(&mut source, Instant::now())?.is_empty());
//! thread::sleep(Duration::from_secs(1));
//!
//! for iface in monitor.sample(&mut source, Instant::now())? {
//!     println!("{}: ↓{:.2} MB/s ↑{:.2} MB/s",
//!         iface.name, iface.rx_rate_mbps, iface.tx_rate_mbps);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Rate rules
//!
//! - Rates are MB/s with 1 MB = 1,048,576 bytes.
//! - A counter that went backwards (interface reset or replaced) reports 0 for
//!   that tick instead of a negative rate. A genuine discontinuity therefore
//!   shows up as a single zero-rate sample.
//! - An elapsed time of zero (or a clock that went backwards) counts as one
//!   second.
//! - Interfaces present in only one of the two snapshots are skipped until
//!   two consecutive snapshots contain them.

use crate::config::SamplingConfig;
use crate::counters::{CounterSource, InterfaceCounters, Snapshot};
use crate::error::Result;
use crate::noise::NoiseFilter;
use crate::trend::TrendBuffer;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Upper bound on interfaces reported per tick
pub const MAX_REPORTED: usize = 3;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Throughput of one interface over the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    /// Interface name
    pub name: String,
    /// Receive rate in MB/s
    pub rx_rate_mbps: f64,
    /// Transmit rate in MB/s
    pub tx_rate_mbps: f64,
    /// First non-loopback IPv4 address, if the interface has one
    pub ip: Option<String>,
}

impl NetworkStatus {
    /// Combined receive + transmit rate, the ranking key
    pub fn total_rate(&self) -> f64 {
        self.rx_rate_mbps + self.tx_rate_mbps
    }
}

/// Rate of change between two cumulative counter readings, in MB/s
///
/// `elapsed_secs` must be positive. A counter that regressed yields 0.
pub fn rate_mbps(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    current.saturating_sub(previous) as f64 / BYTES_PER_MB / elapsed_secs
}

/// Network monitor for tracking interface throughput
///
/// Each monitor keeps exactly one previous snapshot, so independent monitors
/// never interfere with each other.
pub struct NetworkMonitor {
    /// Snapshot from the last tick, `None` until the first tick
    previous: Option<Snapshot>,
    noise: NoiseFilter,
    top_n: usize,
    rx_history: TrendBuffer,
    tx_history: TrendBuffer,
}

impl NetworkMonitor {
    /// Create a monitor with default settings
    pub fn new() -> Self {
        Self::with_config(&SamplingConfig::default())
    }

    /// Create a monitor from sampling configuration
    pub fn with_config(config: &SamplingConfig) -> Self {
        Self {
            previous: None,
            noise: NoiseFilter::with_extra(&config.extra_noise_prefixes),
            top_n: config.top_interfaces.clamp(1, MAX_REPORTED),
            rx_history: TrendBuffer::new(config.trend_capacity),
            tx_history: TrendBuffer::new(config.trend_capacity),
        }
    }

    /// Read `source` and run one tick
    ///
    /// The only error is a failed counter read, in which case the stored
    /// baseline is left untouched and the caller should retry next tick.
    pub fn sample<S>(&mut self, source: &mut S, now: Instant) -> Result<Vec<NetworkStatus>>
    where
        S: CounterSource + ?Sized,
    {
        let counters = source.counters()?;
        let addresses = source.addresses();
        Ok(self.update(now, counters, &addresses))
    }

    /// Run one tick against an already captured set of counters
    ///
    /// The first call after construction or [`reset`](Self::reset) stores the
    /// baseline and returns nothing. Every call replaces the stored snapshot.
    pub fn update(
        &mut self,
        now: Instant,
        counters: Vec<InterfaceCounters>,
        addresses: &HashMap<String, String>,
    ) -> Vec<NetworkStatus> {
        let current = Snapshot::new(now, counters);

        let statuses = match self.previous.take() {
            None => {
                debug!(
                    "network baseline stored ({} interfaces)",
                    current.counters.len()
                );
                Vec::new()
            }
            Some(previous) => {
                let mut statuses = self.rank(&previous, &current);
                for status in &mut statuses {
                    status.ip = addresses.get(&status.name).cloned();
                }

                let total_rx: f64 = statuses.iter().map(|s| s.rx_rate_mbps).sum();
                let total_tx: f64 = statuses.iter().map(|s| s.tx_rate_mbps).sum();
                self.rx_history.push(total_rx);
                self.tx_history.push(total_tx);

                statuses
            }
        };

        self.previous = Some(current);
        statuses
    }

    /// Compute, sort and truncate rates between two snapshots
    fn rank(&self, previous: &Snapshot, current: &Snapshot) -> Vec<NetworkStatus> {
        let elapsed = match current.taken_at.checked_duration_since(previous.taken_at) {
            Some(d) if d.as_secs_f64() > 0.0 => d.as_secs_f64(),
            _ => {
                debug!("non-positive sampling interval, assuming 1s");
                1.0
            }
        };

        let prev_by_name: HashMap<&str, &InterfaceCounters> = previous
            .counters
            .iter()
            .map(|c| (c.name.as_str(), c))
            .collect();

        let mut statuses: Vec<NetworkStatus> = current
            .counters
            .iter()
            .filter(|cur| !self.noise.is_noise(&cur.name))
            .filter_map(|cur| {
                let prev = prev_by_name.get(cur.name.as_str())?;
                Some(NetworkStatus {
                    name: cur.name.clone(),
                    rx_rate_mbps: rate_mbps(prev.rx_bytes, cur.rx_bytes, elapsed),
                    tx_rate_mbps: rate_mbps(prev.tx_bytes, cur.tx_bytes, elapsed),
                    ip: None,
                })
            })
            .collect();

        // Stable sort: ties keep enumeration order
        statuses.sort_by(|a, b| b.total_rate().total_cmp(&a.total_rate()));
        statuses.truncate(self.top_n);
        statuses
    }

    /// Forget the baseline; the next tick is a warm-up again
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// True once a baseline snapshot is stored
    pub fn has_baseline(&self) -> bool {
        self.previous.is_some()
    }

    /// Aggregate receive rate history (MB/s)
    pub fn rx_history(&self) -> &TrendBuffer {
        &self.rx_history
    }

    /// Aggregate transmit rate history (MB/s)
    pub fn tx_history(&self) -> &TrendBuffer {
        &self.tx_history
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}
