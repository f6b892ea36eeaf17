//! Combined network and proxy status collection

use crate::config::Config;
use crate::counters::{CounterSource, SystemCounters};
use crate::error::Result;
use crate::network_monitor::{NetworkMonitor, NetworkStatus};
use crate::proxy::{ProxyDetector, ProxyStatus};
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Everything a status widget renders for one polling cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Busiest interfaces, at most three, busiest first
    pub networks: Vec<NetworkStatus>,
    /// Most recent proxy detection result
    pub proxy: ProxyStatus,
    /// Aggregate receive rate history, oldest first (MB/s)
    pub rx_history: Vec<f64>,
    /// Aggregate transmit rate history, oldest first (MB/s)
    pub tx_history: Vec<f64>,
}

/// Main Net Pulse interface
///
/// Owns one sampling session: the counter source, the throughput monitor and
/// the proxy detector. The proxy cascade may shell out, so it is re-run only
/// every `proxy.poll_interval_ms` and its last result is reused in between.
pub struct NetPulse<S: CounterSource = SystemCounters> {
    source: S,
    monitor: NetworkMonitor,
    detector: ProxyDetector,
    proxy: ProxyStatus,
    last_proxy_check: Option<Instant>,
    interval: Duration,
    proxy_interval: Duration,
}

impl NetPulse<SystemCounters> {
    /// Create a new instance reading the OS counters
    ///
    /// # Example
    ///
    /// ```no_run
    /// use netpulse::NetPulse;
    /// use std::time::Instant;
    ///
    /// let mut pulse = NetPulse::new();
    /// let snapshot = pulse.snapshot(Instant::now()).unwrap();
    /// println!("proxy: {}", snapshot.proxy);
    /// ```
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self::with_source(SystemCounters::new(), config)
    }
}

impl Default for NetPulse<SystemCounters> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CounterSource> NetPulse<S> {
    /// Create an instance over a custom counter source
    pub fn with_source(source: S, config: &Config) -> Self {
        Self {
            source,
            monitor: NetworkMonitor::with_config(&config.sampling),
            detector: ProxyDetector::with_config(config.proxy.clone()),
            proxy: ProxyStatus::disabled(),
            last_proxy_check: None,
            interval: config.sampling.interval(),
            proxy_interval: config.proxy.poll_interval(),
        }
    }

    /// Replace the proxy detector
    pub fn with_detector(mut self, detector: ProxyDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Run one polling cycle
    ///
    /// Fails only when the interface counters cannot be read; the caller
    /// should show "no data" and try again next tick. The very first cycle
    /// reports no interfaces because it only stores the baseline.
    pub fn snapshot(&mut self, now: Instant) -> Result<StatusSnapshot> {
        let networks = self.monitor.sample(&mut self.source, now).map_err(|e| {
            warn!("network metrics unavailable this tick: {}", e);
            e
        })?;
        let proxy = self.proxy_status(now).clone();

        Ok(StatusSnapshot {
            networks,
            proxy,
            rx_history: self.monitor.rx_history().to_vec(),
            tx_history: self.monitor.tx_history().to_vec(),
        })
    }

    /// Proxy status, re-detected when the poll interval has elapsed
    pub fn proxy_status(&mut self, now: Instant) -> &ProxyStatus {
        let due = match self.last_proxy_check {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.proxy_interval,
        };
        if due {
            self.refresh_proxy(now);
        }
        &self.proxy
    }

    /// Run the proxy cascade now, regardless of the poll interval
    pub fn refresh_proxy(&mut self, now: Instant) -> &ProxyStatus {
        self.proxy = self.detector.detect_with(&mut self.source);
        self.last_proxy_check = Some(now);
        &self.proxy
    }

    /// Configured sampling interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn monitor(&self) -> &NetworkMonitor {
        &self.monitor
    }
}
