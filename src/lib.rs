//! # Net Pulse (netpulse)
//!
//! A small Rust library that feeds a lightweight status widget with two
//! things: per-interface network throughput and whether an outbound proxy is
//! active.
//!
//! ## Features
//!
//! - **Throughput Sampling**: per-interface MB/s from cumulative OS counters,
//!   robust to irregular tick intervals and counter resets
//! - **Noise Filtering**: loopback, mesh, tunnel scaffolding and bridge
//!   interfaces never show up in the results
//! - **Trend History**: bounded aggregate rate history for sparklines
//! - **Proxy Detection**: environment variables, macOS system settings and an
//!   active-tunnel heuristic, evaluated in strict precedence order
//!
//! ## Quick Start
//!
//! ### Network Throughput
//!
//! ```no_run
//! use netpulse::counters::SystemCounters;
//! use netpulse::NetworkMonitor;
//! use std::time::{Duration, Instant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut source = SystemCounters::new();
//! let mut monitor = NetworkMonitor::new();
//!
//! monitor.sample(&mut source, Instant::now())?; // baseline
//! std::thread::sleep(Duration::from_secs(1));
//!
//! for iface in monitor.sample(&mut source, Instant::now())? {
//!     println!("{}: ↓{:.2} MB/s ↑{:.2} MB/s {}",
//!         iface.name,
//!         iface.rx_rate_mbps,
//!         iface.tx_rate_mbps,
//!         iface.ip.as_deref().unwrap_or("-")
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Proxy Detection
//!
//! ```no_run
//! use netpulse::ProxyDetector;
//!
//! let status = ProxyDetector::new().detect();
//! println!("proxy: {}", status);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Command-line polling tool (`netpulse`)
//!
//! ## Platform Support
//!
//! | Platform | Throughput | Env proxy | System proxy | Tunnel heuristic |
//! |----------|------------|-----------|--------------|------------------|
//! | Linux    | ✅         | ✅        | ❌           | ❌               |
//! | Windows  | ✅         | ✅        | ❌           | ❌               |
//! | macOS    | ✅         | ✅        | ✅           | ✅               |

pub mod config; // Configuration management with TOML persistence
pub mod counters; // Interface counter sources
pub mod error;
pub mod network_monitor; // Throughput rate engine
pub mod noise; // Virtual/loopback interface filter
pub mod proxy; // Proxy detection cascade
pub mod stats; // Combined network + proxy polling
pub mod trend; // Bounded rate history
mod utils;

pub use config::Config;
pub use counters::{CounterSource, InterfaceCounters, SystemCounters};
pub use error::{NetPulseError, Result};
pub use network_monitor::{NetworkMonitor, NetworkStatus};
pub use noise::{is_noise, NoiseFilter};
pub use proxy::{ProxyDetector, ProxyKind, ProxyStatus};
pub use stats::{NetPulse, StatusSnapshot};
pub use trend::TrendBuffer;
