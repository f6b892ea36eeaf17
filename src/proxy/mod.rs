//! Outbound Proxy Detection
//!
//! Detection runs a fixed cascade and stops at the first stage that reports
//! a proxy:
//!
//! 1. environment variables ([`env`])
//! 2. the OS system proxy settings ([`scutil`], macOS only)
//! 3. active tunnel interfaces ([`tunnel`], macOS only)
//!
//! Explicit configuration is trusted over OS settings, and OS settings over
//! the tunnel heuristic. Signals are never merged across stages.
//!
//! # Example
//!
//! ```no_run
//! use netpulse::ProxyDetector;
//!
//! let status = ProxyDetector::new().detect();
//! if status.enabled {
//!     println!("proxy: {} {}", status.kind, status.host);
//! }
//! ```

pub mod env;
pub mod parse;
pub mod scutil;
pub mod tunnel;

use crate::config::ProxyConfig;
use crate::counters::{CounterSource, InterfaceCounters, SystemCounters};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of proxy that was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProxyKind {
    #[serde(rename = "HTTP")]
    Http,
    #[serde(rename = "HTTPS")]
    Https,
    #[serde(rename = "SOCKS")]
    Socks,
    /// Proxy auto-configuration script
    #[serde(rename = "PAC")]
    Pac,
    /// Web proxy auto-discovery
    #[serde(rename = "WPAD")]
    Wpad,
    /// Traffic routed through a tunnel interface
    #[serde(rename = "TUN")]
    Tun,
    #[default]
    #[serde(rename = "none")]
    None,
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProxyKind::Http => "HTTP",
            ProxyKind::Https => "HTTPS",
            ProxyKind::Socks => "SOCKS",
            ProxyKind::Pac => "PAC",
            ProxyKind::Wpad => "WPAD",
            ProxyKind::Tun => "TUN",
            ProxyKind::None => "none",
        };
        f.write_str(s)
    }
}

/// Result of one detection pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProxyStatus {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: ProxyKind,
    /// `host[:port]`, tunnel name, or a placeholder such as "PAC"
    pub host: String,
}

impl ProxyStatus {
    /// An affirmative detection
    pub fn new(kind: ProxyKind, host: impl Into<String>) -> Self {
        Self {
            enabled: true,
            kind,
            host: host.into(),
        }
    }

    /// No proxy detected
    pub fn disabled() -> Self {
        Self::default()
    }
}

impl fmt::Display for ProxyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "{} {}", self.kind, self.host)
        } else {
            f.write_str("none")
        }
    }
}

/// Run the detection cascade over the given inputs
///
/// Each stage is evaluated only if every earlier stage deferred:
/// `getenv` looks up environment variables, `query` returns the
/// `scutil --proxy` dump and `tunnel_counters` returns fresh interface
/// counters. When `system_stages` is false only the environment is
/// consulted.
pub fn resolve<E, Q, C>(
    getenv: E,
    query: Q,
    tunnel_counters: C,
    system_stages: bool,
) -> ProxyStatus
where
    E: Fn(&str) -> Option<String>,
    Q: FnOnce() -> Option<String>,
    C: FnOnce() -> Option<Vec<InterfaceCounters>>,
{
    let status = env::from_env(getenv)
        .or_else(|| {
            system_stages
                .then(query)
                .flatten()
                .and_then(|out| scutil::from_scutil_output(&out))
        })
        .or_else(|| {
            system_stages
                .then(tunnel_counters)
                .flatten()
                .and_then(|counters| tunnel::from_tunnels(&counters))
        })
        .unwrap_or_else(ProxyStatus::disabled);

    debug!("proxy detection: {}", status);
    status
}

/// Environment lookup that keeps non-UTF-8 values, lossily decoded
fn process_env(key: &str) -> Option<String> {
    std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

/// Proxy detector wired to the process environment and the OS
pub struct ProxyDetector {
    config: ProxyConfig,
    getenv: fn(&str) -> Option<String>,
}

impl ProxyDetector {
    /// Create a detector with default settings
    pub fn new() -> Self {
        Self::with_config(ProxyConfig::default())
    }

    pub fn with_config(config: ProxyConfig) -> Self {
        Self {
            config,
            getenv: process_env,
        }
    }

    /// Replace the environment lookup
    pub fn with_env_lookup(mut self, getenv: fn(&str) -> Option<String>) -> Self {
        self.getenv = getenv;
        self
    }

    /// True if the OS query and tunnel stages run on this platform
    pub fn system_stages(&self) -> bool {
        self.config.system_query && scutil::SUPPORTED
    }

    /// Run one detection pass, reading tunnel counters from the OS
    pub fn detect(&self) -> ProxyStatus {
        self.resolve_with(|| SystemCounters::new().counters().ok())
    }

    /// Run one detection pass, reading tunnel counters from `source`
    pub fn detect_with<S>(&self, source: &mut S) -> ProxyStatus
    where
        S: CounterSource + ?Sized,
    {
        self.resolve_with(|| match source.counters() {
            Ok(counters) => Some(counters),
            Err(e) => {
                debug!("tunnel check skipped: {}", e);
                None
            }
        })
    }

    fn resolve_with<C>(&self, tunnel_counters: C) -> ProxyStatus
    where
        C: FnOnce() -> Option<Vec<InterfaceCounters>>,
    {
        let timeout = self.config.query_timeout();
        resolve(
            self.getenv,
            || scutil::query(timeout),
            tunnel_counters,
            self.system_stages(),
        )
    }
}

impl Default for ProxyDetector {
    fn default() -> Self {
        Self::new()
    }
}
