//! Per-interface byte counters
//!
//! A [`CounterSource`] hands out the cumulative receive/transmit byte counters
//! of every network interface, plus a separate interface → IPv4 address map.
//! [`SystemCounters`] is the OS-backed implementation built on `sysinfo`;
//! tests substitute their own.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Instant;
use sysinfo::Networks;

/// Cumulative counters of one interface at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    /// Interface name (e.g., "en0", "eth0", "utun3")
    pub name: String,
    /// Bytes received since the counter was last reset
    pub rx_bytes: u64,
    /// Bytes sent since the counter was last reset
    pub tx_bytes: u64,
}

impl InterfaceCounters {
    pub fn new(name: impl Into<String>, rx_bytes: u64, tx_bytes: u64) -> Self {
        Self {
            name: name.into(),
            rx_bytes,
            tx_bytes,
        }
    }

    /// True once the interface has moved any traffic at all
    pub fn has_traffic(&self) -> bool {
        self.rx_bytes.saturating_add(self.tx_bytes) > 0
    }
}

/// One point-in-time capture of every interface's counters
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// When the counters were read
    pub taken_at: Instant,
    /// Counters in enumeration order
    pub counters: Vec<InterfaceCounters>,
}

impl Snapshot {
    pub fn new(taken_at: Instant, counters: Vec<InterfaceCounters>) -> Self {
        Self { taken_at, counters }
    }

    /// Look up one interface by exact name
    pub fn get(&self, name: &str) -> Option<&InterfaceCounters> {
        self.counters.iter().find(|c| c.name == name)
    }
}

/// Supplier of interface counters and addresses
pub trait CounterSource {
    /// Read the cumulative counters of every interface
    ///
    /// An empty list is a valid reading; only a failed read is an error.
    fn counters(&mut self) -> Result<Vec<InterfaceCounters>>;

    /// Map interface name to its first non-loopback IPv4 address
    ///
    /// Enumeration problems yield an empty map rather than an error.
    fn addresses(&mut self) -> HashMap<String, String>;
}

/// [`CounterSource`] backed by the operating system via `sysinfo`
pub struct SystemCounters {
    networks: Networks,
}

impl SystemCounters {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SystemCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SystemCounters {
    fn counters(&mut self) -> Result<Vec<InterfaceCounters>> {
        // true = forget interfaces that disappeared since the last refresh
        self.networks.refresh(true);

        Ok(sorted_counters(self.networks.iter().map(|(name, data)| {
            InterfaceCounters::new(
                name.clone(),
                data.total_received(),
                data.total_transmitted(),
            )
        })))
    }

    fn addresses(&mut self) -> HashMap<String, String> {
        self.networks
            .iter()
            .filter_map(|(name, data)| {
                first_ipv4(data.ip_networks().iter().map(|net| net.addr))
                    .map(|ip| (name.clone(), ip))
            })
            .collect()
    }
}

/// Collect counters ordered by interface name
///
/// `sysinfo` hands interfaces out in hash order; sorting keeps tie-breaking
/// in the rate ranking reproducible.
fn sorted_counters<I>(counters: I) -> Vec<InterfaceCounters>
where
    I: IntoIterator<Item = InterfaceCounters>,
{
    let mut counters: Vec<InterfaceCounters> = counters.into_iter().collect();
    counters.sort_by(|a, b| a.name.cmp(&b.name));
    counters
}

/// First IPv4 address outside 127.0.0.0/8, rendered without prefix length
pub fn first_ipv4<I>(addrs: I) -> Option<String>
where
    I: IntoIterator<Item = IpAddr>,
{
    addrs.into_iter().find_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4.to_string()),
        _ => None,
    })
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted [`CounterSource`]: each `counters()` call pops the next
    /// prepared result; the last one repeats once the script runs out.
    pub struct ScriptedCounters {
        script: VecDeque<Result<Vec<InterfaceCounters>>>,
        last: Vec<InterfaceCounters>,
        pub addresses: HashMap<String, String>,
        pub calls: usize,
    }

    impl ScriptedCounters {
        pub fn new(script: Vec<Result<Vec<InterfaceCounters>>>) -> Self {
            Self {
                script: script.into(),
                last: Vec::new(),
                addresses: HashMap::new(),
                calls: 0,
            }
        }

        pub fn fixed(counters: Vec<InterfaceCounters>) -> Self {
            Self::new(vec![Ok(counters)])
        }
    }

    impl CounterSource for ScriptedCounters {
        fn counters(&mut self) -> Result<Vec<InterfaceCounters>> {
            self.calls += 1;
            match self.script.pop_front() {
                Some(Ok(counters)) => {
                    self.last = counters.clone();
                    Ok(counters)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self.last.clone()),
            }
        }

        fn addresses(&mut self) -> HashMap<String, String> {
            self.addresses.clone()
        }
    }
}
