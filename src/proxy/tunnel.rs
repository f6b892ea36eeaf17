//! Active tunnel heuristic
//!
//! VPN and TUN-mode proxy clients route traffic through `utun*`/`tun*`
//! interfaces without touching any proxy setting. A tunnel that has carried
//! traffic is taken as a sign that one of them is running.

use super::{ProxyKind, ProxyStatus};
use crate::counters::InterfaceCounters;

fn is_tunnel(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.starts_with("utun") || lower.starts_with("tun")
}

/// Report the lexicographically first active tunnel, suffixed with `+` when
/// more than one is active
pub fn from_tunnels(counters: &[InterfaceCounters]) -> Option<ProxyStatus> {
    let mut active: Vec<&str> = counters
        .iter()
        .filter(|c| is_tunnel(&c.name) && c.has_traffic())
        .map(|c| c.name.as_str())
        .collect();

    active.sort_unstable();
    let first = active.first()?;
    let host = if active.len() > 1 {
        format!("{}+", first)
    } else {
        first.to_string()
    };
    Some(ProxyStatus::new(ProxyKind::Tun, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(name: &str, rx: u64, tx: u64) -> InterfaceCounters {
        InterfaceCounters::new(name, rx, tx)
    }

    #[test]
    fn test_two_active_tunnels() {
        let got = from_tunnels(&[c("en0", 10, 10), c("utun3", 5, 0), c("utun1", 0, 7)]).unwrap();
        assert!(got.enabled);
        assert_eq!(got.kind, ProxyKind::Tun);
        assert_eq!(got.host, "utun1+");
    }

    #[test]
    fn test_single_tunnel() {
        let got = from_tunnels(&[c("utun0", 0, 0), c("tun0", 1, 1)]).unwrap();
        assert_eq!(got.host, "tun0");
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let got = from_tunnels(&[c("UTUN4", 3, 0)]).unwrap();
        assert_eq!(got.host, "UTUN4");
    }

    #[test]
    fn test_idle_or_absent_tunnels() {
        assert!(from_tunnels(&[c("utun0", 0, 0), c("utun1", 0, 0)]).is_none());
        assert!(from_tunnels(&[c("en0", 100, 100), c("lo0", 5, 5)]).is_none());
        assert!(from_tunnels(&[]).is_none());
    }
}
