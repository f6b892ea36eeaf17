//! macOS system proxy settings via `scutil --proxy`

use super::parse::{host_of, is_enabled, join_host_port, value};
use super::{ProxyKind, ProxyStatus};
use crate::utils::command::output_with_timeout;
use std::time::Duration;

/// Whether this platform ships `scutil`
pub const SUPPORTED: bool = cfg!(target_os = "macos");

/// Manual proxies in precedence order: (kind, enable key, host key, port key)
const MANUAL: [(ProxyKind, &str, &str, &str); 3] = [
    (ProxyKind::Socks, "SOCKSEnable", "SOCKSProxy", "SOCKSPort"),
    (ProxyKind::Https, "HTTPSEnable", "HTTPSProxy", "HTTPSPort"),
    (ProxyKind::Http, "HTTPEnable", "HTTPProxy", "HTTPPort"),
];

/// Run `scutil --proxy`, giving up after `timeout`
///
/// Any failure, including the timeout, is logged and reported as no output.
pub fn query(timeout: Duration) -> Option<String> {
    match output_with_timeout("scutil", &["--proxy"], timeout) {
        Ok(out) => Some(out),
        Err(e) => {
            log::warn!("system proxy query skipped: {}", e);
            None
        }
    }
}

/// Interpret a `scutil --proxy` dump
///
/// SOCKS, HTTPS and HTTP are checked first, then PAC, then WPAD. Empty or
/// malformed dumps yield `None`.
pub fn from_scutil_output(out: &str) -> Option<ProxyStatus> {
    if out.trim().is_empty() {
        return None;
    }

    for (kind, enable, host_key, port_key) in MANUAL {
        if is_enabled(out, enable) {
            let mut host = join_host_port(&value(out, host_key), &value(out, port_key));
            if host.is_empty() {
                host = "System Proxy".to_string();
            }
            return Some(ProxyStatus::new(kind, host));
        }
    }

    if is_enabled(out, "ProxyAutoConfigEnable") {
        let mut host = host_of(&value(out, "ProxyAutoConfigURLString"));
        if host.is_empty() {
            host = "PAC".to_string();
        }
        return Some(ProxyStatus::new(ProxyKind::Pac, host));
    }

    if is_enabled(out, "ProxyAutoDiscoveryEnable") {
        return Some(ProxyStatus::new(ProxyKind::Wpad, "Auto Discovery"));
    }

    None
}
