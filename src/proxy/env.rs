//! Proxy settings exported through environment variables

use super::parse::host_of;
use super::{ProxyKind, ProxyStatus};

/// Variables checked, in precedence order
pub const ENV_KEYS: [&str; 6] = [
    "https_proxy",
    "HTTPS_PROXY",
    "http_proxy",
    "HTTP_PROXY",
    // Some proxy tools export only this one
    "all_proxy",
    "ALL_PROXY",
];

/// Detect a proxy from the first non-empty variable in [`ENV_KEYS`]
///
/// `getenv` is the variable lookup, usually a lossy `std::env::var_os`.
/// Values with a `socks*` scheme are reported as SOCKS, everything else as
/// HTTP. When no host can be extracted the trimmed raw value is used.
pub fn from_env<F>(getenv: F) -> Option<ProxyStatus>
where
    F: Fn(&str) -> Option<String>,
{
    ENV_KEYS.iter().find_map(|key| {
        let raw = getenv(key)?;
        let val = raw.trim();
        if val.is_empty() {
            return None;
        }

        let kind = if val.to_lowercase().starts_with("socks") {
            ProxyKind::Socks
        } else {
            ProxyKind::Http
        };

        let mut host = host_of(val);
        if host.is_empty() {
            host = val.to_string();
        }
        log::debug!("proxy from ${}: {} {}", key, kind, host);
        Some(ProxyStatus::new(kind, host))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| env.get(key).cloned()
    }

    #[test]
    fn test_all_proxy_socks() {
        let got = from_env(lookup(&[("ALL_PROXY", "socks5://127.0.0.1:7890")])).unwrap();
        assert!(got.enabled);
        assert_eq!(got.kind, ProxyKind::Socks);
        assert_eq!(got.host, "127.0.0.1:7890");
    }

    #[test]
    fn test_https_beats_http_and_all() {
        let got = from_env(lookup(&[
            ("ALL_PROXY", "socks5://10.0.0.1:1080"),
            ("http_proxy", "http://10.0.0.2:3128"),
            ("HTTPS_PROXY", "http://10.0.0.3:8443"),
        ]))
        .unwrap();
        assert_eq!(got.kind, ProxyKind::Http);
        assert_eq!(got.host, "10.0.0.3:8443");
    }

    #[test]
    fn test_lowercase_checked_before_uppercase() {
        let got = from_env(lookup(&[
            ("HTTP_PROXY", "http://upper:1"),
            ("http_proxy", "http://lower:2"),
        ]))
        .unwrap();
        assert_eq!(got.host, "lower:2");
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let got = from_env(lookup(&[
            ("https_proxy", "   "),
            ("http_proxy", ""),
            ("all_proxy", "SOCKS5H://gw:9050"),
        ]))
        .unwrap();
        assert_eq!(got.kind, ProxyKind::Socks);
        assert_eq!(got.host, "gw:9050");
    }

    #[test]
    fn test_bare_host_port() {
        let got = from_env(lookup(&[("http_proxy", "192.168.0.10:8080")])).unwrap();
        assert_eq!(got.kind, ProxyKind::Http);
        assert_eq!(got.host, "192.168.0.10:8080");
    }

    #[test]
    fn test_unparsable_value_falls_back_to_raw() {
        let got = from_env(lookup(&[("http_proxy", "  not a url  ")])).unwrap();
        assert_eq!(got.host, "not a url");
    }

    #[test]
    fn test_nothing_set() {
        assert!(from_env(lookup(&[])).is_none());
        assert!(from_env(lookup(&[("no_proxy", "localhost")])).is_none());
    }
}
