//! Text helpers for proxy detection
//!
//! Two unrelated jobs live here: looking up `key : value` lines in the loose
//! dictionary dump printed by `scutil --proxy`, and pulling `host[:port]` out
//! of proxy URLs or bare `host:port` strings. Neither ever fails; a missing or
//! malformed input yields an empty string.

/// Value of the first line whose trimmed text starts with `"<key> :"`
///
/// Bracket and nesting lines are never interpreted, so truncated or
/// malformed dumps simply produce fewer matches.
pub fn value(text: &str, key: &str) -> String {
    let prefix = format!("{} :", key);
    text.lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|rest| rest.trim().to_string())
        .unwrap_or_default()
}

/// True if `key` is present with the value `1`
pub fn is_enabled(text: &str, key: &str) -> bool {
    value(text, key) == "1"
}

/// Extract the `host[:port]` authority from a URL or bare host string
///
/// Inputs without a scheme are treated as `http://<input>`. Credentials are
/// dropped. Returns an empty string when the input is empty or not a valid
/// URL authority.
pub fn host_of(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let (scheme, rest) = match raw.split_once("://") {
        Some(parts) => parts,
        None => ("http", raw),
    };
    if !valid_scheme(scheme) {
        return String::new();
    }

    let authority = rest
        .split(|c: char| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or("");
    // userinfo ends at the last '@'
    let host = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    if valid_host(host) {
        host.to_string()
    } else {
        String::new()
    }
}

/// Join host and port as `host:port`
///
/// An empty host yields an empty string; an empty or non-numeric port
/// yields the host alone.
pub fn join_host_port(host: &str, port: &str) -> String {
    let host = host.trim();
    let port = port.trim();
    if host.is_empty() {
        return String::new();
    }
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return host.to_string();
    }
    format!("{}:{}", host, port)
}

fn valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn valid_host(host: &str) -> bool {
    if host.is_empty() || host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    // Bracketed IPv6 literal, optionally followed by a port
    let port = if let Some(inner) = host.strip_prefix('[') {
        match inner.split_once(']') {
            Some((addr, after)) if !addr.is_empty() => match after {
                "" => return true,
                _ => match after.strip_prefix(':') {
                    Some(port) => port,
                    None => return false,
                },
            },
            _ => return false,
        }
    } else {
        // Only the text after the last ':' has to look like a port
        match host.rsplit_once(':') {
            Some((_, port)) => port,
            None => return true,
        }
    };

    port.bytes().all(|b| b.is_ascii_digit())
}
