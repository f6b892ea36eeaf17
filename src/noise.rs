//! Interface noise filtering
//!
//! Loopback, peer-to-peer Wi-Fi mesh, tunnel scaffolding and other virtual
//! interfaces the platform creates on its own carry traffic nobody wants on a
//! throughput widget. They are recognised purely by name prefix.

/// Built-in noise prefixes, matched case-insensitively against the start of
/// an interface name.
pub const NOISE_PREFIXES: &[&str] = &[
    "lo",     // loopback
    "awdl",   // Apple Wireless Direct Link (peer-to-peer mesh)
    "utun",   // user-space tunnel scaffolding
    "llw",    // low-latency WLAN
    "bridge", // bridging
    "gif",    // generic tunnel
    "stf",    // 6to4
    "xhc",    // USB host controller
    "anpi",   // Apple network processor interface
    "ap",     // access point / personal hotspot
];

/// True if `name` is a loopback or virtual interface that should never be
/// reported.
pub fn is_noise(name: &str) -> bool {
    let lower = name.to_lowercase();
    NOISE_PREFIXES.iter().any(|prefix| lower.starts_with(prefix))
}

/// Noise predicate extended with configured prefixes
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    extra: Vec<String>,
}

impl NoiseFilter {
    /// Filter using only [`NOISE_PREFIXES`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter using [`NOISE_PREFIXES`] plus `extra`
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// True if `name` matches a built-in or configured prefix
    pub fn is_noise(&self, name: &str) -> bool {
        if is_noise(name) {
            return true;
        }
        let lower = name.to_lowercase();
        self.extra.iter().any(|prefix| lower.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_prefixes() {
        for name in [
            "lo", "lo0", "awdl0", "utun3", "llw0", "bridge100", "gif0", "stf0", "anpi1", "ap1",
        ] {
            assert!(is_noise(name), "{} should be noise", name);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_noise("LO0"));
        assert!(is_noise("Utun2"));
        assert!(is_noise("XHC20"));
    }

    #[test]
    fn test_physical_interfaces_pass() {
        for name in ["en0", "eth0", "wlan0", "enp3s0", "Ethernet", "Wi-Fi"] {
            assert!(!is_noise(name), "{} should not be noise", name);
        }
    }

    #[test]
    fn test_extra_prefixes() {
        let filter = NoiseFilter::with_extra(["Docker", " vmnet ", ""]);
        assert!(filter.is_noise("docker0"));
        assert!(filter.is_noise("vmnet8"));
        assert!(filter.is_noise("lo"));
        assert!(!filter.is_noise("en0"));
        assert!(!NoiseFilter::new().is_noise("docker0"));
    }
}
