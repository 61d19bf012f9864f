use std::cmp::Ordering;
use std::fmt;

/// Compare two dotted version strings by numeric components.
///
/// Each input is split on `'.'` and every component parsed as a non-negative
/// integer; comparison is component-wise, with missing trailing components
/// treated as 0 (so `"1.2"` and `"1.2.0"` compare as numerically equal).
/// Numerically equal but textually different inputs are tie-broken by raw
/// string order, which keeps the ordering strict: distinct keys never
/// compare equal.
///
/// If any component of either input fails to parse, the comparison falls back
/// to raw string order for both. That leniency is deliberate: malformed
/// versions still sort consistently instead of being rejected.
pub fn version_cmp(a: &str, b: &str) -> Ordering {
    match (parse_components(a), parse_components(b)) {
        (Some(left), Some(right)) => {
            let len = left.len().max(right.len());
            for i in 0..len {
                let l = left.get(i).copied().unwrap_or(0);
                let r = right.get(i).copied().unwrap_or(0);
                match l.cmp(&r) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            a.cmp(b)
        }
        _ => a.cmp(b),
    }
}

fn parse_components(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|component| component.parse::<u64>().ok())
        .collect()
}

/// Version string usable as an ordered map key: `Ord` is [`version_cmp`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionKey(String);

impl VersionKey {
    pub fn new(version: impl Into<String>) -> Self {
        VersionKey(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        version_cmp(&self.0, &other.0)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionKey {
    fn from(version: &str) -> Self {
        VersionKey::new(version)
    }
}

impl From<String> for VersionKey {
    fn from(version: String) -> Self {
        VersionKey(version)
    }
}
