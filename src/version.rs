// src/version.rs

//! Server version parsing and threshold comparison.
//!
//! The analysis server reports its version as a dotted string such as
//! `"5.1"`, `"4.5.2"` or `"6.7-SNAPSHOT"`. Only the leading numeric
//! components matter for capability gating. Anything we cannot read is
//! treated as older than every threshold, so the most conservative
//! behaviour is picked.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Leading dotted numeric part of a version string (qualifiers are ignored).
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)*)").expect("static version regex is valid")
});

/// Result of comparing a server version against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrdering {
    Older,
    SameOrNewer,
}

/// A `major.minor` threshold the server version is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionThreshold {
    pub major: u64,
    pub minor: u64,
}

impl VersionThreshold {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for VersionThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// First server release that understands the current extension convention.
pub const EXTENSIONS_CURRENT_CONVENTION: VersionThreshold = VersionThreshold::new(4, 5);

/// First server release that resolves its own extensions.
pub const SERVER_SIDE_EXTENSIONS: VersionThreshold = VersionThreshold::new(5, 2);

/// Parsed server version.
///
/// `components` is `None` when the reported version was absent or could not
/// be parsed; such a version is older than any threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVersion {
    raw: Option<String>,
    components: Option<Vec<u64>>,
}

impl ServerVersion {
    pub fn parse(raw: Option<&str>) -> Self {
        let components = raw.and_then(parse_components);
        Self {
            raw: raw.map(str::to_string),
            components,
        }
    }

    /// The string reported by the server, if any.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Numeric components, if the version could be parsed.
    pub fn components(&self) -> Option<&[u64]> {
        self.components.as_deref()
    }

    pub fn is_known(&self) -> bool {
        self.components.is_some()
    }

    /// Compare against `major.minor`. Missing components count as `0`.
    pub fn compare(&self, threshold: VersionThreshold) -> VersionOrdering {
        let Some(parts) = self.components.as_deref() else {
            return VersionOrdering::Older;
        };

        let major = parts.first().copied().unwrap_or(0);
        let minor = parts.get(1).copied().unwrap_or(0);

        match (major, minor).cmp(&(threshold.major, threshold.minor)) {
            Ordering::Less => VersionOrdering::Older,
            Ordering::Equal | Ordering::Greater => VersionOrdering::SameOrNewer,
        }
    }

    pub fn is_prior_to(&self, threshold: VersionThreshold) -> bool {
        self.compare(threshold) == VersionOrdering::Older
    }

    pub fn is_prior_to_4_5(&self) -> bool {
        self.is_prior_to(EXTENSIONS_CURRENT_CONVENTION)
    }

    pub fn is_prior_to_5_2(&self) -> bool {
        self.is_prior_to(SERVER_SIDE_EXTENSIONS)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.raw, &self.components) {
            (Some(raw), Some(_)) => write!(f, "{raw}"),
            (Some(raw), None) => write!(f, "{raw} (unparseable)"),
            (None, _) => write!(f, "<unknown>"),
        }
    }
}

/// Compare a raw server version string against `major.minor`.
pub fn compare(server_version: Option<&str>, major: u64, minor: u64) -> VersionOrdering {
    ServerVersion::parse(server_version).compare(VersionThreshold::new(major, minor))
}

fn parse_components(raw: &str) -> Option<Vec<u64>> {
    let caps = NUMERIC_PREFIX.captures(raw)?;
    caps.get(1)?
        .as_str()
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}
