//! Module version parsing and ordering.
//!
//! PowerShell module versions are dotted numeric strings that may carry
//! more than three components (`1.2.3.4`) and an optional prerelease
//! label (`3.0.0-preview2`). Ordering is numeric per component; missing
//! trailing components count as zero, and a prerelease sorts below the
//! matching release.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+(?:-[0-9A-Za-z][0-9A-Za-z.]*)?").unwrap());

/// A parsed module version.
#[derive(Debug, Clone)]
pub struct ModuleVersion {
    raw: String,
    components: Vec<u64>,
    prerelease: Option<String>,
}

impl ModuleVersion {
    /// Numeric components in order.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Prerelease label, if any.
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// The version as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

/// Error returned when a string is not a dotted numeric version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError(String);

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a module version: '{}'", self.0)
    }
}

impl std::error::Error for VersionParseError {}

impl FromStr for ModuleVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let (numbers, prerelease) = match body.split_once('-') {
            Some((n, pre)) if !pre.is_empty() => (n, Some(pre.to_string())),
            Some(_) => return Err(VersionParseError(s.to_string())),
            None => (body, None),
        };

        let components = numbers
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionParseError(s.to_string()))?;

        if components.is_empty() {
            return Err(VersionParseError(s.to_string()));
        }

        Ok(Self {
            raw: body.to_string(),
            components,
            prerelease,
        })
    }
}

impl Ord for ModuleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        for i in 0..width {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }

        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => compare_prerelease(a, b),
        }
    }
}

/// Compare prerelease labels identifier by identifier.
///
/// Numeric identifiers compare as numbers and rank below alphanumeric
/// ones; when one label is a prefix of the other, the shorter ranks lower.
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (x.parse::<u64>(), y.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => x.cmp(y),
            },
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

impl PartialOrd for ModuleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ModuleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ModuleVersion {}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ModuleVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Extract the first version-looking token from command output.
///
/// Returns `None` for empty output or output without a dotted version,
/// which is how "not installed" and "not published" come back from the
/// package manager.
pub fn extract_version(output: &str) -> Option<ModuleVersion> {
    VERSION_REGEX
        .find(output)
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract every version-looking token from command output, in order.
pub fn extract_versions(output: &str) -> Vec<ModuleVersion> {
    VERSION_REGEX
        .find_iter(output)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
