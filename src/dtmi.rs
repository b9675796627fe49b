//! Device-model identifiers
//!
//! A DTMI has the shape `dtmi:<segment>(:<segment>)*;<major>(.<minor>)*`.
//! Segments start with a letter and continue with letters, digits or
//! underscores. The major version is a positive integer without leading
//! zeros.
//!
//! [`check`] never fails for malformed input; it returns a
//! [`DtmiCheck::Invalid`] carrying the reason.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::TwinError;

/// Fixed scheme prefix
pub const SCHEME: &str = "dtmi";

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

static MAJOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").unwrap());

static MINOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)$").unwrap());

/// Outcome of checking a string against the identifier grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DtmiCheck {
    Valid,
    Invalid(String),
}

impl DtmiCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, DtmiCheck::Valid)
    }

    /// The failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            DtmiCheck::Valid => None,
            DtmiCheck::Invalid(reason) => Some(reason),
        }
    }
}

/// Check a string against the identifier grammar.
pub fn check(id: &str) -> DtmiCheck {
    let Some(rest) = id
        .strip_prefix(SCHEME)
        .and_then(|r| r.strip_prefix(':'))
    else {
        return DtmiCheck::Invalid(format!("must start with '{}:'", SCHEME));
    };

    let Some((path, version)) = rest.split_once(';') else {
        return DtmiCheck::Invalid("missing ';' version separator".to_string());
    };

    if path.is_empty() {
        return DtmiCheck::Invalid("missing path segments".to_string());
    }

    for segment in path.split(':') {
        if segment.is_empty() {
            return DtmiCheck::Invalid("empty path segment".to_string());
        }
        if !SEGMENT_RE.is_match(segment) {
            return DtmiCheck::Invalid(format!(
                "segment '{}' must start with a letter and contain only letters, digits or '_'",
                segment
            ));
        }
    }

    if version.is_empty() {
        return DtmiCheck::Invalid("missing version".to_string());
    }

    let mut parts = version.split('.');
    let major = parts.next().unwrap_or_default();
    if !MAJOR_RE.is_match(major) {
        return DtmiCheck::Invalid(format!(
            "major version '{}' must be a positive integer without leading zeros",
            major
        ));
    }
    for minor in parts {
        if !MINOR_RE.is_match(minor) {
            return DtmiCheck::Invalid(format!(
                "version component '{}' must be a number without leading zeros",
                minor
            ));
        }
    }

    DtmiCheck::Valid
}

/// Convenience wrapper around [`check`]
pub fn is_valid(id: &str) -> bool {
    check(id).is_valid()
}

/// An identifier that is known to satisfy the grammar
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dtmi(String);

impl Dtmi {
    pub fn parse(id: impl Into<String>) -> Result<Self, TwinError> {
        let id = id.into();
        match check(&id) {
            DtmiCheck::Valid => Ok(Self(id)),
            DtmiCheck::Invalid(reason) => Err(TwinError::InvalidDtmi { id, reason }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments between the scheme and the version
    pub fn segments(&self) -> Vec<&str> {
        let rest = &self.0[SCHEME.len() + 1..];
        let path = rest.split_once(';').map(|(p, _)| p).unwrap_or(rest);
        path.split(':').collect()
    }

    /// Major version number
    pub fn major_version(&self) -> u64 {
        self.0
            .rsplit_once(';')
            .and_then(|(_, v)| v.split('.').next())
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Dtmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Dtmi {
    type Err = TwinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Dtmi {
    type Error = TwinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Dtmi> for String {
    fn from(dtmi: Dtmi) -> Self {
        dtmi.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dtmi:htc:context;1")]
    #[case("dtmi:com:example:Thermostat;1")]
    #[case("dtmi:a;10")]
    #[case("dtmi:com:example_1:Device2;3.0")]
    #[case("dtmi:com:example;2.10.4")]
    fn test_valid_identifiers(#[case] id: &str) {
        assert_eq!(check(id), DtmiCheck::Valid, "{} should be valid", id);
    }

    #[rstest]
    #[case("dtmi:")]
    #[case("dtmi:test")]
    #[case("dtmi:test;")]
    #[case("dtmi:test;0")]
    #[case("dtmi:123invalid;1")]
    #[case("dtmi:test;01")]
    #[case("dtmi:test;1.01")]
    #[case("dtmi:test::x;1")]
    #[case("dtmi:_x;1")]
    #[case("urn:test;1")]
    #[case("")]
    fn test_invalid_identifiers(#[case] id: &str) {
        let result = check(id);
        assert!(!result.is_valid(), "{} should be invalid", id);
        assert!(result.reason().is_some());
    }

    #[test]
    fn test_reason_names_bad_segment() {
        let result = check("dtmi:123invalid;1");
        assert!(result.reason().unwrap().contains("123invalid"));
    }

    #[test]
    fn test_dtmi_parts() {
        let dtmi: Dtmi = "dtmi:com:example:Thermostat;2.1".parse().unwrap();
        assert_eq!(dtmi.segments(), vec!["com", "example", "Thermostat"]);
        assert_eq!(dtmi.major_version(), 2);
    }

    #[test]
    fn test_dtmi_serde_rejects_invalid() {
        let ok: Dtmi = serde_json::from_str("\"dtmi:a:b;1\"").unwrap();
        assert_eq!(ok.as_str(), "dtmi:a:b;1");
        assert!(serde_json::from_str::<Dtmi>("\"dtmi:a\"").is_err());
    }
}
