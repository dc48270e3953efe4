//! Core type definitions: dotted paths and their segments
//!
//! Key design principles:
//! 1. Parse once, traverse many times
//! 2. Use SmallVec for segments (most paths are shallow, avoid heap allocation)
//! 3. No escaping: a literal `.` inside a key cannot be addressed

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::{ReflectError, Result};

/// Segment separator
pub const SEPARATOR: char = '.';

/// A parsed, non-empty dotted path such as `foo.bar.0.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    segments: SmallVec<[String; 4]>,
}

impl Path {
    /// Parse a dotted path.
    ///
    /// The empty string and empty segments (`a..b`, `.a`, `a.`) are rejected.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(ReflectError::EmptyPath);
        }

        let mut segments = SmallVec::new();
        for (position, segment) in path.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(ReflectError::EmptySegment {
                    path: path.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Iterate segments from the root outward
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.as_str())
    }

    /// Number of segments (always >= 1)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true: parsing rejects empty paths
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the final segment and the segments leading to it
    pub fn split_last(&self) -> (&str, &[String]) {
        match self.segments.split_last() {
            Some((last, parents)) => (last.as_str(), parents),
            None => ("", &[]),
        }
    }

    /// Dotted form of the first `depth + 1` segments, for error reporting
    pub fn prefix(&self, depth: usize) -> String {
        let end = (depth + 1).min(self.segments.len());
        self.segments[..end].join(".")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for Path {
    type Err = ReflectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = ReflectError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Path {
    type Error = ReflectError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

/// Largest index a write may grow an array to
pub const MAX_ARRAY_INDEX: usize = u32::MAX as usize - 1;

/// Interpret a segment as an array index.
///
/// Only canonical decimal forms count: `"0"`, `"12"`, never `"01"` or `"+1"`.
pub fn index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments() {
        let path = Path::parse("foo.bar.0.name").unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(
            path.segments().collect::<Vec<_>>(),
            vec!["foo", "bar", "0", "name"]
        );
        assert_eq!(path.to_string(), "foo.bar.0.name");
    }

    #[test]
    fn test_malformed_paths() {
        assert!(matches!(Path::parse(""), Err(ReflectError::EmptyPath)));
        assert!(matches!(
            Path::parse("a..b"),
            Err(ReflectError::EmptySegment { position: 1, .. })
        ));
        assert!(matches!(
            Path::parse("a."),
            Err(ReflectError::EmptySegment { position: 1, .. })
        ));
        assert!(matches!(
            Path::parse(".a"),
            Err(ReflectError::EmptySegment { position: 0, .. })
        ));
    }

    #[test]
    fn test_split_last_and_prefix() {
        let path: Path = "a.b.c".parse().unwrap();
        let (last, parents) = path.split_last();
        assert_eq!(last, "c");
        assert_eq!(parents, &["a".to_string(), "b".to_string()]);
        assert_eq!(path.prefix(0), "a");
        assert_eq!(path.prefix(1), "a.b");
        assert_eq!(path.prefix(10), "a.b.c");
    }

    #[test]
    fn test_index_is_canonical() {
        assert_eq!(index("0"), Some(0));
        assert_eq!(index("42"), Some(42));
        assert_eq!(index("01"), None);
        assert_eq!(index("+1"), None);
        assert_eq!(index("-1"), None);
        assert_eq!(index("name"), None);
    }

    #[test]
    fn test_serde_as_string() {
        let path: Path = serde_json::from_str("\"config.retry.interval\"").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            "\"config.retry.interval\""
        );
        assert!(serde_json::from_str::<Path>("\"\"").is_err());
    }
}
