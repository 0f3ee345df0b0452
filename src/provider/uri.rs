//! Content references
//!
//! A `ContentUri` addresses a table, a row or a sub-resource of a row inside a
//! content provider, e.g. `content://planner/budgets/4/12`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EnvelopeError, EnvelopeResult};

const SCHEME: &str = "content://";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentUri {
    authority: String,
    segments: Vec<String>,
}

impl ContentUri {
    pub fn new(authority: impl Into<String>, segments: &[&str]) -> Self {
        Self {
            authority: authority.into(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse a `content://authority/segment/...` string
    pub fn parse(s: &str) -> EnvelopeResult<Self> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or_else(|| EnvelopeError::InvalidUri(s.to_string()))?;
        let mut parts = rest.split('/');
        let authority = parts
            .next()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| EnvelopeError::InvalidUri(s.to_string()))?;
        Ok(Self {
            authority: authority.to_string(),
            segments: parts
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    /// Append a path segment
    pub fn with_appended_segment(&self, segment: impl Into<String>) -> Self {
        let mut uri = self.clone();
        uri.segments.push(segment.into());
        uri
    }

    /// Append a numeric id as a path segment
    pub fn with_appended_id(&self, id: i64) -> Self {
        self.with_appended_segment(id.to_string())
    }

    /// Read the path segment at `index` as an id
    pub fn segment_id(&self, index: usize) -> EnvelopeResult<i64> {
        self.segments
            .get(index)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                EnvelopeError::InvalidUri(format!("{} has no id at segment {}", self, index))
            })
    }

    /// True if one uri addresses the other or something beneath it
    pub fn is_related(&self, other: &ContentUri) -> bool {
        if self.authority != other.authority {
            return false;
        }
        let shared = self.segments.len().min(other.segments.len());
        self.segments[..shared] == other.segments[..shared]
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SCHEME, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ContentUri {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
