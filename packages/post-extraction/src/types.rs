//! Extraction output types.

use serde::{Deserialize, Serialize};

/// One extracted post.
///
/// `title` and `source_url` are never empty. `body` is plain text no longer
/// than the configured cap. `published_at` is always present and currently
/// always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub title: String,
    pub body: String,
    pub published_at: String,
    pub source_url: String,
}

/// Which extraction path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    /// One record per post container
    Containers,
    /// No containers found; the whole page became one record
    WholePage,
}

/// Ordered extraction output, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub records: Vec<PostRecord>,
    pub path: ExtractionPath,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PostRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<PostRecord> {
        self.records
    }
}

impl IntoIterator for ExtractionResult {
    type Item = PostRecord;
    type IntoIter = std::vec::IntoIter<PostRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Maximum number of post containers to process.
///
/// Absent, zero, and negative request values all mean "no cap".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limit(Option<usize>);

impl Limit {
    pub const UNBOUNDED: Limit = Limit(None);

    /// Cap at `n` records; `0` disables the cap.
    pub fn at_most(n: usize) -> Self {
        if n == 0 {
            Self::UNBOUNDED
        } else {
            Self(Some(n))
        }
    }

    /// Interpret the optional `limit` field of an inbound request.
    pub fn from_request(raw: Option<i64>) -> Self {
        match raw {
            Some(n) if n > 0 => Self(Some(usize::try_from(n).unwrap_or(usize::MAX))),
            _ => Self::UNBOUNDED,
        }
    }

    pub fn get(self) -> Option<usize> {
        self.0
    }

    pub fn is_unbounded(self) -> bool {
        self.0.is_none()
    }

    /// How many of `available` items this limit admits.
    pub fn apply(self, available: usize) -> usize {
        self.0.map_or(available, |cap| cap.min(available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_from_request() {
        assert_eq!(Limit::from_request(None), Limit::UNBOUNDED);
        assert_eq!(Limit::from_request(Some(0)), Limit::UNBOUNDED);
        assert_eq!(Limit::from_request(Some(-3)), Limit::UNBOUNDED);
        assert_eq!(Limit::from_request(Some(5)).get(), Some(5));
    }

    #[test]
    fn test_limit_apply() {
        assert_eq!(Limit::at_most(2).apply(3), 2);
        assert_eq!(Limit::at_most(10).apply(3), 3);
        assert_eq!(Limit::UNBOUNDED.apply(7), 7);
        assert!(Limit::at_most(0).is_unbounded());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = PostRecord {
            title: "Hello".to_string(),
            body: "world".to_string(),
            published_at: String::new(),
            source_url: "https://x.test/page".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["publishedAt"], "");
        assert_eq!(json["sourceUrl"], "https://x.test/page");
    }
}
