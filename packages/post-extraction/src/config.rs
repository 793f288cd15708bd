//! Extractor configuration.

/// Maximum number of characters kept from a post body.
///
/// This is the single cap applied to every record; callers configure it once
/// through [`ExtractorConfig`] rather than per extraction.
pub const DEFAULT_MAX_BODY_CHARS: usize = 2000;

/// Configuration for [`crate::PostExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Body text is truncated to this many characters (Unicode scalar values)
    pub max_body_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
        }
    }
}

impl ExtractorConfig {
    /// Set the body cap.
    pub fn with_max_body_chars(mut self, max_body_chars: usize) -> Self {
        self.max_body_chars = max_body_chars;
        self
    }
}
