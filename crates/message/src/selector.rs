//! Selector type
//!
//! `Selector` identifies the semantic kind of a message and drives output
//! file routing: messages sharing a selector accumulate in the same file.

use std::fmt;

/// Dotted type tag identifying a message's semantic kind
///
/// Selectors look like `v3.asset.link` or `v3.report.vulnerability`. The
/// sink uses them to pick the output file, so every message with the same
/// selector lands in the same place.
///
/// # Example
///
/// ```
/// use nebula_message::Selector;
///
/// let selector = Selector::new("v3.asset.link");
/// assert_eq!(selector.as_str(), "v3.asset.link");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    /// Create a new selector
    #[inline]
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// Get the selector as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
