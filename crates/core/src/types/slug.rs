//! URL slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty after trimming.
    #[error("slug cannot be empty")]
    Empty,
    /// The input contains a path separator.
    #[error("slug cannot contain '/'")]
    ContainsSlash,
}

/// A URL-safe identifier for a content document.
///
/// Slugs are distinct from document ids: they are author-chosen, appear in
/// page URLs, and are unique per document type.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Must not be empty after trimming
/// - Must not contain `/` (a slug is a single path segment)
///
/// ## Examples
///
/// ```
/// use kiyone_core::Slug;
///
/// assert_eq!(Slug::parse("  golden-spoon ").unwrap().as_str(), "golden-spoon");
/// assert!(Slug::parse("   ").is_err());
/// assert!(Slug::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Parse a `Slug` from user or store input.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or contains `/`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SlugError::Empty);
        }
        if trimmed.contains('/') {
            return Err(SlugError::ContainsSlash);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
