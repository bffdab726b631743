//! Task code prefix derived from a project name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper-case namespace for a project's task codes.
///
/// A name with a parenthesized fragment uses that fragment
/// (`"Liquid Metal System (LMS)"` gives `LMS`); any other name uses the
/// initial of every whitespace-separated word, keeping ASCII letters only
/// (`"Drug Discovery"` gives `DD`). The prefix may be empty when a name
/// has no usable letters.
///
/// # Examples
///
/// ```
/// use labtrack::project::domain::TaskCodePrefix;
///
/// assert_eq!(TaskCodePrefix::from_project_name("Beta Program (BP)").as_str(), "BP");
/// assert_eq!(TaskCodePrefix::from_project_name("drug discovery").as_str(), "DD");
/// assert!(TaskCodePrefix::from_project_name("42 !!").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCodePrefix(String);

impl TaskCodePrefix {
    /// Derives the prefix for a project name.
    #[must_use]
    pub fn from_project_name(name: &str) -> Self {
        if let Some(fragment) = parenthesized_fragment(name) {
            return Self(fragment.to_uppercase());
        }

        let initials = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .filter(char::is_ascii_alphabetic)
            .map(|letter| letter.to_ascii_uppercase())
            .collect();
        Self(initials)
    }

    /// Wraps an already-derived prefix, as read back from persistence.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the prefix as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the project name yielded no prefix characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Anchored regular expression matching every code under this prefix.
    ///
    /// The prefix is escaped, so fragments such as `QA.1` match literally.
    /// The expression is valid for both the `regex` crate and `PostgreSQL`
    /// advanced regular expressions.
    #[must_use]
    pub fn code_pattern(&self) -> String {
        format!("^{}-[0-9]+$", regex::escape(&self.0))
    }
}

impl AsRef<str> for TaskCodePrefix {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskCodePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the first non-blank `( ... )` fragment of a name, trimmed.
fn parenthesized_fragment(name: &str) -> Option<&str> {
    name.match_indices('(').find_map(|(open, _)| {
        let rest = name.get(open + 1..)?;
        let close = rest.find(')')?;
        let fragment = rest.get(..close)?.trim();
        (!fragment.is_empty()).then_some(fragment)
    })
}
