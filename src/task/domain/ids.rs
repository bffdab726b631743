//! Identifier types for the task domain.

use super::TaskDomainError;
use crate::project::domain::TaskCodePrefix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an internal task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = TaskDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| TaskDomainError::InvalidTaskId(value.to_owned()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable task code of the form `<PREFIX>-<N>`.
///
/// Codes are unique across every task, not only within a project. The
/// number is always positive; the prefix may be empty for projects whose
/// name has no usable letters, giving codes such as `-1`.
///
/// # Examples
///
/// ```
/// use labtrack::task::domain::TaskCode;
///
/// let code: TaskCode = "LMS-12".parse().expect("valid code");
/// assert_eq!(code.prefix().as_str(), "LMS");
/// assert_eq!(code.number(), 12);
/// assert_eq!(code.next().to_string(), "LMS-13");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskCode {
    prefix: TaskCodePrefix,
    number: u64,
}

impl TaskCode {
    /// Creates a code from a prefix and a sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskCode`] when `number` is zero.
    pub fn new(prefix: TaskCodePrefix, number: u64) -> Result<Self, TaskDomainError> {
        if number == 0 {
            return Err(TaskDomainError::InvalidTaskCode(format!("{prefix}-0")));
        }
        Ok(Self { prefix, number })
    }

    /// Returns the first code under a prefix.
    #[must_use]
    pub const fn first(prefix: TaskCodePrefix) -> Self {
        Self { prefix, number: 1 }
    }

    /// Returns the code prefix.
    #[must_use]
    pub const fn prefix(&self) -> &TaskCodePrefix {
        &self.prefix
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Returns the code with the following sequence number.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            number: self.number.saturating_add(1),
        }
    }
}

impl FromStr for TaskCode {
    type Err = TaskDomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || TaskDomainError::InvalidTaskCode(value.to_owned());
        let (prefix, digits) = value.rsplit_once('-').ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse::<u64>().map_err(|_| invalid())?;
        Self::new(TaskCodePrefix::from_persisted(prefix), number).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TaskCode {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskCode> for String {
    fn from(value: TaskCode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TaskCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.number)
    }
}
