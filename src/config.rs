//! Runtime configuration for the tracker core.
//!
//! Every section deserializes with defaults for missing keys, so a partial
//! JSON document only needs to name the settings it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bound on task insert attempts when task codes collide.
pub const DEFAULT_ALLOCATION_ATTEMPTS: u32 = 5;

/// Root configuration for the tracker core.
///
/// # Examples
///
/// ```
/// use labtrack::config::TrackerConfig;
///
/// let config = TrackerConfig::default();
/// assert_eq!(config.allocation.max_attempts, 5);
/// assert!(config.audit.enabled);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Task code allocation settings.
    pub allocation: AllocationConfig,
    /// Audit pipeline settings.
    pub audit: AuditConfig,
}

/// Task code allocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Maximum number of insert attempts before creation fails.
    pub max_attempts: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_ALLOCATION_ATTEMPTS,
        }
    }
}

/// Audit pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether audit events are recorded at all.
    pub enabled: bool,
    /// Actor identifier used when a direct-invocation flow has no principal.
    pub anonymous_actor_id: String,
    /// Actor display name used when a direct-invocation flow has no principal.
    pub anonymous_actor_name: String,
    /// Default page size for the global audit feed.
    pub feed_page_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            anonymous_actor_id: "anonymous".to_owned(),
            anonymous_actor_name: "Anonymous".to_owned(),
            feed_page_size: 50,
        }
    }
}

/// Error returned when a configuration document cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid tracker configuration: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

impl TrackerConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is not valid JSON or a
    /// setting has the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use labtrack::config::TrackerConfig;
    ///
    /// let config = TrackerConfig::from_json(r#"{"allocation": {"max_attempts": 3}}"#)
    ///     .expect("valid configuration");
    /// assert_eq!(config.allocation.max_attempts, 3);
    /// assert_eq!(config.audit.anonymous_actor_id, "anonymous");
    /// ```
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Creates a configuration with the audit pipeline switched off.
    ///
    /// Useful for bulk imports where the audit trail is written separately.
    #[must_use]
    pub fn without_audit() -> Self {
        Self {
            audit: AuditConfig {
                enabled: false,
                ..AuditConfig::default()
            },
            ..Self::default()
        }
    }

    /// Overrides the allocation attempt bound.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.allocation.max_attempts = max_attempts;
        self
    }
}
