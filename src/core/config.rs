//! Transform system configuration
//!
//! Supports loading configuration from RON (Rusty Object Notation) or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// What to do when reconciliation finds a corrupted hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantPolicy {
    /// Fail loudly (development builds)
    Panic,
    /// Log a hard error, skip the corrupted edge and keep going
    LogAndSkip,
}

impl Default for InvariantPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Panic
        } else {
            Self::LogAndSkip
        }
    }
}

/// Transform system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Reaction to graph corruption found during reconciliation
    pub invariant_policy: InvariantPolicy,
    /// Initial capacity of the pending edit queue
    pub edit_capacity: usize,
    /// Initial capacity of the propagation stack and visited set
    pub traversal_capacity: usize,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            invariant_policy: InvariantPolicy::default(),
            edit_capacity: 64,
            traversal_capacity: 1024,
        }
    }
}

impl HierarchyConfig {
    /// Set the invariant policy
    #[must_use]
    pub fn with_invariant_policy(mut self, policy: InvariantPolicy) -> Self {
        self.invariant_policy = policy;
        self
    }

    /// Set the initial pending edit capacity
    #[must_use]
    pub fn with_edit_capacity(mut self, capacity: usize) -> Self {
        self.edit_capacity = capacity;
        self
    }

    /// Set the initial traversal capacity
    #[must_use]
    pub fn with_traversal_capacity(mut self, capacity: usize) -> Self {
        self.traversal_capacity = capacity;
        self
    }

    /// Parse a configuration from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Parse a configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Load a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }
}
