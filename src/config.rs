//! Transformer configuration
//!
//! This module provides the options that control hook registration and class dispatch. The
//! configuration is fixed before the first class is transformed and shared read-only by every
//! dispatch pass afterwards.

use crate::mapping::MappingMode;

/// Configuration for hook registration and dispatch
///
/// The name mode decides which physical member names hooks resolve to. The remaining switches
/// enable checks that catch stale or broken hooks early:
/// - Member validation rejects hooks whose target does not exist, at registration time
/// - Label verification rejects a patched method whose jumps do not resolve, at commit time
/// - Rollback undoes the partial edits of a hook that failed halfway through its chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct TransformerConfig {
    /// Naming scheme of the classes being transformed (default: [`MappingMode::Named`])
    pub mode: MappingMode,

    /// Restore a method body when a hook fails after editing it
    /// Off by default: partially applied hooks stay in place and are reported
    pub rollback_on_failure: bool,

    /// Resolve every label of a patched method at commit time
    /// A dangling or duplicated label then fails the hook that introduced it
    pub verify_labels: bool,

    /// Check hook targets and the mapped members their patterns and inserted code refer to
    /// against the [`crate::mapping::SymbolTable`] at registration
    /// Has no effect when no table is supplied
    pub validate_members: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl TransformerConfig {
    /// Creates a configuration with every check and rollback enabled
    ///
    /// Intended for development builds, where a stale hook should leave the class untouched.
    #[must_use]
    pub fn development() -> Self {
        Self {
            mode: MappingMode::Named,
            rollback_on_failure: true,
            verify_labels: true,
            validate_members: true,
        }
    }

    /// Creates a configuration for shipped builds
    ///
    /// Remapped names, all checks on, failed hooks keep their partial edits.
    #[must_use]
    pub fn production() -> Self {
        Self {
            mode: MappingMode::Remapped,
            rollback_on_failure: false,
            verify_labels: true,
            validate_members: true,
        }
    }

    /// Creates a configuration without optional checks
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            mode: MappingMode::Named,
            rollback_on_failure: false,
            verify_labels: false,
            validate_members: false,
        }
    }

    /// Sets the naming mode
    #[must_use]
    pub fn with_mode(mut self, mode: MappingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables rollback of failed hooks
    #[must_use]
    pub fn with_rollback(mut self, enabled: bool) -> Self {
        self.rollback_on_failure = enabled;
        self
    }

    /// Enables or disables label verification at commit
    #[must_use]
    pub fn with_label_verification(mut self, enabled: bool) -> Self {
        self.verify_labels = enabled;
        self
    }

    /// Enables or disables member validation at registration
    #[must_use]
    pub fn with_member_validation(mut self, enabled: bool) -> Self {
        self.validate_members = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transformer_config_presets() {
        let development = TransformerConfig::development();
        assert_eq!(development.mode, MappingMode::Named);
        assert!(development.rollback_on_failure);
        assert!(development.verify_labels);
        assert!(development.validate_members);

        let production = TransformerConfig::production();
        assert_eq!(production.mode, MappingMode::Remapped);
        assert!(!production.rollback_on_failure);
        assert!(production.verify_labels);
        assert!(production.validate_members);

        let minimal = TransformerConfig::minimal();
        assert!(!minimal.rollback_on_failure);
        assert!(!minimal.verify_labels);
        assert!(!minimal.validate_members);
    }

    #[test]
    fn test_default_config() {
        assert_eq!(TransformerConfig::default(), TransformerConfig::production());
        assert!(!TransformerConfig::default().rollback_on_failure);
    }

    #[test]
    fn test_builder_setters() {
        let config = TransformerConfig::minimal()
            .with_mode(MappingMode::Remapped)
            .with_rollback(true)
            .with_label_verification(true)
            .with_member_validation(true);

        assert_eq!(config.mode, MappingMode::Remapped);
        assert!(config.rollback_on_failure);
        assert!(config.verify_labels);
        assert!(config.validate_members);
    }
}
