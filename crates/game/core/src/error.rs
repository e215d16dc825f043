//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g. [`crate::action::ActionError`],
//! [`crate::episode::DirectorError`]) live next to the rules they validate and
//! implement [`GameError`] so callers can decide how to surface them.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the player can pick another action and retry
/// - **Validation**: the request itself is malformed (bad slot, wrong stage)
/// - **Internal**: battle state disagrees with itself
/// - **Fatal**: content or configuration is unusable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the turn menu stays open.
    ///
    /// Examples: not enough stamina, execute target above threshold
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown slot, action sent outside a fight stage
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the battle cannot be constructed or continued.
    ///
    /// Examples: unknown card definition, empty team
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for presenters that map rejections to short notices.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
