use std::time::Duration;

use thiserror::Error;

use crate::BoxError;

/// Errors surfaced by the registry.
///
/// `Destroyed` and `Cancelled` reach waiters; `InitTimeout` and `InitFailed` reach
/// only whoever drives or observes the initialization routine. A
/// `wait_for_ready` caller never sees them and keeps waiting until its own token
/// fires.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The instance was torn down, or the process is quitting.
    #[error("singleton {type_name} is destroyed or the process is quitting")]
    Destroyed { type_name: &'static str },

    /// The caller's token fired before the awaited condition held.
    #[error("wait for singleton {type_name} was cancelled")]
    Cancelled { type_name: &'static str },

    /// The initialization procedure did not finish within its timeout.
    #[error("initialization of {type_name} exceeded {timeout:?}")]
    InitTimeout {
        type_name: &'static str,
        timeout: Duration,
    },

    /// The initialization procedure returned an error.
    #[error("initialization of {type_name} failed: {source}")]
    InitFailed {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },

    /// The once-only initialization routine was already started for this instance.
    #[error("initialization of {type_name} was already started")]
    InitAlreadyStarted { type_name: &'static str },

    /// The state stored for this type has a different type; an internal fault.
    #[error("type mismatch in lifecycle state for {type_name}")]
    TypeMismatch { type_name: &'static str },
}

impl LifecycleError {
    pub fn type_name(&self) -> &'static str {
        match self {
            LifecycleError::Destroyed { type_name }
            | LifecycleError::Cancelled { type_name }
            | LifecycleError::InitTimeout { type_name, .. }
            | LifecycleError::InitFailed { type_name, .. }
            | LifecycleError::InitAlreadyStarted { type_name }
            | LifecycleError::TypeMismatch { type_name } => type_name,
        }
    }

    /// `true` when the instance is gone for good and retrying is pointless.
    pub fn is_destroyed(&self) -> bool {
        matches!(self, LifecycleError::Destroyed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroyed_display() {
        let err = LifecycleError::Destroyed { type_name: "Audio" };
        assert_eq!(
            err.to_string(),
            "singleton Audio is destroyed or the process is quitting"
        );
        assert!(err.is_destroyed());
    }

    #[test]
    fn test_cancelled_display() {
        let err = LifecycleError::Cancelled { type_name: "Audio" };
        assert_eq!(err.to_string(), "wait for singleton Audio was cancelled");
        assert!(!err.is_destroyed());
    }

    #[test]
    fn test_init_timeout_display() {
        let err = LifecycleError::InitTimeout {
            type_name: "Audio",
            timeout: Duration::from_millis(100),
        };
        assert_eq!(err.to_string(), "initialization of Audio exceeded 100ms");
    }

    #[test]
    fn test_init_failed_keeps_source() {
        let err = LifecycleError::InitFailed {
            type_name: "Audio",
            source: "device busy".into(),
        };
        assert_eq!(err.to_string(), "initialization of Audio failed: device busy");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("device busy"));
    }

    #[test]
    fn test_type_name_accessor() {
        let err = LifecycleError::InitAlreadyStarted { type_name: "Audio" };
        assert_eq!(err.type_name(), "Audio");
        let err = LifecycleError::TypeMismatch { type_name: "Net" };
        assert_eq!(err.type_name(), "Net");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = LifecycleError::TypeMismatch { type_name: "Net" };
        assert_eq!(err.to_string(), "type mismatch in lifecycle state for Net");
        assert!(!err.is_destroyed());
    }

    #[test]
    fn test_debug_format() {
        let err = LifecycleError::Cancelled { type_name: "Audio" };
        assert_eq!(format!("{:?}", err), "Cancelled { type_name: \"Audio\" }");
    }
}
