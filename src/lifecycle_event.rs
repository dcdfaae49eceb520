use std::time::Duration;

/// Events emitted by a registry as singletons move through their lifecycle.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use singleton_lifecycle::LifecycleEvent;
///
/// let event = LifecycleEvent::Created { type_name: "Audio" };
/// assert_eq!(event.to_string(), "created { type_name: Audio }");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// The host built a fresh instance.
    Created { type_name: &'static str },

    /// A pre-existing live object was adopted as the instance.
    Adopted {
        type_name: &'static str,
        /// How many candidates the host reported.
        candidates: usize,
    },

    /// A surplus candidate was destroyed during creation.
    DuplicateDestroyed { type_name: &'static str },

    /// Initialization completed and the instance is ready.
    Ready { type_name: &'static str },

    /// The initialization procedure exceeded its timeout and was cancelled.
    InitTimedOut {
        type_name: &'static str,
        timeout: Duration,
    },

    /// The initialization procedure returned an error.
    InitFailed {
        type_name: &'static str,
        /// Rendered error message.
        error: String,
    },

    /// The held instance was torn down.
    TornDown { type_name: &'static str },

    /// The process-quit flag was set.
    Quit {},

    /// An access was refused because the process is quitting.
    AccessAfterQuit { type_name: &'static str },
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleEvent::Created { type_name } => {
                write!(f, "created {{ type_name: {} }}", type_name)
            }
            LifecycleEvent::Adopted {
                type_name,
                candidates,
            } => write!(
                f,
                "adopted {{ type_name: {}, candidates: {} }}",
                type_name, candidates
            ),
            LifecycleEvent::DuplicateDestroyed { type_name } => {
                write!(f, "duplicate destroyed {{ type_name: {} }}", type_name)
            }
            LifecycleEvent::Ready { type_name } => {
                write!(f, "ready {{ type_name: {} }}", type_name)
            }
            LifecycleEvent::InitTimedOut { type_name, timeout } => write!(
                f,
                "init timed out {{ type_name: {}, timeout: {:?} }}",
                type_name, timeout
            ),
            LifecycleEvent::InitFailed { type_name, error } => write!(
                f,
                "init failed {{ type_name: {}, error: {} }}",
                type_name, error
            ),
            LifecycleEvent::TornDown { type_name } => {
                write!(f, "torn down {{ type_name: {} }}", type_name)
            }
            LifecycleEvent::Quit {} => write!(f, "Process quitting"),
            LifecycleEvent::AccessAfterQuit { type_name } => {
                write!(f, "access after quit {{ type_name: {} }}", type_name)
            }
        }
    }
}
