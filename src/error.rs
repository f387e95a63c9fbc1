use thiserror::Error;

/// Failure classes of the guest runtime boundary. Every variant carries the
/// interpreter's own rendering of the fault; none of them is a host crash.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The embedding itself could not be built. Unlike the other variants this
    /// is a host bug, and the driver treats it as fatal.
    #[error("interpreter creation failed: {0}")]
    Creation(String),
    /// Compile or top-level evaluation failed; the session is unusable.
    #[error("script load failed: {0}")]
    Load(String),
    /// A guest fault surfaced while running an entry point.
    #[error("script runtime fault: {0}")]
    Runtime(String),
}

/// Outcome of invoking an optional entry point. A script that does not define
/// `tick` or `shutdown` is valid, so absence is a success, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invoke {
    Invoked,
    NotDefined,
}
