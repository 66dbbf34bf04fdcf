use std::sync::Arc;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors that can occur during flag evaluation.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// No handler in the chain recognized the flag name. Only returned when the evaluator runs
    /// with both strict and debug mode enabled; treat it as a configuration error.
    #[error("no subscription flag defined for {flag:?}")]
    FlagNotFound {
        /// Name of the unrecognized flag.
        flag: String,
    },

    /// An I/O error from a store-backed handler.
    #[error(transparent)]
    // std::io::Error is not clonable, so we're wrapping it in an Arc.
    Io(Arc<std::io::Error>),

    /// Any other failure raised by a handler's backing store. Propagated out of
    /// [`check`](crate::Evaluator::check) unchanged, never retried.
    #[error(transparent)]
    Store(Arc<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl Error {
    /// Wrap a store failure so it can travel through [`check`](crate::Evaluator::check) unchanged.
    pub fn store(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Arc::new(source))
    }
}
