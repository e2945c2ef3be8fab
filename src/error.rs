//! Error types crossing the public API boundary.

use thiserror::Error;

/// Errors a caller of [`crate::diff`] may observe.
///
/// `UseFallback` is deliberately absent: it is an internal dispatch
/// signal (see [`crate::algorithm`]) consumed entirely by the framework
/// and must never leak past [`crate::diff`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DiffError {
    /// A scratch or atom-table allocation could not be satisfied.
    #[error("allocation failed")]
    OutOfMemory,
    /// The supplied [`crate::config::Config`] is not usable, e.g. no
    /// atomizer configured, or a negative/overflowing input length.
    #[error("invalid configuration: {0}")]
    InvalidArg(&'static str),
    /// The requested operation has no implementation (reserved for
    /// algorithm kinds that decline to run on the given input shape).
    #[error("operation not supported")]
    NotSupported,
}

/// A C-FFI-flavored view of [`DiffError`], retained for parity with
/// the result-code model in the source specification. Most callers
/// should prefer the `Result<_, DiffError>` returned by [`crate::diff`];
/// `DiffRc` exists so [`crate::chunk::DiffResult`] can carry an
/// always-`Ok` code without re-deriving it from the `Result` wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffRc {
    Ok,
    OutOfMemory,
    InvalidArg,
    NotSupported,
}

impl From<&DiffError> for DiffRc {
    fn from(e: &DiffError) -> Self {
        match e {
            DiffError::OutOfMemory => DiffRc::OutOfMemory,
            DiffError::InvalidArg(_) => DiffRc::InvalidArg,
            DiffError::NotSupported => DiffRc::NotSupported,
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, DiffError>;
