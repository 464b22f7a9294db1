//! Error taxonomy for the sort dispatcher (spec §7).
//!
//! Every fallible entry point in [`crate::dispatch`] returns
//! `Result<T, Error>`. The core never retries an error internally and never
//! mutates a caller's buffer before the allocator has succeeded.

/// Errors surfaced by a `rsbd8` sort call.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Scratch allocation failed, including after the large-page fallback.
    #[error("out of memory: failed to acquire {requested_bytes} bytes of scratch")]
    OutOfMemory {
        /// Number of bytes the failed allocation asked for.
        requested_bytes: usize,
    },

    /// A caller-supplied argument violates the entry point's contract
    /// (aliased buffers where not permitted, a length/size-of product that
    /// overflows, or an alignment requirement the chosen mode demands).
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human-readable description of which contract was violated.
        reason: &'static str,
    },

    /// The requested configuration pins a feature the host does not
    /// support (e.g. huge pages compiled in but unavailable at runtime
    /// under a hard requirement).
    #[error("precondition unsupported: {feature}")]
    PreconditionUnsupported {
        /// Name of the unsupported feature/precondition.
        feature: &'static str,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
