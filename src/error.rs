//! Errors returned by the host-facing [`Processor`][crate::processor::Processor].

use thiserror::Error;

/// Everything that can go wrong while a host drives a plugin. Anything not covered here is a total
/// function.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument was out of range. This covers malformed sample rates, out of range program
    /// indices, and blocks that are larger than the prepared maximum block size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Audio was sent to the processor before `prepare()` was called, or after the processor's
    /// resources have been released.
    #[error("the processor has not been prepared for playback")]
    NotPrepared,
    /// The plugin refused the audio configuration it was prepared with.
    #[error("the plugin failed to initialize")]
    InitializationFailed,
    /// The plugin's state could not be serialized or deserialized.
    #[error("invalid plugin state: {0}")]
    State(#[from] serde_json::Error),
}

/// Shorthand for results returned by the processor.
pub type Result<T, E = Error> = std::result::Result<T, E>;
