//! Error types for splice-audio.
//!
//! Errors are returned synchronously from the control surface of a
//! [`ContinuityController`](crate::ContinuityController). Per-frame problems
//! (missing timestamps, unreadable geometry) are not errors: the offending
//! frame is discarded with a warning and processing continues.

/// Errors returned from the control surface.
///
/// A rejected flow definition must not be retried unchanged; the caller has
/// to fix the definition first. [`UnknownInput`](ContinuityError::UnknownInput)
/// signals a stale handle and means the referenced input no longer exists.
#[derive(Debug, thiserror::Error)]
pub enum ContinuityError {
    /// The flow definition does not describe an audio flow.
    #[error("not an audio flow: {def}")]
    NotAudio {
        /// The rejected definition string.
        def: String,
    },

    /// The flow definition is missing a required attribute.
    #[error("flow definition missing {attribute}")]
    MissingAttribute {
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// An input flow definition disagrees with the negotiated output flow.
    ///
    /// Splicing copies feed bytes into the reference buffer plane by plane,
    /// so a feed with a different layout would corrupt the output.
    #[error("input flow {got_planes} plane(s) @ {got_rate}Hz does not match output {want_planes} plane(s) @ {want_rate}Hz")]
    FormatMismatch {
        /// Plane count of the negotiated output flow.
        want_planes: u8,
        /// Sample rate of the negotiated output flow.
        want_rate: u64,
        /// Plane count carried by the rejected input flow.
        got_planes: u8,
        /// Sample rate carried by the rejected input flow.
        got_rate: u64,
    },

    /// The input handle is stale or belongs to a different controller.
    #[error("unknown input handle")]
    UnknownInput,
}
