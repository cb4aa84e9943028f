//! Error types for trace-result queries.

use thiserror::Error;

use crate::result::ElementId;

/// Errors from querying a [`TraceResult`](crate::TraceResult).
///
/// These are recoverable, user-facing conditions. Structural misuse — an
/// identity outside the pre-sized element range, an invalid axis — panics
/// instead, since it indicates a caller bug rather than bad input data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// Interception recording was never enabled for this surface, so there
    /// is no queue to read (distinct from an enabled-but-empty queue).
    #[error("no ray interception record for surface {0}")]
    InterceptedNotSaved(ElementId),

    /// Generation recording was never enabled for this element.
    #[error("no ray generation record for element {0}")]
    GeneratedNotSaved(ElementId),

    /// The record is enabled but holds no intercept points, so window,
    /// center, centroid, and histogram are undefined.
    #[error("no rays recorded for element {0}")]
    EmptyRecord(ElementId),
}

/// Result type for trace-result queries.
pub type Result<T> = std::result::Result<T, TraceError>;
