pub mod category;
pub mod content;
pub mod engagement;
pub mod follow;

use contracts::error::EngagementError;

/// Collapse repository/driver failures into the `Persistence` arm of the
/// taxonomy; the original error only goes to the log.
pub(crate) fn persistence(err: anyhow::Error) -> EngagementError {
    tracing::error!("persistence failure: {err:#}");
    EngagementError::Persistence(err.to_string())
}
