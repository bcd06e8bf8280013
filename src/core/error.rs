//! Error marking for origin-vs-propagation tracking.
//!
//! Invariant: an error crossing scope boundaries is wrapped into a
//! [`GroupError`] exactly once, at the group where it surfaced. Every
//! enclosing scope recognizes the wrapper and re-raises it unchanged, so the
//! failure detail is captured at the origin group only.

use thiserror::Error;

use crate::core::group::GroupId;

/// An error that has already been attributed to its originating group.
///
/// Created by [`scope`](crate::scope) on the first catch; ancestors detect it
/// via `anyhow::Error::downcast` and mark themselves child-failed instead of
/// capturing duplicate detail.
#[derive(Debug, Error)]
#[error("{inner}")]
pub struct GroupError {
    origin: GroupId,
    inner: anyhow::Error,
}

impl GroupError {
    pub(crate) fn new(origin: GroupId, inner: anyhow::Error) -> Self {
        Self { origin, inner }
    }

    /// The group in which the error originally surfaced.
    pub fn origin(&self) -> GroupId {
        self.origin
    }

    /// Unwrap back to the original error, discarding the marker.
    pub fn into_inner(self) -> anyhow::Error {
        self.inner
    }
}

/// Strip the marker from a top-level result, restoring the caller's error.
pub(crate) fn unwrap_marked(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<GroupError>() {
        Ok(marked) => marked.into_inner(),
        Err(err) => err,
    }
}
