//! Error types for the bridging runtime.
//!
//! Only one thing can actually fail here: a pending cell read that settles
//! to a rejection. Suspension on an unsettled pending value is ordinary
//! control flow during a render pass, so it is carried by [`Interrupt`]
//! rather than by the error enum.

use std::sync::Arc;

use thiserror::Error;

use crate::store::PendingValue;

/// Errors surfaced to the host's error-handling layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A pending cell read settled to a rejection. Terminal for the render
    /// attempt that performed the read; recovery is the application's call.
    #[error("pending cell read rejected: {reason}")]
    RejectedRead {
        /// The rejection reason carried by the pending value.
        reason: Arc<str>,
    },
}

/// Why a render pass stopped before producing output.
///
/// Returned from suspend-capable reads ([`crate::bridge::read_handle`]) and
/// everything built on top of them. `Suspend` asks the host to park the
/// boundary and retry once the pending value settles; `Failed` is a real
/// error on its way to the nearest error boundary.
#[derive(Debug, Clone)]
pub enum Interrupt {
    /// The read hit a pending value that has not settled yet.
    Suspend(PendingValue),

    /// The read failed; the enclosing render pass fails with this error.
    Failed(RenderError),
}

impl From<RenderError> for Interrupt {
    fn from(err: RenderError) -> Self {
        Interrupt::Failed(err)
    }
}
