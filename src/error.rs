//! Viewer error kinds.
//!
//! Only two conditions are hard errors: a part that could not be fetched or
//! parsed, and a viewer that cannot attach to its output surface at
//! construction time. Everything else (animating while busy, unknown part or
//! light names) is absorbed as a logged no-op so a misbehaving UI cannot crash
//! the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    /// Fetch or parse of a single part failed. Non-fatal: other in-flight
    /// loads of the same batch are unaffected, but the batch is marked failed.
    #[error("failed to load part `{name}`: {reason}")]
    Load { name: String, reason: String },

    /// The viewer could not attach to its output surface. Fatal, raised
    /// before any scene work begins.
    #[error("cannot mount viewer: {reason}")]
    InvalidMount { reason: String },
}

impl ViewerError {
    pub(crate) fn load(name: impl Into<String>, err: anyhow::Error) -> Self {
        Self::Load {
            name: name.into(),
            reason: format!("{:#}", err),
        }
    }
}
