use std::fmt;

use crate::render::DeviceError;

/// Errors returned by [`SpriteBatch`](super::SpriteBatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The device refused the initial allocation.
    Init(DeviceError),
    /// Growing the vertex/index storage failed; the flush was abandoned.
    Capacity(DeviceError),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::Init(e) => write!(f, "sprite batch init failed: {e}"),
            BatchError::Capacity(e) => write!(f, "sprite batch flush aborted: {e}"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::Init(e) | BatchError::Capacity(e) => Some(e),
        }
    }
}
