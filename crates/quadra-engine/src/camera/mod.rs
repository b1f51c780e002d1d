//! 2D camera.
//!
//! Maps a virtual logical resolution plus pan/zoom/rotation state to a combined
//! view-projection matrix. The matrix is rebuilt lazily: setters only mark the
//! camera dirty when a value actually changes.

mod view;

pub use view::Camera;
