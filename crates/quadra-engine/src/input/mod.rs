//! Input snapshot.
//!
//! The platform layer translates its events into [`InputEvent`]s; the core
//! only reads the resulting [`InputSnapshot`]: held state plus edges that
//! happened since the last [`InputSnapshot::begin_frame`].

mod snapshot;
mod types;

pub use snapshot::InputSnapshot;
pub use types::{InputEvent, Key, MouseButton};
