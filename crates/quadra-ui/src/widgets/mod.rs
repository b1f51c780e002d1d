//! Element payloads: what each variant stores and how it updates and draws.

pub mod button;
pub mod image;
pub mod label;
pub mod panel;

pub use button::{Button, ButtonState};
pub use image::Image;
pub use label::Label;
pub use panel::{Border, Panel};
