//! Widgets module
//!
//! Custom egui controls for the editor.

pub mod eq_display;
pub mod level_meter;

pub use eq_display::eq_display;
pub use level_meter::{cpu_meter, level_meter};
