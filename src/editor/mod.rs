//! Editor module
//!
//! The EQ band model, response-curve evaluation, surface coordinate mapping,
//! the sweep/solo overlay and the interaction controller. Nothing in here
//! depends on egui or on the audio engine.

pub mod band;
pub mod controller;
pub mod coords;
pub mod curve;
pub mod export;
pub mod frame;
pub mod overlay;
pub mod spectrum;

pub use band::{default_bands, Band, BandField, BandId, FilterKind, MAX_BANDS};
pub use controller::{EditorCommand, EditorState, InteractionController};
pub use coords::{SurfacePoint, Viewport};
pub use curve::{evaluate, sample_curve};
pub use export::export_summary;
pub use frame::{FramePrimitives, FrameProducer, GridLine, NodeMarker};
pub use overlay::{effective_bands, InspectionModes};
pub use spectrum::SpectrumFrame;
