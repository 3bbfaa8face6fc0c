//! EQ Editor Library
//!
//! Interactive parametric EQ curve editor: the band model and interaction
//! core, the audio preview engine, and the egui front end.

pub mod app;
pub mod dsp;
pub mod editor;
pub mod engine;
pub mod persistence;
pub mod widgets;
