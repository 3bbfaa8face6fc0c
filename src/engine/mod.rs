//! Engine module
//!
//! Audio preview of the edited EQ: cpal output stream, the processor that runs
//! in its callback, and the lock-free channels between it and the UI.

pub mod audio_engine;
pub mod audio_processor;
pub mod channels;
pub mod commands;

pub use audio_engine::{AudioEngine, AudioError};
pub use audio_processor::AudioProcessor;
pub use channels::{
    EngineChannels, EngineHandle, UiHandle, DEFAULT_COMMAND_BUFFER_SIZE,
    DEFAULT_EVENT_BUFFER_SIZE, DEFAULT_SPECTRUM_BUFFER_SIZE,
};
pub use commands::{BandSet, EngineCommand, EngineEvent};
