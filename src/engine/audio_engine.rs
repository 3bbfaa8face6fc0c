//! Audio Engine
//!
//! Owns the cpal output stream. The callback runs on its own thread and must
//! stay real-time safe.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use thiserror::Error;

use super::audio_processor::AudioProcessor;

#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoOutputDevice,
    #[error("Failed to get device configuration: {0}")]
    ConfigurationFailed(String),
    #[error("Failed to create audio stream: {0}")]
    StreamCreationFailed(String),
    #[error("Failed to control audio playback: {0}")]
    StreamPlaybackFailed(String),
}

pub struct AudioEngine {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioEngine {
    /// Opens the default output device.
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::ConfigurationFailed(e.to_string()))?;

        let config = StreamConfig {
            channels: supported_config.channels(),
            sample_rate: SampleRate(supported_config.sample_rate().0),
            buffer_size: cpal::BufferSize::Default,
        };

        let engine = Self {
            device,
            config,
            stream: None,
        };
        log::info!(
            "[audio] opened '{}' at {} Hz, {} channels",
            engine.current_device_name(),
            engine.sample_rate(),
            engine.channels()
        );
        Ok(engine)
    }

    pub fn current_device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "Unknown".to_string())
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Starts the stream, moving `processor` into the callback.
    ///
    /// Does nothing if a stream is already running.
    pub fn start(&mut self, processor: AudioProcessor) -> Result<(), AudioError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let channels = self.config.channels as usize;

        // Only the callback ever locks this, so try_lock never contends.
        let processor = Arc::new(Mutex::new(processor));
        let processor_clone = Arc::clone(&processor);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut proc) = processor_clone.try_lock() {
                        proc.process(data, channels);
                    } else {
                        data.iter_mut().for_each(|s| *s = 0.0);
                    }
                },
                move |err| {
                    log::error!("[audio] stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::StreamCreationFailed(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlaybackFailed(e.to_string()))?;

        self.stream = Some(stream);
        log::info!("[audio] stream started");
        Ok(())
    }

    /// Stops and drops the stream.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(stream) = self.stream.take() {
            stream
                .pause()
                .map_err(|e| AudioError::StreamPlaybackFailed(e.to_string()))?;
            log::info!("[audio] stream stopped");
        }
        Ok(())
    }
}
