//! Audio Processor
//!
//! Runs inside the cpal callback: drains UI commands, renders the test signal
//! through the EQ chain, meters the result and feeds the spectrum analyzer.

use std::time::Instant;

use crate::dsp::{
    db_to_linear, EqChain, SignalGenerator, SmoothedValue, SpectrumAnalyzer, TestSource,
};

use super::channels::EngineHandle;
use super::commands::{EngineCommand, EngineEvent};

/// Default preview level in dB.
pub const DEFAULT_LEVEL_DB: f32 = -18.0;

/// Lowest accepted preview level; anything below is treated as silence.
pub const MIN_LEVEL_DB: f32 = -60.0;

/// Upper bound on the preview level.
pub const MAX_LEVEL_DB: f32 = 0.0;

/// Callbacks between meter and CPU load events.
const REPORT_INTERVAL: u32 = 8;

/// Smoothing factor for the CPU load average.
const CPU_SMOOTHING: f32 = 0.3;

/// Initial scratch size; grows if the host asks for larger blocks.
const INITIAL_BLOCK: usize = 1024;

pub struct AudioProcessor {
    engine_handle: EngineHandle,
    sample_rate: f32,
    generator: SignalGenerator,
    chain: EqChain,
    analyzer: SpectrumAnalyzer,
    analyzer_enabled: bool,
    level: SmoothedValue,
    is_playing: bool,
    /// Mono render buffer.
    scratch: Vec<f32>,
    peak: f32,
    report_counter: u32,
    cpu_load_avg: f32,
}

impl AudioProcessor {
    pub fn new(sample_rate: f32, engine_handle: EngineHandle) -> Self {
        Self {
            engine_handle,
            sample_rate,
            generator: SignalGenerator::new(TestSource::default(), sample_rate),
            chain: EqChain::new(sample_rate),
            analyzer: SpectrumAnalyzer::default(),
            analyzer_enabled: true,
            level: SmoothedValue::new(
                db_to_linear(DEFAULT_LEVEL_DB),
                SmoothedValue::DEFAULT_TIME_CONSTANT_MS,
                sample_rate,
            ),
            is_playing: false,
            scratch: vec![0.0; INITIAL_BLOCK],
            peak: 0.0,
            report_counter: 0,
            cpu_load_avg: 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Active EQ sections, for diagnostics.
    pub fn active_sections(&self) -> usize {
        self.chain.active_sections()
    }

    /// Fills an interleaved output buffer.
    pub fn process(&mut self, output: &mut [f32], channels: usize) {
        self.process_commands();

        output.iter_mut().for_each(|s| *s = 0.0);
        if !self.is_playing || channels == 0 {
            self.cpu_load_avg = 0.0;
            return;
        }

        let start_time = Instant::now();
        let num_frames = output.len() / channels;
        if self.scratch.len() < num_frames {
            self.scratch.resize(num_frames, 0.0);
        }

        let block = &mut self.scratch[..num_frames];
        self.generator.fill(block);
        self.chain.process_block(block);
        for sample in block.iter_mut() {
            *sample = (*sample * self.level.next()).clamp(-1.0, 1.0);
            self.peak = self.peak.max(sample.abs());
        }

        for (frame, &sample) in output.chunks_mut(channels).zip(block.iter()) {
            frame.iter_mut().for_each(|out| *out = sample);
        }

        if self.analyzer_enabled && self.analyzer.push_samples(block) {
            self.engine_handle
                .send_spectrum_lossy(self.analyzer.magnitudes_db(), self.sample_rate);
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let available = num_frames as f64 / self.sample_rate as f64;
        let cpu_percent = (elapsed / available * 100.0) as f32;
        self.cpu_load_avg = CPU_SMOOTHING * cpu_percent + (1.0 - CPU_SMOOTHING) * self.cpu_load_avg;

        self.report_counter += 1;
        if self.report_counter >= REPORT_INTERVAL {
            self.report_counter = 0;
            self.engine_handle.send_event_lossy(EngineEvent::OutputLevel {
                left: self.peak,
                right: self.peak,
            });
            self.engine_handle.send_event_lossy(EngineEvent::CpuLoad(self.cpu_load_avg));
            self.peak = 0.0;
        }
    }

    fn process_commands(&mut self) {
        while let Some(cmd) = self.engine_handle.recv_command() {
            match cmd {
                EngineCommand::SetBands(bands) => self.chain.set_bands(bands.as_slice()),
                EngineCommand::SetPlaying(playing) => {
                    if playing != self.is_playing {
                        self.is_playing = playing;
                        if !playing {
                            self.chain.reset();
                            self.analyzer.reset();
                            self.peak = 0.0;
                        }
                    }
                    let event = if playing {
                        EngineEvent::Started
                    } else {
                        EngineEvent::Stopped
                    };
                    self.engine_handle.send_event_lossy(event);
                }
                EngineCommand::SetSource(source) => self.generator.set_source(source),
                EngineCommand::SetToneFrequency(hz) => self.generator.set_tone_hz(hz),
                EngineCommand::SetLevel(db) => {
                    let gain = if db.is_finite() && db > MIN_LEVEL_DB {
                        db_to_linear(db.min(MAX_LEVEL_DB))
                    } else {
                        0.0
                    };
                    self.level.set_target(gain);
                }
                EngineCommand::SetAnalyzerEnabled(enabled) => {
                    self.analyzer_enabled = enabled;
                    if !enabled {
                        self.analyzer.reset();
                    }
                }
            }
        }
    }
}
