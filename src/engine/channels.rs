//! Engine Channels
//!
//! Lock-free SPSC queues between the UI thread and the audio callback, built
//! on rtrb ring buffers.

use rtrb::{Consumer, Producer, RingBuffer};

use super::commands::{EngineCommand, EngineEvent};
use crate::dsp::analyzer::DEFAULT_FFT_SIZE;

/// Command queue capacity (UI -> engine).
pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 256;

/// Event queue capacity (engine -> UI).
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

/// Spectrum sample capacity: four frames of the default analyzer.
pub const DEFAULT_SPECTRUM_BUFFER_SIZE: usize = 4 * (DEFAULT_FFT_SIZE / 2 + 1);

/// All queues, before they are split between threads.
///
/// Spectrum magnitudes travel on their own `f32` queue so the callback never
/// allocates a frame. A [`EngineEvent::Spectrum`] marks how many values to read.
pub struct EngineChannels {
    command_tx: Producer<EngineCommand>,
    command_rx: Consumer<EngineCommand>,
    event_tx: Producer<EngineEvent>,
    event_rx: Consumer<EngineEvent>,
    spectrum_tx: Producer<f32>,
    spectrum_rx: Consumer<f32>,
}

impl EngineChannels {
    pub fn new(command_capacity: usize, event_capacity: usize, spectrum_capacity: usize) -> Self {
        let (command_tx, command_rx) = RingBuffer::new(command_capacity);
        let (event_tx, event_rx) = RingBuffer::new(event_capacity);
        let (spectrum_tx, spectrum_rx) = RingBuffer::new(spectrum_capacity);

        Self {
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            spectrum_tx,
            spectrum_rx,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_COMMAND_BUFFER_SIZE,
            DEFAULT_EVENT_BUFFER_SIZE,
            DEFAULT_SPECTRUM_BUFFER_SIZE,
        )
    }

    /// Splits into the UI-side and engine-side handles.
    pub fn split(self) -> (UiHandle, EngineHandle) {
        let ui_handle = UiHandle {
            command_tx: self.command_tx,
            event_rx: self.event_rx,
            spectrum_rx: self.spectrum_rx,
        };
        let engine_handle = EngineHandle {
            command_rx: self.command_rx,
            event_tx: self.event_tx,
            spectrum_tx: self.spectrum_tx,
        };
        (ui_handle, engine_handle)
    }
}

/// UI-side end: sends commands, receives events.
pub struct UiHandle {
    command_tx: Producer<EngineCommand>,
    event_rx: Consumer<EngineEvent>,
    spectrum_rx: Consumer<f32>,
}

impl UiHandle {
    /// Queues a command, handing it back if the queue is full.
    pub fn send_command(&mut self, cmd: EngineCommand) -> Result<(), EngineCommand> {
        self.command_tx
            .push(cmd)
            .map_err(|rtrb::PushError::Full(cmd)| cmd)
    }

    pub fn recv_event(&mut self) -> Option<EngineEvent> {
        self.event_rx.pop().ok()
    }

    /// Drains every pending event.
    ///
    /// Spectrum data announced by drained events is discarded. Use
    /// [`recv_event`](Self::recv_event) and [`read_spectrum`](Self::read_spectrum)
    /// to keep it.
    pub fn drain_events(&mut self) -> impl Iterator<Item = EngineEvent> + '_ {
        std::iter::from_fn(|| {
            let event = self.recv_event()?;
            if let EngineEvent::Spectrum { bins, .. } = event {
                self.skip_spectrum(bins);
            }
            Some(event)
        })
    }

    /// Reads the `bins` magnitudes announced by a spectrum event into `out`.
    pub fn read_spectrum(&mut self, bins: usize, out: &mut Vec<f32>) {
        out.clear();
        out.extend(std::iter::from_fn(|| self.spectrum_rx.pop().ok()).take(bins));
    }

    fn skip_spectrum(&mut self, bins: usize) {
        for _ in 0..bins {
            if self.spectrum_rx.pop().is_err() {
                break;
            }
        }
    }
}

/// Engine-side end, owned by the audio callback. Nothing here blocks or
/// allocates.
pub struct EngineHandle {
    command_rx: Consumer<EngineCommand>,
    event_tx: Producer<EngineEvent>,
    spectrum_tx: Producer<f32>,
}

impl EngineHandle {
    pub fn recv_command(&mut self) -> Option<EngineCommand> {
        self.command_rx.pop().ok()
    }

    /// Sends an event, dropping it if the UI is not keeping up.
    pub fn send_event_lossy(&mut self, event: EngineEvent) {
        let _ = self.event_tx.push(event);
    }

    /// Queues one spectrum frame and its announcing event.
    ///
    /// The frame is dropped whole unless both queues have room, so the UI
    /// never reads a partial or misaligned frame. Returns whether it was sent.
    pub fn send_spectrum_lossy(&mut self, magnitudes_db: &[f32], sample_rate: f32) -> bool {
        if self.event_tx.slots() == 0 || self.spectrum_tx.slots() < magnitudes_db.len() {
            return false;
        }
        for &value in magnitudes_db {
            let _ = self.spectrum_tx.push(value);
        }
        let _ = self.event_tx.push(EngineEvent::Spectrum {
            bins: magnitudes_db.len(),
            sample_rate,
        });
        true
    }
}
