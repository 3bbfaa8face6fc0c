//! Main application struct for the EQ editor
//!
//! Contains the EqApp which implements eframe::App. It owns the editor
//! controller, the audio preview engine and the persisted settings.

use std::path::PathBuf;

use eframe::egui::{self, Align, Layout, RichText};

use super::theme;
use crate::dsp::TestSource;
use crate::editor::band::{MAX_FREQ, MIN_FREQ};
use crate::editor::{
    Band, BandField, BandId, EditorCommand, FilterKind, FrameProducer, InteractionController,
    SpectrumFrame, MAX_BANDS,
};
use crate::engine::audio_processor::{MAX_LEVEL_DB, MIN_LEVEL_DB};
use crate::engine::{
    AudioEngine, AudioError, AudioProcessor, BandSet, EngineChannels, EngineCommand, EngineEvent,
    UiHandle,
};
use crate::persistence::{save_to_file, AppSettings};
use crate::widgets;

/// Formats a band field for its text box.
pub fn format_field(field: BandField, value: f32) -> String {
    match field {
        BandField::Frequency => format!("{:.0}", value),
        BandField::Gain => format!("{:.1}", value),
        BandField::Q => format!("{:.2}", value),
    }
}

fn field_label(field: BandField) -> &'static str {
    match field {
        BandField::Frequency => "Frequency (Hz)",
        BandField::Gain => "Gain (dB)",
        BandField::Q => "Q",
    }
}

const FIELDS: [BandField; 3] = [BandField::Frequency, BandField::Gain, BandField::Q];

/// Text buffers for the inspector fields.
///
/// A buffer follows the band value while its field is not focused. When focus
/// leaves, it is committed only if the user changed the text.
#[derive(Default)]
struct FieldBuffers {
    band: Option<BandId>,
    text: [String; 3],
    /// Text last written from the band, per field.
    shown: [String; 3],
}

impl FieldBuffers {
    fn sync_all(&mut self, band: &Band) {
        self.band = Some(band.id);
        for i in 0..FIELDS.len() {
            self.sync(i, band);
        }
    }

    fn sync(&mut self, index: usize, band: &Band) {
        let field = FIELDS[index];
        self.shown[index] = format_field(field, field.get(band));
        self.text[index].clone_from(&self.shown[index]);
    }

    /// The typed text for a field, or `None` if it still shows the band value.
    fn edited(&self, index: usize) -> Option<&str> {
        (self.text[index] != self.shown[index]).then(|| self.text[index].as_str())
    }
}

/// Main application state for the EQ editor
pub struct EqApp {
    controller: InteractionController,
    producer: FrameProducer,

    /// Latest analyzer frame, if the preview is running.
    spectrum: Option<SpectrumFrame>,

    audio_engine: Result<AudioEngine, AudioError>,
    ui_handle: Option<UiHandle>,
    is_playing: bool,

    /// Last audio error message to display
    audio_error_message: Option<String>,
    /// Transient message for the status bar
    status_message: Option<String>,

    output_level: (f32, f32),
    cpu_load: f32,

    settings: AppSettings,
    settings_path: PathBuf,

    fields: FieldBuffers,
    theme_applied: bool,
}

impl EqApp {
    /// Create a new EqApp with the given settings.
    ///
    /// Starts the preview immediately when `settings.audio.autostart` is set.
    pub fn new(settings: AppSettings, settings_path: PathBuf) -> Self {
        let audio_engine = AudioEngine::new();

        let audio_error_message = match &audio_engine {
            Ok(_) => None,
            Err(e) => {
                log::warn!("[app] audio unavailable: {}", e);
                Some(e.to_string())
            }
        };

        let producer =
            FrameProducer::new(settings.display.curve_step, settings.display.show_labels);

        let mut app = Self {
            controller: InteractionController::new(),
            producer,
            spectrum: None,
            audio_engine,
            ui_handle: None,
            is_playing: false,
            audio_error_message,
            status_message: None,
            output_level: (0.0, 0.0),
            cpu_load: 0.0,
            settings,
            settings_path,
            fields: FieldBuffers::default(),
            theme_applied: false,
        };

        if app.settings.audio.autostart {
            app.start_audio();
        }

        app
    }

    fn send(&mut self, cmd: EngineCommand) {
        if let Some(handle) = self.ui_handle.as_mut() {
            if handle.send_command(cmd).is_err() {
                log::warn!("[app] engine command queue full, dropped {:?}", cmd);
            }
        }
    }

    /// Builds a processor, starts the stream and primes it with the current
    /// bands and source settings.
    fn start_audio(&mut self) {
        let engine = match self.audio_engine.as_mut() {
            Ok(engine) => engine,
            Err(_) => return,
        };
        if engine.is_running() {
            return;
        }

        let (ui_handle, engine_handle) = EngineChannels::with_defaults().split();
        let processor = AudioProcessor::new(engine.sample_rate() as f32, engine_handle);

        if let Err(e) = engine.start(processor) {
            log::error!("[app] failed to start audio: {}", e);
            self.audio_error_message = Some(e.to_string());
            return;
        }

        self.ui_handle = Some(ui_handle);
        self.audio_error_message = None;

        let audio = self.settings.audio.clone();
        let effective = self.controller.effective_bands();
        self.send(EngineCommand::SetSource(audio.source));
        self.send(EngineCommand::SetToneFrequency(audio.tone_hz));
        self.send(EngineCommand::SetLevel(audio.level_db));
        self.send(EngineCommand::SetAnalyzerEnabled(self.settings.display.show_spectrum));
        self.send(EngineCommand::SetBands(BandSet::from_slice(&effective)));
        self.send(EngineCommand::SetPlaying(true));
    }

    fn stop_audio(&mut self) {
        self.send(EngineCommand::SetPlaying(false));
        if let Ok(ref mut engine) = self.audio_engine {
            if let Err(e) = engine.stop() {
                log::error!("[app] failed to stop audio: {}", e);
                self.audio_error_message = Some(e.to_string());
            }
        }
        self.ui_handle = None;
        self.is_playing = false;
        self.spectrum = None;
        self.output_level = (0.0, 0.0);
        self.cpu_load = 0.0;
    }

    /// Pushes changed effective bands and drains engine events.
    fn sync_engine(&mut self) {
        if let Some(bands) = self.controller.take_changed_effective() {
            self.send(EngineCommand::SetBands(BandSet::from_slice(&bands)));
        }

        let Some(handle) = self.ui_handle.as_mut() else {
            return;
        };
        while let Some(event) = handle.recv_event() {
            match event {
                EngineEvent::Spectrum { bins, sample_rate } => {
                    let mut magnitudes_db = Vec::with_capacity(bins);
                    handle.read_spectrum(bins, &mut magnitudes_db);
                    self.spectrum = Some(SpectrumFrame::new(magnitudes_db, sample_rate));
                }
                EngineEvent::OutputLevel { left, right } => self.output_level = (left, right),
                EngineEvent::CpuLoad(load) => self.cpu_load = load,
                EngineEvent::Started => self.is_playing = true,
                EngineEvent::Stopped => self.is_playing = false,
            }
        }
    }

    fn export(&mut self, ctx: &egui::Context) {
        match self.controller.export_summary() {
            Some(summary) => {
                let lines = summary.lines().count();
                ctx.copy_text(summary);
                self.status_message = Some(format!("Copied {} band(s) to clipboard", lines));
            }
            None => {
                self.status_message = Some("Nothing to export: no band above 0.5 dB".to_string());
            }
        }
    }

    fn save_settings(&self) {
        match save_to_file(&self.settings, &self.settings_path) {
            Ok(()) => log::info!("[settings] saved to {:?}", self.settings_path),
            Err(e) => log::warn!("[settings] could not save: {}", e),
        }
    }

    /// Draw the top toolbar with editing and audio controls
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) -> ToolbarActions {
        let mut actions = ToolbarActions::default();
        let state = self.controller.state();

        ui.horizontal(|ui| {
            ui.add_space(8.0);

            ui.label(RichText::new("EQ EDITOR").size(18.0).color(theme::text::PRIMARY).strong());

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            if ui
                .selectable_label(
                    state.sweep_active,
                    RichText::new("Sweep").color(theme::accent::SUCCESS),
                )
                .on_hover_text("Boost the selected band to find problem frequencies")
                .clicked()
            {
                actions.toggle_sweep = true;
            }
            if ui
                .selectable_label(
                    state.solo_active,
                    RichText::new("Solo").color(theme::accent::WARNING),
                )
                .on_hover_text("Hear only the selected band")
                .clicked()
            {
                actions.toggle_solo = true;
            }

            ui.add_space(10.0);

            let can_add = state.bands.len() < MAX_BANDS;
            if ui.add_enabled(can_add, egui::Button::new("+ Band")).clicked() {
                actions.add_band = true;
            }
            let can_delete = state.selected.is_some() && state.bands.len() > 1;
            if ui.add_enabled(can_delete, egui::Button::new("- Band")).clicked() {
                actions.delete_band = true;
            }
            if ui.button("Reset").clicked() {
                actions.reset = true;
            }
            if ui
                .button("Export")
                .on_hover_text("Copy a summary of the boosted and cut bands")
                .clicked()
            {
                actions.export = true;
            }

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            ui.label(RichText::new("Audio").color(theme::text::SECONDARY));
            ui.add_space(8.0);

            match &self.audio_engine {
                Ok(engine) => {
                    let is_running = engine.is_running();

                    if is_running {
                        if ui.button("⏹ Stop").clicked() {
                            actions.stop_audio = true;
                        }
                    } else if ui.button("▶ Play").clicked() {
                        actions.start_audio = true;
                    }

                    let mut source = self.settings.audio.source;
                    egui::ComboBox::from_label("Source")
                        .selected_text(source.label())
                        .show_ui(ui, |ui| {
                            for s in TestSource::ALL {
                                ui.selectable_value(&mut source, s, s.label());
                            }
                        });
                    if source != self.settings.audio.source {
                        actions.source = Some(source);
                    }

                    if source == TestSource::Tone {
                        let mut hz = self.settings.audio.tone_hz;
                        let changed = ui
                            .add(
                                egui::DragValue::new(&mut hz)
                                    .range(MIN_FREQ..=MAX_FREQ)
                                    .speed(5.0)
                                    .suffix(" Hz"),
                            )
                            .changed();
                        if changed {
                            actions.tone_hz = Some(hz);
                        }
                    }

                    let mut level = self.settings.audio.level_db;
                    let changed = ui
                        .add(
                            egui::Slider::new(&mut level, MIN_LEVEL_DB..=MAX_LEVEL_DB)
                                .suffix(" dB"),
                        )
                        .changed();
                    if changed {
                        actions.level_db = Some(level);
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if is_running {
                            theme::accent::SUCCESS
                        } else {
                            theme::text::DISABLED
                        };
                        let status_text = if is_running { "● Running" } else { "○ Stopped" };
                        ui.label(RichText::new(status_text).color(status_color).small());

                        ui.label(
                            RichText::new(format!(
                                "{}Hz • {}ch",
                                engine.sample_rate(),
                                engine.channels()
                            ))
                            .color(theme::text::SECONDARY)
                            .small(),
                        );
                    });
                }
                Err(e) => {
                    ui.label(
                        RichText::new(format!("⚠ Audio unavailable: {}", e))
                            .color(theme::accent::ERROR),
                    );
                }
            }
        });

        actions
    }

    /// Band list and the selected band's fields.
    fn draw_inspector(&mut self, ui: &mut egui::Ui) -> InspectorActions {
        let mut actions = InspectorActions::default();
        let state = self.controller.state();

        ui.add_space(8.0);
        ui.label(RichText::new("Bands").color(theme::text::SECONDARY));
        ui.add_space(4.0);

        for band in &state.bands {
            let selected = state.selected == Some(band.id);
            let text = RichText::new(format!(
                "{}  {}  {:.0} Hz",
                band.id,
                band.kind.label(),
                band.frequency
            ))
            .color(theme::kind_color(band.kind));
            if ui.selectable_label(selected, text).clicked() {
                actions.select = Some(if selected { None } else { Some(band.id) });
            }
        }

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(8.0);

        let Some(band) = state.selected_band().copied() else {
            self.fields.band = None;
            ui.label(RichText::new("Select a band to edit it").color(theme::text::DISABLED));
            return actions;
        };

        if self.fields.band != Some(band.id) {
            self.fields.sync_all(&band);
        }

        let mut kind = band.kind;
        egui::ComboBox::from_label("Type")
            .selected_text(kind.label())
            .show_ui(ui, |ui| {
                for k in FilterKind::ALL {
                    ui.selectable_value(&mut kind, k, k.label());
                }
            });
        if kind != band.kind {
            actions.kind = Some(kind);
        }

        ui.add_space(6.0);

        egui::Grid::new("band_fields").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
            for (i, field) in FIELDS.iter().enumerate() {
                ui.label(field_label(*field));
                let enabled = *field != BandField::Gain || band.kind.uses_gain();
                let response = ui.add_enabled(
                    enabled,
                    egui::TextEdit::singleline(&mut self.fields.text[i]).desired_width(80.0),
                );
                if response.lost_focus() {
                    if let Some(text) = self.fields.edited(i) {
                        actions.commits.push((*field, text.to_string()));
                    }
                } else if !response.has_focus() {
                    self.fields.sync(i, &band);
                }
                ui.end_row();
            }
        });

        actions
    }

    fn draw_display_options(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        ui.separator();
        ui.add_space(8.0);
        ui.label(RichText::new("Display").color(theme::text::SECONDARY));

        if ui.checkbox(&mut self.settings.display.show_labels, "Grid labels").changed() {
            self.producer.show_labels = self.settings.display.show_labels;
        }
        if ui.checkbox(&mut self.settings.display.show_spectrum, "Spectrum").changed() {
            let enabled = self.settings.display.show_spectrum;
            if !enabled {
                self.spectrum = None;
            }
            self.send(EngineCommand::SetAnalyzerEnabled(enabled));
        }
    }

    /// Draw the bottom status bar
    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);

            if let Some(ref error) = self.audio_error_message {
                ui.label(
                    RichText::new(format!("⚠ {}", error))
                        .color(theme::accent::ERROR)
                        .small(),
                );
            } else if let Some(ref message) = self.status_message {
                ui.label(RichText::new(message).color(theme::text::ACCENT).small());
            } else {
                ui.label(RichText::new("Ready").color(theme::text::SECONDARY).small());
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new("EQ Editor v0.1").color(theme::text::DISABLED).small());
                if self.is_playing {
                    ui.add_space(12.0);
                    widgets::cpu_meter(ui, self.cpu_load);
                    widgets::level_meter(ui, self.output_level.0, self.output_level.1);
                }
            });
        });
    }

    /// Delete removes the selected band and Escape clears the selection,
    /// unless a text field has focus.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }
        let (delete, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if delete {
            self.controller.apply(EditorCommand::DeleteSelected);
        }
        if escape {
            self.controller.apply(EditorCommand::ClearSelection);
        }
    }
}

/// Actions collected from the toolbar for deferred execution
#[derive(Default)]
struct ToolbarActions {
    toggle_sweep: bool,
    toggle_solo: bool,
    add_band: bool,
    delete_band: bool,
    reset: bool,
    export: bool,
    start_audio: bool,
    stop_audio: bool,
    source: Option<TestSource>,
    tone_hz: Option<f32>,
    level_db: Option<f32>,
}

/// Actions collected from the inspector panel.
#[derive(Default)]
struct InspectorActions {
    /// `Some(None)` clears the selection.
    select: Option<Option<BandId>>,
    kind: Option<FilterKind>,
    commits: Vec<(BandField, String)>,
}

impl eframe::App for EqApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        let toolbar_actions = egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::none()
                    .fill(theme::background::PANEL)
                    .inner_margin(egui::Margin::symmetric(0.0, 8.0)),
            )
            .show(ctx, |ui| self.draw_toolbar(ui))
            .inner;

        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::none()
                    .fill(theme::background::PANEL)
                    .inner_margin(egui::Margin::symmetric(0.0, 4.0)),
            )
            .show(ctx, |ui| {
                self.draw_status_bar(ui);
            });

        let inspector_actions = egui::SidePanel::right("inspector")
            .resizable(false)
            .default_width(220.0)
            .frame(
                egui::Frame::none()
                    .fill(theme::background::PANEL)
                    .inner_margin(egui::Margin::symmetric(10.0, 4.0)),
            )
            .show(ctx, |ui| {
                let actions = self.draw_inspector(ui);
                self.draw_display_options(ui);
                actions
            })
            .inner;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::same(8.0)))
            .show(ctx, |ui| {
                let spectrum = if self.settings.display.show_spectrum {
                    self.spectrum.as_ref()
                } else {
                    None
                };
                widgets::eq_display(ui, &mut self.controller, &self.producer, spectrum);
            });

        self.handle_keys(ctx);

        // Handle deferred actions (to avoid borrow checker issues)
        let controller = &mut self.controller;
        if toolbar_actions.toggle_sweep {
            let on = !controller.state().sweep_active;
            controller.apply(EditorCommand::SetSweep(on));
        }
        if toolbar_actions.toggle_solo {
            let on = !controller.state().solo_active;
            controller.apply(EditorCommand::SetSolo(on));
        }
        if toolbar_actions.add_band {
            controller.apply(EditorCommand::AddBand);
        }
        if toolbar_actions.delete_band {
            controller.apply(EditorCommand::DeleteSelected);
        }
        if toolbar_actions.reset {
            controller.apply(EditorCommand::Reset);
            self.status_message = None;
        }
        if toolbar_actions.export {
            self.export(ctx);
        }
        if toolbar_actions.start_audio {
            self.start_audio();
        }
        if toolbar_actions.stop_audio {
            self.stop_audio();
        }
        if let Some(source) = toolbar_actions.source {
            self.settings.audio.source = source;
            self.send(EngineCommand::SetSource(source));
        }
        if let Some(hz) = toolbar_actions.tone_hz {
            self.settings.audio.tone_hz = hz;
            self.send(EngineCommand::SetToneFrequency(hz));
        }
        if let Some(db) = toolbar_actions.level_db {
            self.settings.audio.level_db = db;
            self.send(EngineCommand::SetLevel(db));
        }

        match inspector_actions.select {
            Some(Some(id)) => {
                self.controller.apply(EditorCommand::SelectBand(id));
            }
            Some(None) => {
                self.controller.apply(EditorCommand::ClearSelection);
            }
            None => {}
        }
        if let Some(kind) = inspector_actions.kind {
            self.controller.apply(EditorCommand::SetKind(kind));
        }
        for (field, text) in inspector_actions.commits {
            self.controller.update_field_text(field, &text);
        }

        self.sync_engine();

        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window.width = rect.width();
            self.settings.window.height = rect.height();
        }

        if self.is_playing || self.controller.state().drag_active {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.ui_handle.is_some() {
            self.stop_audio();
        }
        self.save_settings();
    }
}
