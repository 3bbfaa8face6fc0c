//! Text summary of the current EQ, for pasting into review notes.

use super::band::Band;

/// Bands with an absolute gain at or below this are left out of the summary.
pub const EXPORT_GAIN_THRESHOLD: f32 = 0.5;

/// Formats one band as a summary line, e.g. `- 100Hz: +3.2dB (Q1.00)`.
pub fn format_band(band: &Band) -> String {
    format!(
        "- {}Hz: {:+.1}dB (Q{:.2})",
        band.frequency.round() as i64,
        band.gain,
        band.q
    )
}

/// Summarises every band with an audible gain, one line per band.
///
/// Returns `None` when no band qualifies, which callers treat as "nothing to
/// export".
pub fn export_summary(bands: &[Band]) -> Option<String> {
    let lines: Vec<String> = bands
        .iter()
        .filter(|band| band.gain.abs() > EXPORT_GAIN_THRESHOLD)
        .map(format_band)
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
