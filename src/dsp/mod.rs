//! DSP module
//!
//! The audio side of the editor: biquad sections, the EQ chain fed by the
//! effective bands, test signal generation and spectrum analysis.

pub mod analyzer;
pub mod biquad;
pub mod eq_chain;
pub mod smoothed_value;
pub mod source;

pub use analyzer::SpectrumAnalyzer;
pub use biquad::{BiquadCoeffs, BiquadState};
pub use eq_chain::EqChain;
pub use smoothed_value::SmoothedValue;
pub use source::{SignalGenerator, TestSource};

/// Converts decibels to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Converts a linear amplitude to decibels, floored at -120 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(6.0) - 2.0).abs() < 0.01);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_linear_to_db() {
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert!((linear_to_db(0.5) + 6.02).abs() < 0.01);
        assert_eq!(linear_to_db(0.0), -120.0);
    }
}
