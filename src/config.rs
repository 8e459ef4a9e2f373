use serde::{Deserialize, Serialize};

/// Groove constants shared by the scheduler, the voices and the display.
///
/// The values are fixed for the song; `Default` is the only constructor the
/// CLI uses. Tests build variants to check timing math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrooveConfig {
    /// Beats per minute (beat = quarter note).
    pub tempo: f32,
    /// Fraction controlling how late offbeats land. 1.0 is straight; offbeats
    /// are pushed back by `1 - swing_ratio` of a beat.
    pub swing_ratio: f32,
    /// How far past the audio clock the scheduler queues beats, in seconds.
    pub lookahead_secs: f32,
    /// Gap between engine start and the first downbeat, in seconds.
    pub start_delay_secs: f32,
    pub beats_per_bar: u32,
    /// Scheduler polling interval (one display frame).
    pub frame_secs: f32,
    pub sample_rate: u32,
    pub master_gain: f32,
    /// Bus shared by hats and chord pads.
    pub swing_gain: f32,
    pub bass_gain: f32,
    pub ride_gain: f32,
}

impl GrooveConfig {
    pub fn new() -> Self {
        GrooveConfig {
            tempo: 96.0,
            swing_ratio: 0.6,
            lookahead_secs: 0.2,
            start_delay_secs: 0.1,
            beats_per_bar: 4,
            frame_secs: 1.0 / 60.0,
            sample_rate: 44_100,
            master_gain: 0.4,
            swing_gain: 0.5,
            bass_gain: 0.35,
            ride_gain: 0.25,
        }
    }

    /// Seconds per beat.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.tempo as f64
    }

    /// Seconds per bar.
    pub fn bar_duration(&self) -> f64 {
        self.beat_duration() * self.beats_per_bar as f64
    }

    /// Number of output samples in one polling frame (at least one).
    pub fn frame_samples(&self) -> u64 {
        ((self.frame_secs as f64 * self.sample_rate as f64).round() as u64).max(1)
    }

    /// Convert a time in seconds to a sample index (rounded down, clamped at zero).
    pub fn secs_to_samples(&self, secs: f64) -> u64 {
        (secs.max(0.0) * self.sample_rate as f64) as u64
    }

    /// Reject values the timing math cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.tempo.is_nan() || self.tempo <= 0.0 {
            return Err(format!("Tempo must be positive, got {}", self.tempo));
        }
        if !(0.0..=1.0).contains(&self.swing_ratio) {
            return Err(format!(
                "Swing ratio must be between 0 and 1, got {}",
                self.swing_ratio
            ));
        }
        if self.beats_per_bar == 0 {
            return Err("Beats per bar must be at least 1".to_string());
        }
        if self.sample_rate == 0 {
            return Err("Sample rate must be positive".to_string());
        }
        if self.lookahead_secs < 0.0 || self.start_delay_secs < 0.0 {
            return Err("Look-ahead and start delay cannot be negative".to_string());
        }
        Ok(())
    }
}

impl Default for GrooveConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tempo_gives_expected_durations() {
        let cfg = GrooveConfig::default();
        assert!((cfg.beat_duration() - 0.625).abs() < 1e-9);
        assert!((cfg.bar_duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn frame_samples_matches_sixty_fps() {
        let cfg = GrooveConfig::default();
        assert_eq!(cfg.frame_samples(), 735);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(GrooveConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_tempo() {
        let cfg = GrooveConfig {
            tempo: 0.0,
            ..GrooveConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("Tempo"));
    }

    #[test]
    fn validate_rejects_nan_tempo() {
        let cfg = GrooveConfig {
            tempo: f32::NAN,
            ..GrooveConfig::default()
        };
        assert!(cfg.validate().unwrap_err().contains("Tempo"));
    }

    #[test]
    fn validate_rejects_swing_out_of_range() {
        let cfg = GrooveConfig {
            swing_ratio: 1.5,
            ..GrooveConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn secs_to_samples_clamps_negative() {
        let cfg = GrooveConfig::default();
        assert_eq!(cfg.secs_to_samples(-1.0), 0);
        assert_eq!(cfg.secs_to_samples(1.0), 44_100);
    }

    #[test]
    fn config_survives_serialization() {
        let cfg = GrooveConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let loaded: GrooveConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, cfg);
    }
}
