use crate::config::GrooveConfig;
use crate::song;
use crate::swing::bar_at;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared count of frames the engine has rendered.
/// Written by `GrooveEngine` on the audio thread, read by the display loop.
/// The count stops advancing while the sink is paused, so anything derived
/// from it pauses with the audio.
#[derive(Clone)]
pub struct ClockMonitor {
    frames: Arc<AtomicU64>,
    sample_rate: u32,
}

impl ClockMonitor {
    pub fn new(sample_rate: u32) -> Self {
        ClockMonitor {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub(crate) fn set_frames(&self, frames: u64) {
        self.frames.store(frames, Ordering::Relaxed);
    }

    /// Seconds of audio rendered so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Bar currently sounding (0 until the first downbeat).
    pub fn bar(&self, config: &GrooveConfig) -> u64 {
        bar_at(
            self.elapsed_secs(),
            config.start_delay_secs as f64,
            config.bar_duration(),
        )
    }

    /// Section to highlight for the elapsed bar.
    pub fn section_index(&self, config: &GrooveConfig) -> usize {
        song::section_for_bar(self.bar(config))
    }

    /// Reset the clock to zero (e.g. when a new engine is built).
    pub fn reset(&self) {
        self.set_frames(0);
    }
}
