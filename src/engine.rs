use crate::clock::ClockMonitor;
use crate::config::GrooveConfig;
use crate::rhythm::{plan_beat, voices_for};
use crate::swing::SwingScheduler;
use crate::voice::Voice;
use rodio::Source;
use std::time::Duration;

/// The groove as an endless mono rodio `Source`.
///
/// The engine's clock is the number of samples it has produced. Once per
/// display frame it polls the swing scheduler against that clock, so beats
/// inside the look-ahead window are turned into voices before they are due.
/// Pausing the sink stops the pulls, which stops the clock with it.
pub struct GrooveEngine {
    config: GrooveConfig,
    scheduler: SwingScheduler,
    voices: Vec<Voice>,
    frame: u64,
    next_poll: u64,
    frame_samples: u64,
    clock: ClockMonitor,
    rng: fastrand::Rng,
}

impl GrooveEngine {
    /// Build an engine whose first downbeat lands `start_delay_secs` after its clock starts.
    pub fn new(config: GrooveConfig, clock: ClockMonitor) -> Result<Self, String> {
        Self::with_rng(config, clock, fastrand::Rng::new())
    }

    /// Same as [`new`](Self::new) with reproducible noise.
    pub fn with_seed(config: GrooveConfig, clock: ClockMonitor, seed: u64) -> Result<Self, String> {
        Self::with_rng(config, clock, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(
        config: GrooveConfig,
        clock: ClockMonitor,
        rng: fastrand::Rng,
    ) -> Result<Self, String> {
        config.validate()?;
        clock.reset();
        Ok(GrooveEngine {
            scheduler: SwingScheduler::new(config.start_delay_secs as f64, &config),
            voices: Vec::new(),
            frame: 0,
            next_poll: 0,
            frame_samples: config.frame_samples(),
            config,
            clock,
            rng,
        })
    }

    pub fn config(&self) -> &GrooveConfig {
        &self.config
    }

    pub fn clock(&self) -> &ClockMonitor {
        &self.clock
    }

    /// Current position of the audio clock in seconds.
    pub fn current_time(&self) -> f64 {
        self.frame as f64 / self.config.sample_rate as f64
    }

    /// Voices queued or sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Beats handed to the rhythm section so far.
    pub fn scheduled_beats(&self) -> u64 {
        self.scheduler.next_beat()
    }

    /// One scheduler pass: queue every beat inside the look-ahead window and
    /// drop voices that have finished.
    fn tick(&mut self) {
        let now = self.current_time();
        let beats = self.scheduler.poll_collect(now);
        for beat in beats {
            let plan = plan_beat(beat, &self.config);
            let voices = voices_for(&plan, &self.config, &mut self.rng);
            self.voices.extend(voices);
        }
        let frame = self.frame;
        self.voices.retain(|v| !v.is_finished(frame));
    }

    fn render_sample(&mut self) -> f32 {
        if self.frame >= self.next_poll {
            self.tick();
            self.next_poll = self.frame + self.frame_samples;
        }

        let rate = self.config.sample_rate;
        let frame = self.frame;
        let mix: f32 = self
            .voices
            .iter()
            .map(|v| v.sample_at(frame, rate) * v.bus.gain(&self.config))
            .sum();

        self.frame += 1;
        self.clock.set_frames(self.frame);
        mix * self.config.master_gain
    }
}

impl Iterator for GrooveEngine {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        Some(self.render_sample())
    }
}

impl Source for GrooveEngine {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GrooveEngine {
        let cfg = GrooveConfig::default();
        GrooveEngine::with_seed(cfg, ClockMonitor::new(cfg.sample_rate), 42).unwrap()
    }

    fn render(engine: &mut GrooveEngine, secs: f64) -> Vec<f32> {
        let n = engine.config().secs_to_samples(secs) as usize;
        engine.by_ref().take(n).collect()
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = GrooveConfig {
            tempo: -1.0,
            ..GrooveConfig::default()
        };
        assert!(GrooveEngine::new(cfg, ClockMonitor::new(44_100)).is_err());
    }

    #[test]
    fn silent_before_first_downbeat() {
        let mut e = engine();
        let head = render(&mut e, 0.09);
        assert!(head.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn first_beat_is_queued_ahead_of_time() {
        let mut e = engine();
        let _ = e.next();
        // The first poll at t=0 already sees beat 0 at t=0.1
        assert_eq!(e.scheduled_beats(), 1);
        assert_eq!(e.active_voices(), 8);
    }

    #[test]
    fn sound_starts_at_first_downbeat() {
        let mut e = engine();
        let out = render(&mut e, 0.2);
        let start = GrooveConfig::default().secs_to_samples(0.1) as usize;
        assert!(out[start..].iter().any(|s| s.abs() > 0.0));
    }

    #[test]
    fn output_stays_bounded() {
        let mut e = engine();
        let out = render(&mut e, 6.0);
        let peak = out.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak > 0.01, "expected audible output, peak {}", peak);
        assert!(peak <= 1.0, "output clipped, peak {}", peak);
    }

    #[test]
    fn clock_tracks_rendered_frames() {
        let mut e = engine();
        let clock = e.clock().clone();
        render(&mut e, 1.0);
        assert_eq!(clock.frames(), 44_100);
        assert!((e.current_time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn schedule_resumes_where_clock_stopped() {
        let mut e = engine();
        render(&mut e, 3.0);
        let before = e.scheduled_beats();
        // No samples pulled (paused sink): nothing new is scheduled.
        assert_eq!(e.scheduled_beats(), before);
        render(&mut e, 3.0);
        assert!(e.scheduled_beats() > before);
        // 6s + 0.2s look-ahead, first beat at 0.1s, 0.625s per beat
        assert_eq!(e.scheduled_beats(), 10);
    }

    #[test]
    fn finished_voices_are_dropped() {
        let mut e = engine();
        render(&mut e, 10.0);
        // Pads last 1.9s, so at most one bar's worth of voices plus the next lookahead remain
        assert!(e.active_voices() < 20, "{} voices still alive", e.active_voices());
    }

    #[test]
    fn source_reports_mono_stream() {
        let e = engine();
        assert_eq!(e.channels(), 1);
        assert_eq!(e.sample_rate(), 44_100);
        assert_eq!(e.total_duration(), None);
    }
}
