//! Synthesis primitives: oscillators, gain envelopes and noise bursts.
//!
//! A `Voice` knows its absolute start sample on the engine clock and how
//! long it lasts, so the mixer only has to ask each voice for the sample at
//! the current frame.

use crate::config::GrooveConfig;
use std::f32::consts::TAU;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

impl Waveform {
    /// Evaluate the waveform at `phase` in [0, 1).
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Sawtooth => phase * 2.0 - 1.0,
        }
    }
}

/// Linear attack to `peak`, then an exponential ramp down to `floor`,
/// then hold at `floor` until the voice stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f32,
    pub attack_secs: f32,
    /// Time (from voice start) at which the exponential ramp reaches `floor`.
    pub release_end_secs: f32,
    pub floor: f32,
}

impl Envelope {
    /// Plucked upright-bass shape.
    pub fn bass() -> Self {
        Envelope {
            peak: 0.45,
            attack_secs: 0.03,
            release_end_secs: 0.45,
            floor: 0.001,
        }
    }

    /// Soft chord-pad shape.
    pub fn pad() -> Self {
        Envelope {
            peak: 0.35,
            attack_secs: 0.02,
            release_end_secs: 1.8,
            floor: 0.001,
        }
    }

    /// Gain `t` seconds after the voice started.
    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 {
            return 0.0;
        }
        if t < self.attack_secs {
            return self.peak * t / self.attack_secs;
        }
        let ramp = self.release_end_secs - self.attack_secs;
        if t < self.release_end_secs && ramp > 0.0 && self.peak > 0.0 {
            let progress = (t - self.attack_secs) / ramp;
            return self.peak * (self.floor / self.peak).powf(progress);
        }
        self.floor
    }
}

/// Gain stage a voice is routed through before the master gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    /// Hats and chord pads.
    Swing,
    Bass,
    Ride,
}

impl Bus {
    pub fn gain(&self, config: &GrooveConfig) -> f32 {
        match self {
            Bus::Swing => config.swing_gain,
            Bus::Bass => config.bass_gain,
            Bus::Ride => config.ride_gain,
        }
    }
}

#[derive(Debug, Clone)]
pub enum VoiceKind {
    Tone {
        waveform: Waveform,
        freq: f32,
        envelope: Envelope,
    },
    /// Pre-rendered buffer, played once.
    Noise { buffer: Arc<[f32]> },
}

#[derive(Debug, Clone)]
pub struct Voice {
    pub kind: VoiceKind,
    pub bus: Bus,
    /// First sample on the engine clock.
    pub start: u64,
    /// Length in samples.
    pub len: u64,
}

impl Voice {
    /// An oscillator voice that stops `stop_secs` after `start`.
    pub fn tone(
        waveform: Waveform,
        freq: f32,
        envelope: Envelope,
        bus: Bus,
        start: u64,
        stop_secs: f32,
        sample_rate: u32,
    ) -> Self {
        Voice {
            kind: VoiceKind::Tone {
                waveform,
                freq,
                envelope,
            },
            bus,
            start,
            len: (stop_secs.max(0.0) as f64 * sample_rate as f64) as u64,
        }
    }

    /// A one-shot noise burst.
    pub fn noise(buffer: Vec<f32>, bus: Bus, start: u64) -> Self {
        let len = buffer.len() as u64;
        Voice {
            kind: VoiceKind::Noise {
                buffer: buffer.into(),
            },
            bus,
            start,
            len,
        }
    }

    /// Sample contributed at engine frame `frame`, before bus gain.
    pub fn sample_at(&self, frame: u64, sample_rate: u32) -> f32 {
        if frame < self.start || frame >= self.start + self.len {
            return 0.0;
        }
        let offset = frame - self.start;
        match &self.kind {
            VoiceKind::Tone {
                waveform,
                freq,
                envelope,
            } => {
                let t = offset as f64 / sample_rate as f64;
                let phase = (*freq as f64 * t).fract() as f32;
                waveform.sample(phase) * envelope.gain_at(t as f32)
            }
            VoiceKind::Noise { buffer } => buffer.get(offset as usize).copied().unwrap_or(0.0),
        }
    }

    /// True once `frame` is past the voice's last sample.
    pub fn is_finished(&self, frame: u64) -> bool {
        frame >= self.start + self.len
    }
}

/// White noise with an exponential fade: sample `i` is scaled by
/// `exp(-i / (len * decay))`.
pub fn noise_burst(rng: &mut fastrand::Rng, len: usize, decay: f32) -> Vec<f32> {
    let tau = (len as f32 * decay).max(f32::EPSILON);
    (0..len)
        .map(|i| (rng.f32() * 2.0 - 1.0) * (-(i as f32) / tau).exp())
        .collect()
}
