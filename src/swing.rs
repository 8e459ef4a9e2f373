//! Look-ahead swing scheduler.
//!
//! Turns a fixed tempo and swing ratio into a stream of beat events. Every
//! poll queues all beats whose straight start falls before `now + lookahead`,
//! so the audio side always has the next events in hand before the clock
//! reaches them. Offbeats (odd beats) are pushed later by the swing shift.

use crate::config::GrooveConfig;
use serde::Serialize;

/// A beat handed to the scheduler callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledBeat {
    /// When the beat should sound, in seconds on the audio clock (swing applied).
    pub time: f64,
    /// Beats since the groove started.
    pub beat: u64,
}

/// Where a beat sits in the song grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeatPosition {
    pub beat: u64,
    pub bar: u64,
    pub beat_in_bar: u32,
}

impl BeatPosition {
    /// Derive bar and beat-in-bar from the integer beat count.
    pub fn from_beat(beat: u64, beats_per_bar: u32) -> Self {
        let per_bar = beats_per_bar.max(1) as u64;
        BeatPosition {
            beat,
            bar: beat / per_bar,
            beat_in_bar: (beat % per_bar) as u32,
        }
    }

    pub fn is_downbeat(&self) -> bool {
        self.beat_in_bar == 0
    }
}

/// True for the odd ("and") beats that get the swing delay.
pub fn is_offbeat(beat: u64) -> bool {
    beat % 2 == 1
}

/// How far an offbeat is delayed past its straight position.
pub fn offbeat_shift(beat_duration: f64, swing_ratio: f64) -> f64 {
    beat_duration * (1.0 - swing_ratio)
}

/// Bar index for a point on the audio clock. Zero before `start_time`.
pub fn bar_at(time: f64, start_time: f64, bar_duration: f64) -> u64 {
    if time <= start_time || bar_duration <= 0.0 {
        return 0;
    }
    ((time - start_time) / bar_duration).floor() as u64
}

pub struct SwingScheduler {
    start_time: f64,
    beat_duration: f64,
    swing_ratio: f64,
    lookahead: f64,
    next_beat: u64,
}

impl SwingScheduler {
    /// Create a scheduler whose beat 0 lands at `start_time`.
    pub fn new(start_time: f64, config: &GrooveConfig) -> Self {
        SwingScheduler {
            start_time,
            beat_duration: config.beat_duration(),
            swing_ratio: config.swing_ratio as f64,
            lookahead: config.lookahead_secs as f64,
            next_beat: 0,
        }
    }

    /// The next beat that has not been scheduled yet.
    pub fn next_beat(&self) -> u64 {
        self.next_beat
    }

    /// Unswung start of `beat`.
    pub fn straight_time(&self, beat: u64) -> f64 {
        self.start_time + self.beat_duration * beat as f64
    }

    /// Start of `beat` with the offbeat shift applied.
    pub fn swung_time(&self, beat: u64) -> f64 {
        let straight = self.straight_time(beat);
        if is_offbeat(beat) {
            straight + offbeat_shift(self.beat_duration, self.swing_ratio)
        } else {
            straight
        }
    }

    /// Schedule every pending beat whose straight start is inside the
    /// look-ahead window. Returns how many beats were handed to `on_beat`.
    pub fn poll<F>(&mut self, now: f64, mut on_beat: F) -> usize
    where
        F: FnMut(ScheduledBeat),
    {
        let horizon = now + self.lookahead;
        let mut scheduled = 0;
        while self.straight_time(self.next_beat) < horizon {
            on_beat(ScheduledBeat {
                time: self.swung_time(self.next_beat),
                beat: self.next_beat,
            });
            self.next_beat += 1;
            scheduled += 1;
        }
        scheduled
    }

    /// Convenience form of [`poll`](Self::poll) that gathers the beats.
    pub fn poll_collect(&mut self, now: f64) -> Vec<ScheduledBeat> {
        let mut beats = Vec::new();
        self.poll(now, |b| beats.push(b));
        beats
    }
}
