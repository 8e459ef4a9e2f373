//! Rhythm section: what sounds on each scheduled beat.
//!
//! Hats on every beat, ride and chord pad on the downbeat, bass on beats
//! one and four. `plan_beat` is the pure description used by the timeline
//! dump and the tests; `voices_for` turns a plan into engine voices.

use crate::config::GrooveConfig;
use crate::song;
use crate::swing::{BeatPosition, ScheduledBeat, SwingScheduler};
use crate::voice::{noise_burst, Bus, Envelope, Voice, Waveform};
use serde::Serialize;

/// Beats within the bar that get a bass note.
pub const BASS_BEATS: [u32; 2] = [0, 3];

/// Semitone offsets from the chord root walked by the bass.
pub const BASS_STEPS: [u32; 4] = [0, 5, 7, 3];

/// Semitone stack above the root used for the chord pad (root, 3, 5, b7, 9).
pub const PAD_INTERVALS: [u32; 5] = [0, 4, 7, 10, 14];

pub const HAT_SECS: f32 = 0.08;
pub const HAT_DECAY: f32 = 0.35;
pub const RIDE_SECS: f32 = 0.15;
pub const RIDE_DECAY: f32 = 0.8;
pub const BASS_STOP_SECS: f32 = 0.5;
pub const PAD_STOP_SECS: f32 = 1.9;

/// Longest timeline `timeline` will build.
pub const MAX_TIMELINE_BARS: u64 = 10_000;

/// Everything triggered by one beat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatPlan {
    pub time: f64,
    pub position: BeatPosition,
    pub section: usize,
    pub chord: &'static str,
    pub root_hz: f32,
    pub hat: bool,
    pub ride: bool,
    pub bass_hz: Option<f32>,
    /// Pad frequencies, present on downbeats only.
    pub pad_hz: Option<Vec<f32>>,
}

/// Frequency ratio for `semitones` above a root.
pub fn semitone_ratio(semitones: u32) -> f32 {
    2f32.powf(semitones as f32 / 12.0)
}

/// Bass step (in semitones) for a beat.
///
/// The walk is indexed by the number of downbeats already played plus the
/// beat within the bar. The downbeat's own bar is not counted until its
/// bass note has been chosen.
pub fn bass_step(position: &BeatPosition) -> u32 {
    let bars_started = if position.is_downbeat() {
        position.bar
    } else {
        position.bar + 1
    };
    let idx = (bars_started + position.beat_in_bar as u64) % BASS_STEPS.len() as u64;
    BASS_STEPS[idx as usize]
}

/// Describe what a scheduled beat triggers.
pub fn plan_beat(beat: ScheduledBeat, config: &GrooveConfig) -> BeatPlan {
    let position = BeatPosition::from_beat(beat.beat, config.beats_per_bar);
    let chord = song::chord_for_bar(position.bar);
    let root_hz = song::root_or_default(chord);
    let downbeat = position.is_downbeat();

    let bass_hz = BASS_BEATS
        .contains(&position.beat_in_bar)
        .then(|| root_hz * semitone_ratio(bass_step(&position)));
    let pad_hz = downbeat.then(|| {
        PAD_INTERVALS
            .iter()
            .map(|&i| root_hz * semitone_ratio(i))
            .collect()
    });

    BeatPlan {
        time: beat.time,
        position,
        section: song::section_for_bar(position.bar),
        chord,
        root_hz,
        hat: true,
        ride: downbeat,
        bass_hz,
        pad_hz,
    }
}

/// Samples in a noise burst of `secs`, rounded to the nearest sample.
pub fn burst_len(sample_rate: u32, secs: f32) -> usize {
    (sample_rate as f64 * secs as f64).round() as usize
}

/// Build the engine voices for a planned beat.
pub fn voices_for(plan: &BeatPlan, config: &GrooveConfig, rng: &mut fastrand::Rng) -> Vec<Voice> {
    let rate = config.sample_rate;
    let start = config.secs_to_samples(plan.time);
    let mut voices = Vec::new();

    if plan.ride {
        let len = burst_len(rate, RIDE_SECS);
        voices.push(Voice::noise(noise_burst(rng, len, RIDE_DECAY), Bus::Ride, start));
    }

    if plan.hat {
        let len = burst_len(rate, HAT_SECS);
        voices.push(Voice::noise(noise_burst(rng, len, HAT_DECAY), Bus::Swing, start));
    }

    if let Some(freq) = plan.bass_hz {
        voices.push(Voice::tone(
            Waveform::Sawtooth,
            freq,
            Envelope::bass(),
            Bus::Bass,
            start,
            BASS_STOP_SECS,
            rate,
        ));
    }

    if let Some(pad) = &plan.pad_hz {
        for &freq in pad {
            voices.push(Voice::tone(
                Waveform::Sine,
                freq,
                Envelope::pad(),
                Bus::Swing,
                start,
                PAD_STOP_SECS,
                rate,
            ));
        }
    }

    voices
}

/// Run the scheduler the way the engine does, one frame at a time, and
/// return the plans for the first `bars` bars.
pub fn timeline(config: &GrooveConfig, bars: u64) -> Result<Vec<BeatPlan>, String> {
    if bars > MAX_TIMELINE_BARS {
        return Err(format!(
            "Timeline limited to {} bars, got {}",
            MAX_TIMELINE_BARS, bars
        ));
    }
    let wanted = bars
        .checked_mul(config.beats_per_bar as u64)
        .ok_or_else(|| format!("Timeline of {} bars is too long", bars))?;
    let mut scheduler = SwingScheduler::new(config.start_delay_secs as f64, config);
    let frame = config.frame_secs as f64;
    let mut plans = Vec::new();
    let mut now = 0.0;
    while scheduler.next_beat() < wanted {
        scheduler.poll(now, |beat| plans.push(plan_beat(beat, config)));
        now += frame;
    }
    plans.truncate(wanted as usize);
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(beat: u64) -> BeatPlan {
        let cfg = GrooveConfig::default();
        let sched = SwingScheduler::new(0.0, &cfg);
        plan_beat(
            ScheduledBeat {
                time: sched.swung_time(beat),
                beat,
            },
            &cfg,
        )
    }

    #[test]
    fn hat_on_every_beat() {
        assert!((0..16).all(|b| plan(b).hat));
    }

    #[test]
    fn ride_and_pad_only_on_downbeats() {
        for b in 0..16 {
            let p = plan(b);
            assert_eq!(p.ride, b % 4 == 0, "ride on beat {}", b);
            assert_eq!(p.pad_hz.is_some(), b % 4 == 0, "pad on beat {}", b);
        }
    }

    #[test]
    fn bass_on_first_and_fourth_beat() {
        let with_bass: Vec<u64> = (0..8).filter(|&b| plan(b).bass_hz.is_some()).collect();
        assert_eq!(with_bass, vec![0, 3, 4, 7]);
    }

    #[test]
    fn bass_step_walks_per_bar() {
        let steps: Vec<u32> = (0..4)
            .map(|bar| bass_step(&BeatPosition::from_beat(bar * 4, 4)))
            .collect();
        assert_eq!(steps, vec![0, 5, 7, 3]);
        // beat 4 of a bar lands on the same step as its downbeat
        for bar in 0..8 {
            let down = bass_step(&BeatPosition::from_beat(bar * 4, 4));
            let fourth = bass_step(&BeatPosition::from_beat(bar * 4 + 3, 4));
            assert_eq!(down, fourth);
        }
    }

    #[test]
    fn bass_frequency_transposes_chord_root() {
        // bar 1 → Chorus, chord G7b9 (196 Hz), step 5
        let p = plan(4);
        assert_eq!(p.chord, "G7b9");
        let expected = 196.0 * semitone_ratio(5);
        assert!((p.bass_hz.unwrap() - expected).abs() < 1e-3);
    }

    #[test]
    fn pad_stack_starts_at_root() {
        let p = plan(0);
        let pad = p.pad_hz.unwrap();
        assert_eq!(pad.len(), 5);
        assert!((pad[0] - 130.81).abs() < 1e-3);
        assert!((pad[4] - 130.81 * semitone_ratio(14)).abs() < 1e-3);
    }

    #[test]
    fn section_follows_bar() {
        assert_eq!(plan(0).section, 0);
        assert_eq!(plan(4).section, 1);
        assert_eq!(plan(8).section, 2);
        assert_eq!(plan(12).section, 0);
    }

    #[test]
    fn downbeat_voice_count() {
        let cfg = GrooveConfig::default();
        let mut rng = fastrand::Rng::with_seed(1);
        // ride + hat + bass + five pad tones
        assert_eq!(voices_for(&plan(0), &cfg, &mut rng).len(), 8);
        // hat only
        assert_eq!(voices_for(&plan(1), &cfg, &mut rng).len(), 1);
        // hat + bass
        assert_eq!(voices_for(&plan(3), &cfg, &mut rng).len(), 2);
    }

    #[test]
    fn voices_start_at_beat_time() {
        let cfg = GrooveConfig::default();
        let mut rng = fastrand::Rng::with_seed(1);
        let p = plan(1);
        let voices = voices_for(&p, &cfg, &mut rng);
        assert_eq!(voices[0].start, cfg.secs_to_samples(p.time));
        assert_eq!(voices[0].len, 3528);
    }

    #[test]
    fn timeline_covers_requested_bars_in_order() {
        let cfg = GrooveConfig::default();
        let plans = timeline(&cfg, 3).unwrap();
        assert_eq!(plans.len(), 12);
        assert!(plans.iter().enumerate().all(|(i, p)| p.position.beat == i as u64));
        assert!((plans[0].time - 0.1).abs() < 1e-6);
        assert_eq!(plans[4].chord, "G7b9");
    }

    #[test]
    fn timeline_of_zero_bars_is_empty() {
        assert!(timeline(&GrooveConfig::default(), 0).unwrap().is_empty());
    }

    #[test]
    fn timeline_rejects_huge_bar_counts() {
        let cfg = GrooveConfig::default();
        let err = timeline(&cfg, u64::MAX / 2).unwrap_err();
        assert!(err.contains("limited"), "{}", err);
        assert!(timeline(&cfg, MAX_TIMELINE_BARS + 1).is_err());
    }

    #[test]
    fn burst_lengths_round_to_nearest_sample() {
        assert_eq!(burst_len(44_100, HAT_SECS), 3528);
        assert_eq!(burst_len(44_100, RIDE_SECS), 6615);
    }
}
