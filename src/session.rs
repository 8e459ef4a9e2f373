//! Session: the Play/Pause surface of the showcase.
//!
//! Owns the audio output and the groove clock. The engine is built lazily on
//! the first Play; later toggles only suspend and resume the output, so the
//! schedule picks up where the clock stopped. Both the CLI and the headless
//! tests drive the groove through this type.

use crate::clock::ClockMonitor;
use crate::config::GrooveConfig;
use crate::engine::GrooveEngine;
use crate::log::LogBuffer;
use crate::song;
use serde::Serialize;
use std::fmt;

/// Where the groove audio goes. Implemented by `Player` for real output.
pub trait AudioOutput {
    /// Start playing a freshly built engine.
    fn start(&mut self, engine: GrooveEngine) -> Result<(), String>;
    /// Suspend output; the engine clock stops advancing.
    fn suspend(&mut self);
    /// Resume suspended output.
    fn resume(&mut self);
    /// Stop output and drop the engine.
    fn stop(&mut self);
    fn is_suspended(&self) -> bool;
}

/// Opens the audio output on first Play.
pub type OutputOpener<O> = Box<dyn FnMut() -> Result<O, String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    /// Nothing built yet.
    Idle,
    Playing,
    Paused,
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayState::Idle => write!(f, "idle"),
            PlayState::Playing => write!(f, "playing"),
            PlayState::Paused => write!(f, "paused"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportData {
    pub state: PlayState,
    pub button_label: &'static str,
    pub elapsed_secs: f64,
    pub bar: u64,
    pub section_index: usize,
    pub section_title: &'static str,
    pub chord: &'static str,
}

pub struct Session<O: AudioOutput> {
    config: GrooveConfig,
    state: PlayState,
    output: Option<O>,
    opener: OutputOpener<O>,
    clock: ClockMonitor,
    seed: Option<u64>,
    pub log: LogBuffer,
}

impl<O: AudioOutput> Session<O> {
    pub fn new(config: GrooveConfig, opener: OutputOpener<O>) -> Self {
        Session {
            clock: ClockMonitor::new(config.sample_rate),
            config,
            state: PlayState::Idle,
            output: None,
            opener,
            seed: None,
            log: LogBuffer::new(),
        }
    }

    /// Use reproducible noise for the hats and ride.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn config(&self) -> &GrooveConfig {
        &self.config
    }

    pub fn clock(&self) -> &ClockMonitor {
        &self.clock
    }

    pub fn output(&self) -> Option<&O> {
        self.output.as_ref()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_playing() {
            "Pause Groove"
        } else {
            "Play Groove"
        }
    }

    /// Section to highlight; follows the bars the audio clock has covered.
    pub fn current_section(&self) -> usize {
        self.clock.section_index(&self.config)
    }

    /// Flip between playing and paused. The first Play opens the output and
    /// builds the engine; failures leave the session idle.
    pub fn toggle(&mut self) -> Result<PlayState, String> {
        match self.state {
            PlayState::Idle => self.start()?,
            PlayState::Paused => {
                if let Some(output) = self.output.as_mut() {
                    output.resume();
                }
                self.state = PlayState::Playing;
                self.log
                    .info(format!("Groove resumed at {:.2}s", self.clock.elapsed_secs()));
            }
            PlayState::Playing => {
                if let Some(output) = self.output.as_mut() {
                    output.suspend();
                }
                self.state = PlayState::Paused;
                self.log
                    .info(format!("Groove paused at {:.2}s", self.clock.elapsed_secs()));
            }
        }
        Ok(self.state)
    }

    /// Stop the groove and release the output. The next toggle builds a
    /// fresh engine from bar one.
    pub fn stop(&mut self) {
        if let Some(mut output) = self.output.take() {
            output.stop();
        }
        if self.state != PlayState::Idle {
            self.log
                .info(format!("Groove stopped at {:.2}s", self.clock.elapsed_secs()));
        }
        self.state = PlayState::Idle;
        self.clock.reset();
    }

    fn start(&mut self) -> Result<(), String> {
        let engine = match self.seed {
            Some(seed) => GrooveEngine::with_seed(self.config, self.clock.clone(), seed),
            None => GrooveEngine::new(self.config, self.clock.clone()),
        };
        let engine = engine.inspect_err(|e| self.log.error(e.clone()))?;

        let mut output = (self.opener)().inspect_err(|e| self.log.error(e.clone()))?;
        output
            .start(engine)
            .inspect_err(|e| self.log.error(e.clone()))?;

        self.output = Some(output);
        self.state = PlayState::Playing;
        self.log.info(format!(
            "Groove started: {} BPM, swing {}",
            self.config.tempo, self.config.swing_ratio
        ));
        Ok(())
    }

    pub fn status(&self) -> TransportData {
        let bar = self.clock.bar(&self.config);
        let section_index = song::section_for_bar(bar);
        TransportData {
            state: self.state,
            button_label: self.button_label(),
            elapsed_secs: self.clock.elapsed_secs(),
            bar,
            section_index,
            section_title: song::sections()[section_index].title,
            chord: song::chord_for_bar(bar),
        }
    }
}
