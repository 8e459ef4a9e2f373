use crate::engine::GrooveEngine;
use crate::session::AudioOutput;
use rodio::{OutputStream, Sink};

/// Runtime audio player wrapping rodio. Created fresh per session.
pub struct Player {
    _stream: OutputStream,
    sink: Sink,
}

impl Player {
    /// Initialize audio output and create a playback sink.
    pub fn new() -> Result<Self, String> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| format!("Failed to open audio output: {}", e))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
        Ok(Player {
            _stream: stream,
            sink,
        })
    }

    /// Replace whatever is queued with the groove and start playback.
    pub fn play_groove(&self, engine: GrooveEngine) {
        self.sink.stop();
        self.sink.append(engine);
        self.sink.play();
    }

    /// Stop playback and clear the sink.
    pub fn stop(&self) {
        self.sink.stop();
    }

    /// Pause playback (can be resumed). The groove clock stops with it.
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume paused playback.
    pub fn resume(&self) {
        self.sink.play();
    }

    /// Returns true if the sink is paused.
    pub fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }
}

impl AudioOutput for Player {
    fn start(&mut self, engine: GrooveEngine) -> Result<(), String> {
        self.play_groove(engine);
        Ok(())
    }

    fn suspend(&mut self) {
        self.pause();
    }

    fn resume(&mut self) {
        Player::resume(self);
    }

    fn stop(&mut self) {
        Player::stop(self);
    }

    fn is_suspended(&self) -> bool {
        self.is_paused()
    }
}
