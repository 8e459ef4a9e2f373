//! Midnight Honey: procedural swung jazz groove with a lyric/chord sheet.
//!
//! The look-ahead scheduler, rhythm section and mixer live here.
//! The CLI consumes this crate.

pub mod clock;
pub mod config;
pub mod engine;
pub mod log;
pub mod player;
pub mod rhythm;
pub mod session;
pub mod sheet;
pub mod song;
pub mod swing;
pub mod voice;
