//! Named sound cues and the sinks that play them.
//!
//! The game never waits on audio and never fails because of it: a sink that
//! cannot play returns an error the caller logs and drops.

mod synth;

pub use synth::{Synth, melody_ticks};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Flap,
    Score,
    Hit,
    Die,
    Button,
    Whoosh,
    Medal,
    /// Festive flap.
    Jingle,
    /// Festive celebration.
    SleighBells,
    /// One pass of the festive background melody.
    Music,
}

impl Cue {
    pub const ALL: [Cue; 10] = [
        Cue::Flap,
        Cue::Score,
        Cue::Hit,
        Cue::Die,
        Cue::Button,
        Cue::Whoosh,
        Cue::Medal,
        Cue::Jingle,
        Cue::SleighBells,
        Cue::Music,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Cue::Flap => "flap",
            Cue::Score => "score",
            Cue::Hit => "hit",
            Cue::Die => "die",
            Cue::Button => "button",
            Cue::Whoosh => "whoosh",
            Cue::Medal => "medal",
            Cue::Jingle => "jingle",
            Cue::SleighBells => "sleigh_bells",
            Cue::Music => "music",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub enum AudioError {
    /// No output device could be opened.
    Unavailable(String),
    /// The device is open but refused the sound.
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable(e) => write!(f, "audio unavailable: {e}"),
            AudioError::Playback(e) => write!(f, "playback failed: {e}"),
        }
    }
}

impl std::error::Error for AudioError {}

pub trait CueSink {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
    /// Cuts the background melody short, if one is playing.
    fn stop_music(&mut self);
    fn set_muted(&mut self, muted: bool);
}

/// Plays nothing. Stands in when no output device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl CueSink for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_music(&mut self) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// Opens the default device, falling back to silence when there is none.
pub fn open() -> Box<dyn CueSink> {
    match Synth::try_new() {
        Ok(synth) => Box::new(synth),
        Err(e) => {
            tracing::warn!("{e}; continuing without sound");
            Box::new(Silent)
        }
    }
}
