//! Playback side of the player: the engine that walks a song's tracks and
//! the output sinks it drives.
//!
//! The engine owns its [`Sinks`] for as long as it exists, so only one song
//! can ever be driving the display, lights and buzzer at a time.

mod engine;
pub mod panel;
pub mod sinks;
pub mod trace;

use thiserror::Error;

pub use engine::{articulate, light_index, AbortFlag, Outcome, PlaybackEngine, PlayerState};
pub use sinks::{DisplaySink, LightSink, SinkError, Sinks, SleepTimer, Timer, ToneSink};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// A song needs at least one note.
    #[error("song has no notes")]
    EmptySong,

    /// `true_length` claims more notes than the tracks hold.
    #[error("song length {length} exceeds track width {width}")]
    LengthExceedsTracks { length: usize, width: usize },

    #[error("song tempo must be positive")]
    ZeroTempo,

    #[error("no song at catalog index {0}")]
    UnknownSong(usize),
}
