// Output adapters the engine drives. On the device these are pins and a bus
// and can't fail; hosted versions may, and the engine only logs those errors.
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("display write failed: {0}")]
    Display(String),

    #[error("light write failed: {0}")]
    Lights(String),

    #[error("tone output failed: {0}")]
    Tone(String),
}

/// Two text rows. Implementations must draw exactly the display width on
/// each row, padding with spaces, so nothing from the previous render stays.
pub trait DisplaySink: Send {
    fn render(&mut self, top: &str, bottom: &str) -> Result<(), SinkError>;
}

/// A bank of independent on/off indicators addressed by index. Keeping only
/// one lit at a time is the engine's job, not the sink's.
pub trait LightSink: Send {
    fn count(&self) -> usize;
    fn set(&mut self, index: usize, on: bool) -> Result<(), SinkError>;
}

/// Single-voice tone output. `start` is never called with the rest pitch.
pub trait ToneSink: Send {
    fn start(&mut self, hz: u16) -> Result<(), SinkError>;
    fn stop(&mut self) -> Result<(), SinkError>;
}

/// Timed suspension between output changes.
pub trait Timer: Send {
    fn pause(&mut self, duration: Duration);
}

pub struct SleepTimer;

impl Timer for SleepTimer {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

// Everything the engine writes to, owned by it for as long as it plays.
pub struct Sinks {
    pub display: Box<dyn DisplaySink>,
    pub lights: Box<dyn LightSink>,
    pub tone: Box<dyn ToneSink>,
}
