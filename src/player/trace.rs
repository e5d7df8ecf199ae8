// Sinks that write down everything the engine does instead of driving
// hardware. Used by headless mode (with echo on) and by the tests.
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::sinks::{DisplaySink, LightSink, SinkError, Sinks, Timer, ToneSink};
use crate::shared::pad_row;

#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    Render { top: String, bottom: String },
    Light { index: usize, on: bool },
    ToneStart(u16),
    ToneStop,
    Pause(Duration),
}

#[derive(Clone, Default)]
pub struct Trace {
    events: Arc<Mutex<Vec<SinkEvent>>>,
    echo: bool,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as `new`, but every output change is also logged at info level.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    pub fn sinks(&self, lights: usize) -> Sinks {
        Sinks {
            display: Box::new(TraceDisplay(self.clone())),
            lights: Box::new(TraceLights { trace: self.clone(), count: lights }),
            tone: Box::new(TraceTone(self.clone())),
        }
    }

    pub fn timer(&self) -> RecordingTimer {
        RecordingTimer(self.clone())
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&SinkEvent) -> bool) -> usize {
        self.lock().iter().filter(|e| pred(e)).count()
    }

    /// Light states after replaying every recorded change.
    pub fn lights(&self, count: usize) -> Vec<bool> {
        let mut lit = vec![false; count];
        for event in self.lock().iter() {
            if let SinkEvent::Light { index, on } = event {
                if let Some(slot) = lit.get_mut(*index) {
                    *slot = *on;
                }
            }
        }
        lit
    }

    /// Frequency still sounding after the last recorded change, if any.
    pub fn tone(&self) -> Option<u16> {
        self.lock().iter().fold(None, |tone, event| match event {
            SinkEvent::ToneStart(hz) => Some(*hz),
            SinkEvent::ToneStop => None,
            _ => tone,
        })
    }

    /// Sum of every recorded pause.
    pub fn paused(&self) -> Duration {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Pause(d) => Some(*d),
                _ => None,
            })
            .sum()
    }

    fn push(&self, event: SinkEvent) {
        if self.echo {
            if let Some(line) = echo_line(&event) {
                log::info!("{line}");
            }
        }
        self.lock().push(event);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SinkEvent>> {
        // a test that panicked mid-push shouldn't hide the events from the rest
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// what headless mode prints; rows are shown at the full lcd width
fn echo_line(event: &SinkEvent) -> Option<String> {
    match event {
        SinkEvent::Render { top, bottom } => Some(format!("lcd  |{}|{}|", pad_row(top), pad_row(bottom))),
        SinkEvent::Light { index, on: true } => Some(format!("led  {index} on")),
        SinkEvent::ToneStart(hz) => Some(format!("tone {hz} Hz")),
        _ => None,
    }
}

struct TraceDisplay(Trace);

impl DisplaySink for TraceDisplay {
    fn render(&mut self, top: &str, bottom: &str) -> Result<(), SinkError> {
        self.0.push(SinkEvent::Render {
            top: top.to_string(),
            bottom: bottom.to_string(),
        });
        Ok(())
    }
}

struct TraceLights {
    trace: Trace,
    count: usize,
}

impl LightSink for TraceLights {
    fn count(&self) -> usize {
        self.count
    }

    fn set(&mut self, index: usize, on: bool) -> Result<(), SinkError> {
        if index >= self.count {
            return Err(SinkError::Lights(format!("no light {index}")));
        }
        self.trace.push(SinkEvent::Light { index, on });
        Ok(())
    }
}

struct TraceTone(Trace);

impl ToneSink for TraceTone {
    fn start(&mut self, hz: u16) -> Result<(), SinkError> {
        self.0.push(SinkEvent::ToneStart(hz));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SinkError> {
        self.0.push(SinkEvent::ToneStop);
        Ok(())
    }
}

/// Records pauses into the trace without sleeping.
pub struct RecordingTimer(Trace);

impl Timer for RecordingTimer {
    fn pause(&mut self, duration: Duration) {
        self.0.push(SinkEvent::Pause(duration));
    }
}
