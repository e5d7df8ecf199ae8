// Sinks for the emulated front panel. Display and lights write into the
// shared DisplayState the TUI draws every frame; the tone sink also shows up
// on the panel and forwards to the buzzer thread when there is one.
use crossbeam_channel::Sender;

use super::sinks::{DisplaySink, LightSink, SinkError, Sinks, ToneSink};
use crate::audio_api::ToneCommand;
use crate::shared::{pad_row, DisplayState, SharedPanel, NUM_LIGHTS};

pub fn panel_sinks(panel: &SharedPanel, buzzer: Option<Sender<ToneCommand>>) -> Sinks {
    Sinks {
        display: Box::new(PanelDisplay(panel.clone())),
        lights: Box::new(PanelLights(panel.clone())),
        tone: Box::new(PanelTone {
            panel: panel.clone(),
            buzzer,
        }),
    }
}

fn write_panel<F>(panel: &SharedPanel, err: fn(String) -> SinkError, f: F) -> Result<(), SinkError>
where
    F: FnOnce(&mut DisplayState),
{
    let mut state = panel.write().map_err(|e| err(e.to_string()))?;
    f(&mut state);
    Ok(())
}

pub struct PanelDisplay(SharedPanel);

impl DisplaySink for PanelDisplay {
    fn render(&mut self, top: &str, bottom: &str) -> Result<(), SinkError> {
        write_panel(&self.0, SinkError::Display, |state| {
            state.rows = [pad_row(top), pad_row(bottom)];
        })
    }
}

pub struct PanelLights(SharedPanel);

impl LightSink for PanelLights {
    fn count(&self) -> usize {
        NUM_LIGHTS
    }

    fn set(&mut self, index: usize, on: bool) -> Result<(), SinkError> {
        write_panel(&self.0, SinkError::Lights, |state| {
            if let Some(light) = state.lights.get_mut(index) {
                *light = on;
            }
        })
    }
}

pub struct PanelTone {
    panel: SharedPanel,
    buzzer: Option<Sender<ToneCommand>>, // None when there's no audio device
}

impl PanelTone {
    fn send(&self, cmd: ToneCommand) -> Result<(), SinkError> {
        match &self.buzzer {
            Some(tx) => tx.try_send(cmd).map_err(|e| SinkError::Tone(e.to_string())),
            None => Ok(()),
        }
    }
}

impl ToneSink for PanelTone {
    fn start(&mut self, hz: u16) -> Result<(), SinkError> {
        write_panel(&self.panel, SinkError::Tone, |state| state.tone_hz = Some(hz))?;
        self.send(ToneCommand::Start { hz })
    }

    fn stop(&mut self) -> Result<(), SinkError> {
        write_panel(&self.panel, SinkError::Tone, |state| state.tone_hz = None)?;
        self.send(ToneCommand::Stop)
    }
}
