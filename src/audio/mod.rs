use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use buzzbox::audio_api::ToneCommand;

mod engine;

use engine::Buzzer;

// Keeps the output stream alive; the stream itself can't leave this thread,
// so the player only gets a clone of the sender.
pub struct AudioHandle {
    tx: Sender<ToneCommand>,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: ToneCommand) {
        let _ = self.tx.try_send(cmd);
    }

    pub fn sender(&self) -> Sender<ToneCommand> {
        self.tx.clone()
    }
}

pub fn start_audio(volume: f32) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<ToneCommand>(256);

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let buzzer = Buzzer::new(sample_rate, volume);
            let output_stream = build_output_stream_f32(&device, &config.into(), rx, buzzer, channels)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!("buzzer on default output: {sample_rate} Hz, {channels} ch");

            Ok(AudioHandle {
                tx,
                _output_stream: output_stream,
            })
        }
        _ => anyhow::bail!("unsupported sample format (only f32 supported for now)"),
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<ToneCommand>,
    mut buzzer: Buzzer,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    let err_fn = |err| log::warn!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                buzzer.handle_cmd(cmd);
            }
            buzzer.render_block(data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
