use buzzbox::audio_api::ToneCommand;

// ~5ms of fade at 48k so starting/stopping a note doesn't click
const RAMP_SAMPLES: f32 = 240.0;

/// Square wave piezo imitation. Lives inside the audio callback, so no
/// allocation and no locking in here.
pub struct Buzzer {
    sample_rate: f32,
    phase: f32,     // 0..1
    phase_inc: f32, // cycles per sample
    amp: f32,       // current level
    target: f32,    // where amp is heading
    volume: f32,
}

impl Buzzer {
    pub fn new(sample_rate: u32, volume: f32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            phase: 0.0,
            phase_inc: 0.0,
            amp: 0.0,
            target: 0.0,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn handle_cmd(&mut self, cmd: ToneCommand) {
        match cmd {
            ToneCommand::Start { hz } if hz > 0 => {
                self.phase_inc = hz as f32 / self.sample_rate;
                self.target = 1.0;
            }
            ToneCommand::Start { .. } | ToneCommand::Stop => self.target = 0.0,
            ToneCommand::SetVolume(v) => self.volume = v.clamp(0.0, 1.0),
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let step = 1.0 / RAMP_SAMPLES;
        if self.amp < self.target {
            self.amp = (self.amp + step).min(self.target);
        } else if self.amp > self.target {
            self.amp = (self.amp - step).max(self.target);
        }
        if self.amp == 0.0 {
            return 0.0;
        }

        let out = if self.phase < 0.5 { 1.0 } else { -1.0 };
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out * self.amp * self.volume
    }

    // fill an interleaved buffer, same value on every channel
    pub fn render_block(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels.max(1)) {
            let s = self.next_sample();
            frame.fill(s);
        }
    }

    #[cfg(test)]
    fn is_sounding(&self) -> bool {
        self.amp > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_started() {
        let mut b = Buzzer::new(48_000, 1.0);
        let mut buf = [1.0f32; 64];
        b.render_block(&mut buf, 2);
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn start_ramps_up_and_stop_ramps_down() {
        let mut b = Buzzer::new(48_000, 0.5);
        b.handle_cmd(ToneCommand::Start { hz: 440 });
        let mut buf = vec![0.0f32; 2000];
        b.render_block(&mut buf, 1);
        assert!(b.is_sounding());
        assert!(buf.iter().all(|s| s.abs() <= 0.5));
        assert!(buf.iter().any(|&s| s == 0.5));
        assert!(buf.iter().any(|&s| s == -0.5));

        b.handle_cmd(ToneCommand::Stop);
        b.render_block(&mut buf, 1);
        assert!(!b.is_sounding());
        assert_eq!(*buf.last().unwrap(), 0.0);
    }

    #[test]
    fn zero_hz_behaves_like_stop() {
        let mut b = Buzzer::new(48_000, 1.0);
        b.handle_cmd(ToneCommand::Start { hz: 0 });
        let mut buf = [0.0f32; 16];
        b.render_block(&mut buf, 1);
        assert!(!b.is_sounding());
    }

    #[test]
    fn channels_get_the_same_sample() {
        let mut b = Buzzer::new(48_000, 1.0);
        b.handle_cmd(ToneCommand::Start { hz: 1000 });
        let mut buf = [0.0f32; 600];
        b.render_block(&mut buf, 3);
        for frame in buf.chunks(3) {
            assert!(frame.iter().all(|&s| s == frame[0]));
        }
    }
}
