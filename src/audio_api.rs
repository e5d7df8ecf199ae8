// Commands for the buzzer. The audio callback can't block, so the player
// only ever talks to it through a channel of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToneCommand {
    Start { hz: u16 },
    Stop,
    SetVolume(f32), // 0.0 to 1.0
}
