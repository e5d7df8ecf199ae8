// Device layout shared by the player core and the terminal front end.
//
// The emulated box has:
//   - a 2 row x 16 column character display (current lyric line + next line)
//   - 5 indicator lights, one lit per sounding note
//   - a piezo buzzer that plays one frequency at a time
//
// Keys (handled in tui/input.rs):
//   1-9         //  SelectSong(0..8)
//   s / Space   //  Stop (aborts between notes)
//   Esc / q     //  Quit
//
// The rendering process mirrors the hardware: the player writes into the
// shared DisplayState through its sinks, the TUI just draws whatever is in
// there every frame.

use std::sync::{Arc, RwLock};

pub const NUM_LIGHTS: usize = 5;
pub const DISPLAY_WIDTH: usize = 16;
pub const DISPLAY_ROWS: usize = 2;

// every song row in the catalog is this many note slots wide, extra slots are padding
pub const CATALOG_WIDTH: usize = 64;

// pitch value that means "no tone"
pub const REST: u16 = 0;

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    SelectSong(usize), // 0-based catalog index
    Stop,
    Quit,
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub rows: [String; DISPLAY_ROWS], // always exactly DISPLAY_WIDTH chars each
    pub lights: [bool; NUM_LIGHTS],
    pub tone_hz: Option<u16>, // what the buzzer is doing right now
    pub playing: Option<usize>, // catalog index of the song being played
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            rows: std::array::from_fn(|_| pad_row("")),
            lights: [false; NUM_LIGHTS],
            tone_hz: None,
            playing: None,
        }
    }
}

// shared between the playback worker (writes) and the tui (reads)
pub type SharedPanel = Arc<RwLock<DisplayState>>;

pub fn new_shared_panel() -> SharedPanel {
    Arc::new(RwLock::new(DisplayState::default()))
}

/// Pad or cut `text` to exactly [`DISPLAY_WIDTH`] characters so nothing from
/// a previous render survives on the row.
pub fn pad_row(text: &str) -> String {
    let mut row: String = text.chars().take(DISPLAY_WIDTH).collect();
    let used = row.chars().count();
    row.extend(std::iter::repeat_n(' ', DISPLAY_WIDTH - used));
    row
}
