// Buzzer pitches in Hz, rounded to the nearest integer like a tone() table.
pub use crate::shared::REST;

pub const C4: u16 = 262;
pub const D4: u16 = 294;
pub const E4: u16 = 330;
pub const F4: u16 = 349;
pub const G4: u16 = 392;
pub const A4: u16 = 440;
pub const BB4: u16 = 466;
pub const B4: u16 = 494;
pub const C5: u16 = 523;
pub const D5: u16 = 587;
pub const E5: u16 = 659;
pub const F5: u16 = 698;
pub const G5: u16 = 784;

// duration units; one unit is an eighth note
pub const EIGHTH: u8 = 1;
pub const QUARTER: u8 = 2;
pub const DOTTED_QUARTER: u8 = 3;
pub const HALF: u8 = 4;
