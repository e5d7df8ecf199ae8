// The song catalog: compiled-in, read-only, handed to the player by reference.

use crate::pipeline::notes::*;
use crate::pipeline::song::Song;

#[derive(Clone, Copy, Debug)]
pub struct Catalog<'a> {
    songs: &'a [Song],
}

impl<'a> Catalog<'a> {
    pub const fn new(songs: &'a [Song]) -> Self {
        Self { songs }
    }

    pub fn get(&self, index: usize) -> Option<&'a Song> {
        self.songs.get(index)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Song> + use<'a> {
        self.songs.iter()
    }
}

impl Catalog<'static> {
    pub fn builtin() -> Self {
        Self::new(&SONGS)
    }
}

pub static SONGS: [Song; 3] = [TWINKLE, HAPPY_BIRTHDAY, ODE_TO_JOY];

const TWINKLE: Song = Song::new(
    "Twinkle Twinkle",
    100,
    &[
        C4, C4, G4, G4, A4, A4, G4,
        F4, F4, E4, E4, D4, D4, C4,
        G4, G4, F4, F4, E4, E4, D4,
        G4, G4, F4, F4, E4, E4, D4,
        C4, C4, G4, G4, A4, A4, G4,
        F4, F4, E4, E4, D4, D4, C4,
    ],
    &[
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
    ],
    &[
        0, 0, 3, 3, 4, 4, 3,
        2, 2, 2, 2, 1, 1, 0,
        3, 3, 2, 2, 2, 2, 1,
        3, 3, 2, 2, 2, 2, 1,
        0, 0, 3, 3, 4, 4, 3,
        2, 2, 2, 2, 1, 1, 0,
    ],
    "Twinkle, twinkle\n\
     little star\n\
     How I wonder\n\
     what you are\n\
     Up above the\n\
     world so high\n\
     Like a diamond\n\
     in the sky\n\
     Twinkle, twinkle\n\
     little star\n\
     How I wonder\n\
     what you are",
    &[4, 3, 4, 3, 4, 3, 4, 3, 4, 3, 4, 3, 0],
);

const HAPPY_BIRTHDAY: Song = Song::new(
    "Happy Birthday",
    120,
    &[
        G4, G4, A4, G4, C5, B4,
        G4, G4, A4, G4, D5, C5,
        G4, G4, G5, E5, C5, B4, A4,
        F5, F5, E5, C5, D5, C5,
    ],
    &[
        EIGHTH, EIGHTH, QUARTER, QUARTER, QUARTER, HALF,
        EIGHTH, EIGHTH, QUARTER, QUARTER, QUARTER, HALF,
        EIGHTH, EIGHTH, QUARTER, QUARTER, QUARTER, QUARTER, HALF,
        EIGHTH, EIGHTH, QUARTER, QUARTER, QUARTER, HALF,
    ],
    &[
        0, 0, 1, 0, 2, 2,
        0, 0, 1, 0, 3, 2,
        0, 0, 4, 3, 2, 2, 1,
        4, 4, 3, 2, 3, 2,
    ],
    "Happy birthday\n\
     to you\n\
     Happy birthday\n\
     to you\n\
     Happy birthday\n\
     dear friend\n\
     Happy birthday\n\
     to you",
    &[4, 2, 4, 2, 4, 3, 4, 2, 0],
);

// the last line has no count of its own and takes whatever notes are left
const ODE_TO_JOY: Song = Song::new(
    "Ode to Joy",
    96,
    &[
        E4, E4, F4, G4, G4, F4, E4, D4, C4, C4, D4, E4, E4, D4, D4,
        REST,
        E4, E4, F4, G4, G4, F4, E4, D4, C4, C4, D4, E4, D4, C4, C4,
    ],
    &[
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER,
        QUARTER, QUARTER, QUARTER, QUARTER, DOTTED_QUARTER, EIGHTH, HALF,
        QUARTER,
        QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER, QUARTER,
        QUARTER, QUARTER, QUARTER, QUARTER, DOTTED_QUARTER, EIGHTH, HALF,
    ],
    &[
        2, 2, 3, 4, 4, 3, 2, 1, 0, 0, 1, 2, 2, 1, 1,
        0,
        2, 2, 3, 4, 4, 3, 2, 1, 0, 0, 1, 2, 1, 0, 0,
    ],
    "Joyful, joyful,\n\
     we adore Thee,\n\
     God of glory,\n\
     Lord of love;\n\
     Hearts unfold\n\
     like flowers\n\
     opening to the\n\
     sun above.",
    &[4, 4, 4, 4, 4, 4, 4, 0],
);
