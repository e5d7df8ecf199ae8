// Lyric side of a song: which line is current for a given note, and pulling
// a single line out of the packed lyric text.
//
// Lines are tied to notes through `line_note_counts`: entry i says how many
// notes belong to line i. A 0 (or the end of the table) means "no more
// explicit lines", and every note after that stays on the last line reached.

use crate::pipeline::song::Song;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinePosition {
    pub index: usize,      // which lyric line
    pub start_note: usize, // first note slot of the line
    pub span: usize,       // how many notes the line covers, always >= 1
}

/// Find the lyric line that note `notes_played` belongs to.
pub fn locate(song: &Song, notes_played: usize) -> LinePosition {
    let counts = song.line_note_counts;
    let mut index = 0;
    let mut start_note = 0;

    loop {
        let count = counts.get(index).copied().unwrap_or(0) as usize;
        if count == 0 || notes_played < start_note + count {
            break;
        }
        start_note += count;
        index += 1;
    }

    let span = match counts.get(index).copied().unwrap_or(0) as usize {
        // ran off the table: the rest of the song belongs to this line
        0 => song.true_length.saturating_sub(start_note).max(1),
        count => count,
    };

    LinePosition {
        index,
        start_note,
        span,
    }
}

/// Fixed-capacity text buffer for one display line. Like the device's char
/// buffer it reserves one slot for the terminator, so it holds at most
/// `N - 1` bytes (nothing at all when `N == 0`).
#[derive(Clone, Copy, Debug)]
pub struct LineBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Copy as much of `text` as fits, whole chars only. Returns true if
    /// anything had to be cut.
    pub fn fill(&mut self, text: &str) -> bool {
        self.len = 0;
        let cap = self.capacity();
        for ch in text.chars() {
            let width = ch.len_utf8();
            if self.len + width > cap {
                return true;
            }
            ch.encode_utf8(&mut self.bytes[self.len..self.len + width]);
            self.len += width;
        }
        false
    }

    pub fn as_str(&self) -> &str {
        // only ever filled with whole chars in fill()
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy lyric line `line` of `song` into `buf`.
///
/// Returns false, leaving `buf` empty, when the song has no such line; the
/// engine shows that as a blank row. A trailing newline does not start an
/// extra line. Lines longer than the buffer are cut, never overflowed.
pub fn extract_line<const N: usize>(song: &Song, line: usize, buf: &mut LineBuffer<N>) -> bool {
    extract_from(song.lyrics, line, buf)
}

fn extract_from<const N: usize>(lyrics: &str, line: usize, buf: &mut LineBuffer<N>) -> bool {
    buf.clear();
    match lyrics.lines().nth(line) {
        Some(text) => {
            if buf.fill(text) {
                log::debug!("lyric line {line} truncated to {} bytes", buf.capacity());
            }
            true
        }
        None => false,
    }
}
