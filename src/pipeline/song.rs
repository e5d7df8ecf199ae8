use crate::pipeline::tempo;
use crate::player::PlaybackError;
use crate::shared::{CATALOG_WIDTH, REST};

/// One catalog row: parallel per-note tracks plus the lyric that rides on top.
///
/// Only the first `true_length` slots of each track are meaningful; the rest
/// is padding and must never be read by playback.
#[derive(Clone, Debug)]
pub struct Song {
    pub title: &'static str,
    pub pitches: [u16; CATALOG_WIDTH],   // Hz, REST for silence
    pub durations: [u8; CATALOG_WIDTH],  // in duration units (eighth notes)
    pub lights: [u8; CATALOG_WIDTH],     // indicator index, clamped at playback
    pub true_length: usize,
    pub tempo: u16,                      // beats per minute
    pub lyrics: &'static str,            // newline separated lines
    pub line_note_counts: &'static [u16], // notes per lyric line, 0 terminated
}

impl Song {
    /// Build a catalog row from unpadded tracks. The true length is taken from
    /// `pitches`; the other tracks are padded (or cut) to match.
    pub const fn new(
        title: &'static str,
        tempo: u16,
        pitches: &[u16],
        durations: &[u8],
        lights: &[u8],
        lyrics: &'static str,
        line_note_counts: &'static [u16],
    ) -> Self {
        let true_length = if pitches.len() < CATALOG_WIDTH {
            pitches.len()
        } else {
            CATALOG_WIDTH
        };
        Self {
            title,
            pitches: pad_u16(pitches, REST),
            durations: pad_u8(durations, 0),
            lights: pad_u8(lights, 0),
            true_length,
            tempo,
            lyrics,
            line_note_counts,
        }
    }

    /// Reject rows the engine cannot play. Nothing else about the data is
    /// fatal: odd light indices and lyric tables are handled at playback.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.true_length == 0 {
            return Err(PlaybackError::EmptySong);
        }
        if self.true_length > CATALOG_WIDTH {
            return Err(PlaybackError::LengthExceedsTracks {
                length: self.true_length,
                width: CATALOG_WIDTH,
            });
        }
        if self.tempo == 0 {
            return Err(PlaybackError::ZeroTempo);
        }
        Ok(())
    }

    // the meaningful part of each track
    pub fn pitch_track(&self) -> &[u16] {
        &self.pitches[..self.true_length.min(CATALOG_WIDTH)]
    }

    pub fn duration_track(&self) -> &[u8] {
        &self.durations[..self.true_length.min(CATALOG_WIDTH)]
    }

    pub fn light_track(&self) -> &[u8] {
        &self.lights[..self.true_length.min(CATALOG_WIDTH)]
    }

    /// Wall-clock length in milliseconds, counting every note the way the
    /// engine schedules it. Only meaningful for a valid song.
    pub fn total_ms(&self) -> u64 {
        let unit = tempo::unit_duration(self.tempo);
        self.duration_track()
            .iter()
            .map(|&units| tempo::note_total(units, unit) as u64)
            .sum()
    }
}

const fn pad_u16(src: &[u16], fill: u16) -> [u16; CATALOG_WIDTH] {
    let mut out = [fill; CATALOG_WIDTH];
    let mut i = 0;
    while i < src.len() && i < CATALOG_WIDTH {
        out[i] = src[i];
        i += 1;
    }
    out
}

const fn pad_u8(src: &[u8], fill: u8) -> [u8; CATALOG_WIDTH] {
    let mut out = [fill; CATALOG_WIDTH];
    let mut i = 0;
    while i < src.len() && i < CATALOG_WIDTH {
        out[i] = src[i];
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Song = Song::new(
        "short",
        120,
        &[440, REST, 494],
        &[2, 1, 4],
        &[0, 0, 3],
        "la la\nla",
        &[2, 0],
    );

    #[test]
    fn new_pads_tracks_and_keeps_true_length() {
        assert_eq!(SHORT.true_length, 3);
        assert_eq!(SHORT.pitch_track(), &[440, REST, 494]);
        assert_eq!(SHORT.duration_track(), &[2, 1, 4]);
        assert_eq!(SHORT.pitches[3], REST);
        assert_eq!(SHORT.durations[CATALOG_WIDTH - 1], 0);
    }

    #[test]
    fn validate_accepts_normal_song() {
        assert!(SHORT.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_tempo_and_empty_songs() {
        let mut song = SHORT.clone();
        song.tempo = 0;
        assert!(matches!(song.validate(), Err(PlaybackError::ZeroTempo)));

        let mut song = SHORT.clone();
        song.true_length = 0;
        assert!(matches!(song.validate(), Err(PlaybackError::EmptySong)));

        let mut song = SHORT.clone();
        song.true_length = CATALOG_WIDTH + 1;
        assert!(matches!(
            song.validate(),
            Err(PlaybackError::LengthExceedsTracks { length, .. }) if length == CATALOG_WIDTH + 1
        ));
    }

    #[test]
    fn total_ms_ignores_padding() {
        // 120 bpm -> 250ms per unit; 2 + 1 + 4 units
        assert_eq!(SHORT.total_ms(), 7 * 250);
    }
}
