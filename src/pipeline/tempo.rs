// Tempo clock: turns a song's tempo into milliseconds per duration unit.
//
// A beat at `tempo` bpm lasts 60000 / tempo ms, and one duration unit is half
// a beat. Both divisions truncate; the rounding error is part of the timing
// every song was written against, so keep it integer.

const MS_PER_MINUTE: u32 = 60_000;
const UNITS_PER_BEAT: u32 = 2;

/// Milliseconds in one duration unit. Tempo 0 is not a tempo; callers reject
/// it before getting here, and it maps to 0 rather than dividing by zero.
pub fn unit_duration(tempo: u16) -> u32 {
    MS_PER_MINUTE.checked_div(tempo as u32).unwrap_or(0) / UNITS_PER_BEAT
}

/// Full slot length of a note in ms. Never 0, so a degenerate tempo/unit
/// combination can't stall the player.
pub fn note_total(units: u8, unit_ms: u32) -> u32 {
    (units as u32).saturating_mul(unit_ms).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_duration_truncates_like_the_device() {
        assert_eq!(unit_duration(96), 312); // 625 / 2
        assert_eq!(unit_duration(120), 250);
        assert_eq!(unit_duration(100), 300);
        assert_eq!(unit_duration(7), 4285); // 8571 / 2
    }

    #[test]
    fn very_fast_tempo_bottoms_out_at_zero() {
        assert_eq!(unit_duration(u16::MAX), 0);
        assert_eq!(unit_duration(0), 0);
    }

    #[test]
    fn note_total_is_never_zero() {
        assert_eq!(note_total(2, 312), 624);
        assert_eq!(note_total(3, 0), 1);
        assert_eq!(note_total(0, 250), 1);
    }
}
