use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::sinks::{SinkError, Sinks, Timer};
use super::PlaybackError;
use crate::pipeline::lyrics::{self, LineBuffer};
use crate::pipeline::persistence::PlayerConfig;
use crate::pipeline::song::Song;
use crate::pipeline::tempo;
use crate::shared::{DISPLAY_WIDTH, REST};

const BANNER: &str = "Now playing:";
const DONE: &str = "Song complete";

// one lcd row plus the terminator slot
type RowBuffer = LineBuffer<{ DISPLAY_WIDTH + 1 }>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Announcing,
    Playing { note: usize },
    Draining,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed { notes_played: usize },
    Aborted { notes_played: usize },
}

/// Stop request shared with whoever reads user input. Only looked at between
/// notes, never while a note is sounding.
#[derive(Clone, Debug, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ephemeral per-song state, dropped when play() returns
struct Cursor {
    notes_played: usize,
    last_line: Option<usize>,
    current: RowBuffer,
    next: RowBuffer,
}

impl Cursor {
    fn new() -> Self {
        Self {
            notes_played: 0,
            last_line: None,
            current: RowBuffer::new(),
            next: RowBuffer::new(),
        }
    }
}

/// Walks one song at a time through the display, lights and buzzer.
pub struct PlaybackEngine {
    sinks: Sinks,
    timer: Box<dyn Timer>,
    config: PlayerConfig,
    abort: AbortFlag,
    state: PlayerState,
}

impl PlaybackEngine {
    pub fn new(sinks: Sinks, timer: Box<dyn Timer>, config: PlayerConfig) -> Self {
        Self {
            sinks,
            timer,
            config,
            abort: AbortFlag::new(),
            state: PlayerState::Idle,
        }
    }

    pub fn with_abort(mut self, abort: AbortFlag) -> Self {
        self.abort = abort;
        self
    }

    pub fn abort_flag(&self) -> AbortFlag {
        self.abort.clone()
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Play `song` start to finish, blocking the calling thread.
    ///
    /// An unplayable song is rejected before any output is touched. Once
    /// playing, output failures are logged and skipped; the only early exit
    /// is the abort flag, which leaves every output cleared.
    ///
    /// The flag is never cleared here. Whoever queues the song clears it
    /// first, so a stop raised after that point is always seen.
    pub fn play(&mut self, song: &Song) -> Result<Outcome, PlaybackError> {
        song.validate()?;

        info!(
            "playing '{}': {} notes at {} bpm (~{} ms)",
            song.title,
            song.true_length,
            song.tempo,
            song.total_ms()
        );

        self.announce(song);
        let outcome = self.play_notes(song);
        match outcome {
            Outcome::Completed { .. } => self.finish(song),
            Outcome::Aborted { notes_played } => {
                info!("'{}' stopped after {} notes", song.title, notes_played);
                self.silence();
                report(self.sinks.display.render("", ""));
            }
        }

        self.set_state(PlayerState::Idle);
        Ok(outcome)
    }

    fn announce(&mut self, song: &Song) {
        self.set_state(PlayerState::Announcing);
        report(self.sinks.display.render(BANNER, song.title));
        self.timer.pause(Duration::from_millis(self.config.announce_ms));
        self.silence();
        report(self.sinks.display.render("", ""));
    }

    fn play_notes(&mut self, song: &Song) -> Outcome {
        let unit_ms = tempo::unit_duration(song.tempo);
        if unit_ms == 0 {
            warn!("tempo {} is too fast to time, every note gets 1 ms", song.tempo);
        }

        let mut cursor = Cursor::new();
        while cursor.notes_played < song.true_length {
            if self.abort.is_raised() {
                return Outcome::Aborted {
                    notes_played: cursor.notes_played,
                };
            }
            self.step(song, &mut cursor, unit_ms);
        }
        Outcome::Completed {
            notes_played: cursor.notes_played,
        }
    }

    // one note slot: refresh lyrics if the line changed, arm, hold, disarm, gap
    fn step(&mut self, song: &Song, cursor: &mut Cursor, unit_ms: u32) {
        let n = cursor.notes_played;
        self.set_state(PlayerState::Playing { note: n });

        let line = lyrics::locate(song, n);
        if cursor.last_line != Some(line.index) {
            if !lyrics::extract_line(song, line.index, &mut cursor.current) {
                debug!("'{}' has no lyric line {}", song.title, line.index);
            }
            lyrics::extract_line(song, line.index + 1, &mut cursor.next);
            report(
                self.sinks
                    .display
                    .render(cursor.current.as_str(), cursor.next.as_str()),
            );
            cursor.last_line = Some(line.index);
        }

        let pitch = song.pitches[n];
        let total = tempo::note_total(song.durations[n], unit_ms);
        let (on_ms, off_ms) = articulate(total, self.config.gate_fraction);
        debug!("note {n}: {pitch} Hz, {on_ms}+{off_ms} ms, line {}", line.index);

        self.clear_lights();
        if pitch == REST {
            report(self.sinks.tone.stop());
        } else {
            let raw = song.lights[n];
            if let Some(index) = light_index(raw, self.sinks.lights.count()) {
                if index != raw as usize {
                    warn!("light {raw} at note {n} out of range, using {index}");
                }
                report(self.sinks.lights.set(index, true));
            }
            report(self.sinks.tone.start(pitch));
        }

        self.timer.pause(Duration::from_millis(on_ms as u64));
        self.silence();
        self.timer.pause(Duration::from_millis(off_ms as u64));

        cursor.notes_played += 1;
    }

    fn finish(&mut self, song: &Song) {
        self.silence();
        report(self.sinks.display.render(DONE, song.title));
        self.set_state(PlayerState::Draining);
        self.timer.pause(Duration::from_millis(self.config.drain_ms));
        report(self.sinks.display.render("", ""));
        info!("finished '{}'", song.title);
    }

    fn silence(&mut self) {
        report(self.sinks.tone.stop());
        self.clear_lights();
    }

    fn clear_lights(&mut self) {
        for index in 0..self.sinks.lights.count() {
            report(self.sinks.lights.set(index, false));
        }
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            debug!("player {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

/// Split a note slot into sounding time and gap. The gate is applied in
/// steps of 1/10000 with integer math, so `on + off == total` exactly and
/// `on` is always floored.
pub fn articulate(total: u32, gate: f32) -> (u32, u32) {
    let gate = (gate.clamp(0.0, 1.0) as f64 * 10_000.0).round() as u64; // NaN -> 0
    let on = ((total as u64 * gate) / 10_000) as u32;
    let on = on.min(total);
    (on, total - on)
}

/// Indicator for a raw light-track value: anything past the end goes to the
/// last light. None only when there are no lights at all.
pub fn light_index(raw: u8, count: usize) -> Option<usize> {
    count.checked_sub(1).map(|last| (raw as usize).min(last))
}

fn report(result: Result<(), SinkError>) {
    if let Err(e) = result {
        warn!("{e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::sinks::DisplaySink;
    use crate::player::trace::{SinkEvent, Trace};
    use crate::shared::NUM_LIGHTS;

    const THREE: Song = Song::new(
        "three",
        96,
        &[440, 494, 523],
        &[2, 2, 2],
        &[0, 7, 2],
        "first\nsecond",
        &[2, 1, 0],
    );

    fn quiet_config() -> PlayerConfig {
        PlayerConfig {
            announce_ms: 0,
            drain_ms: 0,
            ..PlayerConfig::default()
        }
    }

    fn engine(trace: &Trace) -> PlaybackEngine {
        PlaybackEngine::new(trace.sinks(NUM_LIGHTS), Box::new(trace.timer()), quiet_config())
    }

    #[test]
    fn articulation_matches_reference_numbers() {
        let total = tempo::note_total(2, tempo::unit_duration(96));
        assert_eq!(total, 624);
        assert_eq!(articulate(total, 0.93), (580, 44));
    }

    #[test]
    fn articulation_never_loses_time() {
        for total in [1, 2, 3, 7, 100, 313, 624, 4285, 60_000] {
            for gate in [0.01, 0.5, 0.7, 0.93, 0.999, 1.0] {
                let (on, off) = articulate(total, gate);
                assert_eq!(on + off, total, "total {total} gate {gate}");
            }
        }
        assert_eq!(articulate(100, 0.7), (70, 30));
        assert_eq!(articulate(500, 1.0), (500, 0));
        assert_eq!(articulate(1, 0.93), (0, 1));
    }

    #[test]
    fn out_of_range_lights_clamp_to_the_last_one() {
        assert_eq!(light_index(7, 5), Some(4));
        assert_eq!(light_index(4, 5), Some(4));
        assert_eq!(light_index(0, 5), Some(0));
        assert_eq!(light_index(3, 0), None);
    }

    #[test]
    fn plays_every_note_and_ends_dark() {
        let trace = Trace::new();
        let mut engine = engine(&trace);
        let outcome = engine.play(&THREE).unwrap();

        assert_eq!(outcome, Outcome::Completed { notes_played: 3 });
        assert_eq!(engine.state(), PlayerState::Idle);
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::Light { on: true, .. })), 3);
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::ToneStart(_))), 3);
        assert_eq!(trace.lights(NUM_LIGHTS), vec![false; NUM_LIGHTS]);
        assert_eq!(trace.tone(), None);
    }

    #[test]
    fn light_seven_lights_indicator_four() {
        let trace = Trace::new();
        engine(&trace).play(&THREE).unwrap();
        let lit: Vec<usize> = trace
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Light { index, on: true } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(lit, vec![0, 4, 2]);
    }

    #[test]
    fn display_only_refreshes_when_the_line_changes() {
        let trace = Trace::new();
        engine(&trace).play(&THREE).unwrap();
        let renders: Vec<(String, String)> = trace
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Render { top, bottom } => Some((top, bottom)),
                _ => None,
            })
            .collect();
        let expected: Vec<(String, String)> = [
            (BANNER, "three"),
            ("", ""),
            ("first", "second"),
            ("second", ""), // lookahead past the last line renders blank
            (DONE, "three"),
            ("", ""),
        ]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        assert_eq!(renders, expected);
    }

    #[test]
    fn pauses_only_around_armed_outputs() {
        let trace = Trace::new();
        engine(&trace).play(&THREE).unwrap();
        let pauses: Vec<u64> = trace
            .events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Pause(d) => Some(d.as_millis() as u64),
                _ => None,
            })
            .collect();
        // banner, 3 x (on, off), drain
        assert_eq!(pauses, vec![0, 580, 44, 580, 44, 580, 44, 0]);
    }

    #[test]
    fn rests_stop_the_tone_and_light_nothing() {
        const WITH_REST: Song = Song::new("rest", 120, &[REST, 440], &[1, 1], &[3, 3], "", &[0]);
        let trace = Trace::new();
        engine(&trace).play(&WITH_REST).unwrap();
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::ToneStart(_))), 1);
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::ToneStart(0))), 0);
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::Light { on: true, .. })), 1);
    }

    #[test]
    fn zero_tempo_leaves_every_sink_alone() {
        let mut song = THREE.clone();
        song.tempo = 0;
        let trace = Trace::new();
        let mut engine = engine(&trace);
        assert_eq!(engine.play(&song), Err(PlaybackError::ZeroTempo));
        assert!(trace.events().is_empty());
        assert_eq!(engine.state(), PlayerState::Idle);
    }

    #[test]
    fn padding_past_true_length_is_never_played() {
        let mut song = THREE.clone();
        song.pitches[3] = 999;
        song.durations[3] = 200;
        let trace = Trace::new();
        engine(&trace).play(&song).unwrap();
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::ToneStart(999))), 0);
    }

    #[test]
    fn abort_raised_before_play_stops_at_the_first_note() {
        let trace = Trace::new();
        let mut engine = engine(&trace);
        engine.abort_flag().raise();
        assert_eq!(engine.play(&THREE).unwrap(), Outcome::Aborted { notes_played: 0 });
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::ToneStart(_))), 0);
        assert!(engine.abort_flag().is_raised());

        engine.abort_flag().clear();
        assert_eq!(engine.play(&THREE).unwrap(), Outcome::Completed { notes_played: 3 });
    }

    struct BrokenDisplay;

    impl DisplaySink for BrokenDisplay {
        fn render(&mut self, _: &str, _: &str) -> Result<(), SinkError> {
            Err(SinkError::Display("bus unplugged".into()))
        }
    }

    #[test]
    fn failing_display_does_not_stop_the_song() {
        let trace = Trace::new();
        let mut sinks = trace.sinks(NUM_LIGHTS);
        sinks.display = Box::new(BrokenDisplay);
        let mut engine = PlaybackEngine::new(sinks, Box::new(trace.timer()), quiet_config());
        assert_eq!(engine.play(&THREE).unwrap(), Outcome::Completed { notes_played: 3 });
        assert_eq!(trace.count(|e| matches!(e, SinkEvent::ToneStart(_))), 3);
    }
}
