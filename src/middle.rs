// Between the TUI and the player. The TUI never touches the engine: it hands
// input events here, and this layer forwards validated selections to the
// playback worker thread, which owns the engine and therefore every sink.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use buzzbox::pipeline::catalog::Catalog;
use buzzbox::player::{AbortFlag, Outcome, PlaybackEngine, PlaybackError};
use buzzbox::shared::{InputEvent, SharedPanel};

enum PlayerCommand {
    Play(usize),
}

pub struct Middle {
    catalog: Catalog<'static>,
    panel: SharedPanel,
    tx: Option<Sender<PlayerCommand>>,
    abort: AbortFlag,
    busy: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Middle {
    pub fn start(catalog: Catalog<'static>, panel: SharedPanel, engine: PlaybackEngine) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<PlayerCommand>(1);
        let abort = engine.abort_flag();
        let busy = Arc::new(AtomicBool::new(false));

        let worker = {
            let panel = panel.clone();
            let busy = busy.clone();
            let abort = abort.clone();
            std::thread::spawn(move || run_player(rx, engine, catalog, panel, busy, abort))
        };

        Self {
            catalog,
            panel,
            tx: Some(tx),
            abort,
            busy,
            worker: Some(worker),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn catalog(&self) -> Catalog<'static> {
        self.catalog
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::SelectSong(index) => self.select(index),
            InputEvent::Stop => {
                if self.is_busy() {
                    log::info!("stop requested");
                    self.abort.raise();
                }
            }
            InputEvent::Quit => {}
        }
    }

    fn select(&mut self, index: usize) {
        let Some(song) = self.catalog.get(index) else {
            log::warn!("{}", PlaybackError::UnknownSong(index));
            return;
        };
        // one song at a time; anything picked mid-song is dropped
        if self.busy.swap(true, Ordering::AcqRel) {
            log::info!("still playing, ignoring '{}'", song.title);
            return;
        }
        if let Ok(mut state) = self.panel.write() {
            state.playing = Some(index);
        }
        // only cleared while idle, so a stop from here on reaches this song
        self.abort.clear();
        let sent = self.tx.as_ref().map(|tx| tx.try_send(PlayerCommand::Play(index)));
        if !matches!(sent, Some(Ok(()))) {
            log::warn!("player is gone, can't play '{}'", song.title);
            self.busy.store(false, Ordering::Release);
        }
    }

    /// Stop whatever is playing and wait for the worker to leave the sinks
    /// cleared. A song still waiting in the queue is skipped.
    pub fn shutdown(&mut self) {
        self.abort.raise();
        self.tx.take(); // closes the channel, worker loop ends
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Middle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_player(
    rx: Receiver<PlayerCommand>,
    mut engine: PlaybackEngine,
    catalog: Catalog<'static>,
    panel: SharedPanel,
    busy: Arc<AtomicBool>,
    abort: AbortFlag,
) {
    for cmd in rx.iter() {
        let PlayerCommand::Play(index) = cmd;
        let result = match catalog.get(index) {
            // stopped while still queued, the sinks were never touched
            Some(_) if abort.is_raised() => Ok(Outcome::Aborted { notes_played: 0 }),
            Some(song) => engine.play(song),
            None => Err(PlaybackError::UnknownSong(index)),
        };
        match result {
            Ok(Outcome::Completed { notes_played }) => log::debug!("song {index} done, {notes_played} notes"),
            Ok(Outcome::Aborted { notes_played }) => log::debug!("song {index} aborted at note {notes_played}"),
            Err(e) => log::warn!("can't play song {index}: {e}"),
        }
        if let Ok(mut state) = panel.write() {
            state.playing = None;
        }
        busy.store(false, Ordering::Release);
    }
}
