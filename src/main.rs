mod audio;
mod middle;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use buzzbox::audio_api::ToneCommand;
use buzzbox::logger;
use buzzbox::pipeline::catalog::Catalog;
use buzzbox::pipeline::persistence::{self, PlayerConfig};
use buzzbox::player::panel::panel_sinks;
use buzzbox::player::trace::Trace;
use buzzbox::player::{Outcome, PlaybackEngine, PlaybackError, SleepTimer};
use buzzbox::shared::{self, InputEvent, NUM_LIGHTS};
use middle::Middle;

// usage:
//   buzzbox [project_dir]
//   buzzbox --headless <song number> [project_dir]
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let headless = args.first().map(String::as_str) == Some("--headless");
    // installed before the config is read so its warnings are kept;
    // the configured level takes over once it is known
    logger::init(log::LevelFilter::Trace, headless);
    log::set_max_level(log::LevelFilter::Info);

    if headless {
        let number: usize = args
            .get(1)
            .context("--headless needs a song number")?
            .parse()
            .context("song number must be a positive integer")?;
        let config = load_config(args.get(2).map(String::as_str));
        run_headless(number, config)
    } else {
        let config = load_config(args.first().map(String::as_str));
        run_tui(config)
    }
}

fn load_config(dir: Option<&str>) -> PlayerConfig {
    let project_dir: PathBuf = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config = persistence::load_or_init(&project_dir);
    log::set_max_level(config.level_filter());
    config
}

// play one song through trace sinks in real time, printing what the panel does
fn run_headless(number: usize, config: PlayerConfig) -> anyhow::Result<()> {
    let catalog = Catalog::builtin();
    let index = number.checked_sub(1).context("song numbers start at 1")?;
    let song = catalog.get(index).ok_or(PlaybackError::UnknownSong(index))?;

    let trace = Trace::echoing();
    let mut engine = PlaybackEngine::new(trace.sinks(NUM_LIGHTS), Box::new(SleepTimer), config);
    match engine.play(song)? {
        Outcome::Completed { notes_played } => println!("{}: {} notes", song.title, notes_played),
        Outcome::Aborted { notes_played } => println!("{}: stopped at {}", song.title, notes_played),
    }
    Ok(())
}

fn run_tui(config: PlayerConfig) -> anyhow::Result<()> {
    // no sound card is not fatal, the panel still shows the tone
    let audio = match audio::start_audio(config.volume) {
        Ok(audio) => Some(audio),
        Err(e) => {
            log::warn!("buzzer disabled: {e:#}");
            None
        }
    };
    if let Some(audio) = &audio {
        audio.send(ToneCommand::SetVolume(config.volume));
    }

    let panel = shared::new_shared_panel();
    let sinks = panel_sinks(&panel, audio.as_ref().map(|a| a.sender()));
    let engine = PlaybackEngine::new(sinks, Box::new(SleepTimer), config);
    let catalog = Catalog::builtin();
    let mut middle = Middle::start(catalog, panel.clone(), engine);

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    let log = logger::GLOBAL_LOGGER.get();

    loop {
        let ds = match panel.read() {
            Ok(state) => state.clone(),
            Err(_) => anyhow::bail!("panel state poisoned"),
        };
        let status = log
            .and_then(|l| l.latest())
            .map(|(line, _)| line)
            .unwrap_or_default();

        term.draw(|frame| {
            tui::view::render(frame, frame.area(), &ds, middle.catalog(), &status);
        })?;

        if let Some(event) = tui::input::poll_input(tick_rate)? {
            if event == InputEvent::Quit {
                middle.shutdown(); // leaves the buzzer stopped and lights off
                drop(term);
                drop(audio);
                return Ok(());
            }
            middle.handle_input(event);
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
