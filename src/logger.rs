// Process-wide logger. The terminal belongs to the TUI, so records are kept
// in a small ring the status line can read; headless runs echo to stderr too.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

const KEEP: usize = 200;

pub struct Logger {
    level: log::LevelFilter,
    echo: bool,
    pub data: Arc<Mutex<VecDeque<(String, log::Level)>>>,
}

impl Logger {
    fn new(level: log::LevelFilter, echo: bool) -> Self {
        Self {
            level,
            echo,
            data: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Most recent record, newest first in the ring.
    pub fn latest(&self) -> Option<(String, log::Level)> {
        self.data.lock().ok()?.front().cloned()
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("{}:{} -- {}", record.level(), record.target(), record.args());
        if self.echo {
            eprintln!("{line}");
        }
        if let Ok(mut ring) = self.data.lock() {
            ring.push_front((line, record.level()));
            ring.truncate(KEEP);
        }
    }

    fn flush(&self) {}
}

pub static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the global logger. Only the first call wins; later calls just
/// hand back the logger that is already installed.
pub fn init(level: log::LevelFilter, echo: bool) -> &'static Logger {
    let logger = GLOBAL_LOGGER.get_or_init(|| {
        let logger = Logger::new(level, echo);
        log::set_max_level(level);
        logger
    });
    // fails if some other logger got there first, which is fine for tests
    let _ = log::set_logger(logger);
    logger
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn ring_keeps_newest_first_and_respects_level() {
        let logger = Logger::new(log::LevelFilter::Info, false);
        let record = |level, msg: &str| {
            logger.log(
                &log::Record::builder()
                    .level(level)
                    .target("buzzbox")
                    .args(format_args!("{msg}"))
                    .build(),
            )
        };
        record(log::Level::Info, "one");
        record(log::Level::Debug, "hidden");
        record(log::Level::Warn, "two");

        let (line, level) = logger.latest().unwrap();
        assert_eq!(line, "WARN:buzzbox -- two");
        assert_eq!(level, log::Level::Warn);
        assert_eq!(logger.data.lock().unwrap().len(), 2);
    }
}
