// Player settings, loaded on startup from <project_dir>/.buzzbox/config.json.
// Only configuration lives on disk; playback position never does.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const BUZZBOX_DIR: &str = ".buzzbox";
const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub gate_fraction: f32, // share of each note slot the output is actually on, (0, 1]
    pub announce_ms: u64,   // "now playing" banner
    pub drain_ms: u64,      // completion message stays up this long
    pub volume: f32,        // buzzer amplitude, 0.0 to 1.0
    pub log_level: String,  // off, error, warn, info, debug, trace
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gate_fraction: 0.93,
            announce_ms: 1500,
            drain_ms: 2000,
            volume: 0.2,
            log_level: String::from("info"),
        }
    }
}

impl PlayerConfig {
    /// Replace values the player can't work with. A bad gate falls back to the
    /// default instead of being clamped, since 0 would mute every note.
    pub fn sanitized(mut self) -> Self {
        if !(self.gate_fraction > 0.0 && self.gate_fraction <= 1.0) {
            log::warn!(
                "gate_fraction {} out of range (0, 1], using {}",
                self.gate_fraction,
                Self::default().gate_fraction
            );
            self.gate_fraction = Self::default().gate_fraction;
        }
        if !(0.0..=1.0).contains(&self.volume) {
            let volume = if self.volume.is_nan() { 0.0 } else { self.volume.clamp(0.0, 1.0) };
            log::warn!("volume {} out of range, using {}", self.volume, volume);
            self.volume = volume;
        }
        self
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

// <project_dir>/.buzzbox/config.json
fn config_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(BUZZBOX_DIR).join(CONFIG_FILE)
}

pub fn load_config(project_dir: &Path) -> Option<PlayerConfig> {
    let path = config_file_path(project_dir);
    let data = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&data).ok()
}

// Save the config to disk, making the files if they don't exist already
pub fn save_config(project_dir: &Path, config: &PlayerConfig) -> anyhow::Result<()> {
    let path = config_file_path(project_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .buzzbox/ if needed
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

/// Load the config, or write the defaults out so there is a file to edit.
/// Never fails: a directory that can't be written to still plays with
/// defaults.
pub fn load_or_init(project_dir: &Path) -> PlayerConfig {
    if config_file_path(project_dir).exists() {
        // a file that doesn't parse is left alone rather than overwritten
        return load_config(project_dir).unwrap_or_default().sanitized();
    }
    let config = PlayerConfig::default();
    if let Err(e) = save_config(project_dir, &config) {
        log::warn!("can't write {}: {e:#}", config_file_path(project_dir).display());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("buzzbox-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{ "gate_fraction": 0.5 }"#).unwrap();
        assert_eq!(config.gate_fraction, 0.5);
        assert_eq!(config.announce_ms, 1500);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn sanitized_repairs_out_of_range_values() {
        let config = PlayerConfig {
            gate_fraction: 0.0,
            volume: 3.0,
            ..PlayerConfig::default()
        }
        .sanitized();
        assert_eq!(config.gate_fraction, 0.93);
        assert_eq!(config.volume, 1.0);

        let config = PlayerConfig { gate_fraction: 1.0, ..PlayerConfig::default() }.sanitized();
        assert_eq!(config.gate_fraction, 1.0);

        let config = PlayerConfig { gate_fraction: f32::NAN, ..PlayerConfig::default() }.sanitized();
        assert_eq!(config.gate_fraction, 0.93);
    }

    #[test]
    fn unknown_log_level_means_info() {
        let config = PlayerConfig { log_level: "loud".into(), ..PlayerConfig::default() };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        let config = PlayerConfig { log_level: "debug".into(), ..PlayerConfig::default() };
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them_back() {
        let dir = scratch_dir("init");
        let first = load_or_init(&dir);
        assert_eq!(first, PlayerConfig::default());
        assert!(config_file_path(&dir).exists());

        let edited = PlayerConfig { drain_ms: 10, ..PlayerConfig::default() };
        save_config(&dir, &edited).unwrap();
        assert_eq!(load_or_init(&dir), edited);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unparseable_file_is_kept_and_defaults_are_used() {
        let dir = scratch_dir("garbage");
        std::fs::create_dir_all(dir.join(BUZZBOX_DIR)).unwrap();
        std::fs::write(config_file_path(&dir), "not json").unwrap();
        assert_eq!(load_or_init(&dir), PlayerConfig::default());
        assert_eq!(std::fs::read_to_string(config_file_path(&dir)).unwrap(), "not json");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_project_dir_still_gives_defaults() {
        // the project "directory" is a plain file, so .buzzbox/ can't be made
        let dir = scratch_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        assert_eq!(load_or_init(&blocker), PlayerConfig::default());
        assert!(save_config(&blocker, &PlayerConfig::default()).is_err());
        assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "x");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
