//! TOML configuration
//!
//! Loaded once at startup; the first run writes the defaults out so
//! there is a file to edit. Every key falls back to its default, so
//! partial files stay valid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub lyrics: LyricsConfig,
    pub input: InputConfig,
    pub paths: PathsConfig,
    pub player: PlayerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// YouTube Data API key; without one, search serves demo results
    pub api_key: Option<String>,
    /// Quiet period after the last keystroke before a search fires
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LyricsConfig {
    /// Override for the lyrics API endpoint
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "refrain", "refrain");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("refrain"));
        Self { data_dir }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Volume level (0-100)
    pub volume: u8,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Last visited screen (restored on startup)
    pub last_screen: Option<String>,
    /// Seconds without input before controls hide during playback
    pub idle_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            last_screen: None,
            idle_secs: 4,
        }
    }
}

/// Where the config lives: an explicit path wins, otherwise the
/// platform config dir.
pub fn resolve_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => {
            let proj = ProjectDirs::from("dev", "refrain", "refrain")
                .context("no home directory for config")?;
            Ok(proj.config_dir().join("config.toml"))
        }
    }
}

/// Read the config, writing a default file first if none exists.
pub fn load_or_init(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_path(explicit)?;
    if !path.exists() {
        let cfg = Config::default();
        write_toml(&path, &cfg)?;
        return Ok(cfg);
    }
    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Write the config back; volume and last screen persist across runs.
pub fn persist(cfg: &Config, explicit: Option<&Path>) -> anyhow::Result<()> {
    write_toml(&resolve_path(explicit)?, cfg)
}

fn write_toml(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    // The file can hold an API key; keep it owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.search.debounce_ms, cfg.search.debounce_ms);
        assert_eq!(back.ui.idle_secs, 4);
        assert_eq!(back.player.volume, 80);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str("[search]\napi_key = \"k\"\n").unwrap();
        assert_eq!(cfg.search.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.search.debounce_ms, 500);
        assert!(cfg.input.mouse);
        assert!(cfg.lyrics.base_url.is_none());
    }
}
