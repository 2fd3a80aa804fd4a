//! Config I/O operations: load, save, and API key resolution.

use std::path::{Path, PathBuf};

use super::config_struct::Config;
use crate::error::{AppError, AppResult};

pub fn get_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_default()
        .join("atlas-voyager");
    let _ = std::fs::create_dir_all(&config_dir);
    config_dir.join("config.json")
}

/// Loads the config at `path`, or the default location. A missing or
/// unreadable file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Config {
    let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);
    match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            crate::log_info!("[Config] Using defaults ({})", e);
            Config::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> AppResult<Config> {
    if !path.exists() {
        return Err(AppError::Config(format!("{} not found", path.display())));
    }
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| AppError::Config(e.to_string()))
}

pub fn save_config(config: &Config) -> AppResult<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(config).map_err(|e| AppError::Config(e.to_string()))?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Precedence: explicit flag, then `GEMINI_API_KEY`, then `API_KEY`, then the file.
pub fn resolve_api_key(config: &mut Config, flag: Option<&str>) {
    let from_env = || {
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
    };
    if let Some(key) = flag.map(str::to_string).or_else(from_env) {
        config.gemini_api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("nope.json")));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "narration_voice": "Kore" }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.narration_voice, "Kore");
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            gemini_api_key: "k".into(),
            live_voice: "Puck".into(),
            ..Config::default()
        };
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn flag_wins_over_file_key() {
        let mut config = Config {
            gemini_api_key: "from-file".into(),
            ..Config::default()
        };
        resolve_api_key(&mut config, Some("from-flag"));
        assert_eq!(config.gemini_api_key, "from-flag");
    }
}
