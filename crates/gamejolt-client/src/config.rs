use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gamejolt_core::{DEFAULT_API_ROOT, DEFAULT_API_VERSION};
use serde::Deserialize;
use thiserror::Error;

use crate::transport::DEFAULT_TIMEOUT_SECS;

/// Client settings, from the TOML config file and the environment.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub game_id: Option<u64>,
    pub private_key: String,
    pub api_root: String,
    pub version: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            game_id: None,
            private_key: String::new(),
            api_root: DEFAULT_API_ROOT.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("game_id", &self.game_id)
            .field("private_key", &"<redacted>")
            .field("api_root", &self.api_root)
            .field("version", &self.version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("game_id is required")]
    MissingGameId,
    #[error("invalid GAMEJOLT_GAME_ID '{0}'")]
    InvalidGameId(String),
    #[error("private_key is required")]
    MissingPrivateKey,
    #[error("invalid api_root '{0}'")]
    InvalidApiRoot(String),
    #[error("version must not be empty")]
    EmptyVersion,
    #[error("timeout_secs must be at least 1")]
    ZeroTimeout,
}

impl From<ConfigError> for gamejolt_core::Error {
    fn from(value: ConfigError) -> Self {
        gamejolt_core::Error::InvalidArgument(value.to_string())
    }
}

impl ClientConfig {
    /// Overlay `GAMEJOLT_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(raw) = get("GAMEJOLT_GAME_ID") {
            let id = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidGameId(raw.clone()))?;
            self.game_id = Some(id);
        }
        if let Some(key) = get("GAMEJOLT_PRIVATE_KEY") {
            self.private_key = key.trim().to_string();
        }
        if let Some(root) = get("GAMEJOLT_API_ROOT") {
            self.api_root = root.trim().to_string();
        }
        if let Some(version) = get("GAMEJOLT_API_VERSION") {
            self.version = version.trim().to_string();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_id.is_none() {
            return Err(ConfigError::MissingGameId);
        }
        if self.private_key.trim().is_empty() {
            return Err(ConfigError::MissingPrivateKey);
        }
        if url::Url::parse(&self.api_root).is_err() {
            return Err(ConfigError::InvalidApiRoot(self.api_root.clone()));
        }
        if self.version.trim().is_empty() {
            return Err(ConfigError::EmptyVersion);
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Location of the per-user config file, under the platform config dir.
pub fn config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("gamejolt").join("config.toml"))
}

/// Read the per-user config file when there is one.
///
/// Problems are reported on `warn` and fall back to defaults. A file that
/// other users can read keeps its settings but loses its private key.
pub fn load_config(warn: &mut dyn Write) -> ClientConfig {
    match config_path() {
        Some(path) if path.exists() => load_config_at(&path, warn),
        _ => ClientConfig::default(),
    }
}

fn load_config_at(path: &Path, warn: &mut dyn Write) -> ClientConfig {
    let mut config = read_config_file(path, warn);
    if let Some(mode) = exposed_mode(path) {
        if !config.private_key.is_empty() {
            let _ = writeln!(
                warn,
                "warning: ignoring private_key in {} (mode {:04o}); restrict it with chmod 600",
                path.display(),
                mode
            );
            config.private_key.clear();
        }
    }
    config
}

/// Permission bits of `path` when group or others may access it.
#[cfg(unix)]
fn exposed_mode(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path).ok()?.permissions().mode() & 0o777;
    (mode & 0o077 != 0).then_some(mode)
}

#[cfg(not(unix))]
fn exposed_mode(_path: &Path) -> Option<u32> {
    None
}

fn read_config_file(path: &Path, warn: &mut dyn Write) -> ClientConfig {
    let parsed = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))
        .and_then(|text| {
            toml::from_str::<ClientConfig>(&text)
                .map_err(|e| format!("cannot parse {}: {}", path.display(), e))
        });
    parsed.unwrap_or_else(|msg| {
        let _ = writeln!(warn, "warning: {}", msg);
        ClientConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gamejolt_config_{}", name));
        let _ = fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn load_missing_file_warns() {
        let mut stderr = Vec::new();
        let config = read_config_file(Path::new("/nonexistent/gamejolt/config.toml"), &mut stderr);
        assert!(config.game_id.is_none());
        assert_eq!(config.version, "v1");
        assert!(String::from_utf8(stderr).unwrap().contains("cannot read"));
    }

    #[test]
    fn load_valid_toml() {
        let dir = scratch("valid");
        let path = dir.join("config.toml");
        fs::write(
            &path,
            "game_id = 1111\nprivate_key = \"private-key\"\nversion = \"v2\"\n",
        )
        .unwrap();
        let config = read_config_file(&path, &mut Vec::new());
        assert_eq!(config.game_id, Some(1111));
        assert_eq!(config.private_key, "private-key");
        assert_eq!(config.version, "v2");
        assert_eq!(config.api_root, DEFAULT_API_ROOT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        config.validate().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml_warns() {
        let dir = scratch("invalid");
        let path = dir.join("config.toml");
        fs::write(&path, "not valid [[ toml !!!").unwrap();
        let mut stderr = Vec::new();
        let config = read_config_file(&path, &mut stderr);
        assert!(config.game_id.is_none());
        assert!(String::from_utf8(stderr)
            .unwrap()
            .contains("warning: cannot parse"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn readable_file_loses_private_key() {
        use std::os::unix::fs::PermissionsExt;
        let dir = scratch("exposed");
        let path = dir.join("config.toml");
        fs::write(&path, "game_id = 7\nprivate_key = \"hunter2\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut stderr = Vec::new();
        let config = load_config_at(&path, &mut stderr);
        assert!(config.private_key.is_empty());
        assert_eq!(config.game_id, Some(7));
        assert_eq!(config.validate(), Err(ConfigError::MissingPrivateKey));
        let msg = String::from_utf8(stderr).unwrap();
        assert!(msg.contains("ignoring private_key"));
        assert!(msg.contains("0644"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn private_file_keeps_private_key() {
        use std::os::unix::fs::PermissionsExt;
        let dir = scratch("private");
        let path = dir.join("config.toml");
        fs::write(&path, "game_id = 7\nprivate_key = \"hunter2\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        let mut stderr = Vec::new();
        let config = load_config_at(&path, &mut stderr);
        assert_eq!(config.private_key, "hunter2");
        assert!(stderr.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GAMEJOLT_GAME_ID", " 42 "),
            ("GAMEJOLT_PRIVATE_KEY", "k"),
            ("GAMEJOLT_API_ROOT", "http://localhost:8080/api/game/"),
        ]
        .into_iter()
        .collect();
        let mut config = ClientConfig::default();
        config
            .apply_vars(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.game_id, Some(42));
        assert_eq!(config.private_key, "k");
        assert_eq!(config.api_root, "http://localhost:8080/api/game/");
        assert_eq!(config.version, "v1");
    }

    #[test]
    fn env_bad_game_id() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_vars(|name| (name == "GAMEJOLT_GAME_ID").then(|| "abc".to_string()))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidGameId("abc".into()));
    }

    #[test]
    fn validation() {
        let mut config = ClientConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingGameId));
        config.game_id = Some(1);
        config.private_key = "k".into();
        config.api_root = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidApiRoot(_))));
        config.api_root = DEFAULT_API_ROOT.into();
        config.version = " ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyVersion));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = ClientConfig {
            game_id: Some(1),
            private_key: "k".into(),
            timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let from_file: ClientConfig =
            toml::from_str("game_id = 1\nprivate_key = \"k\"\ntimeout_secs = 0\n").unwrap();
        assert_eq!(from_file.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn debug_redacts_key() {
        let config = ClientConfig {
            private_key: "hunter2".into(),
            ..ClientConfig::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
