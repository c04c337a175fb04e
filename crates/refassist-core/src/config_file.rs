use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Base URL used when nothing else names a server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

pub const ENV_BASE_URL: &str = "REFASSIST_URL";
pub const ENV_DOWNLOAD_DIR: &str = "REFASSIST_DOWNLOAD_DIR";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputConfig {
    pub download_dir: Option<String>,
}

/// Platform config directory path: `<config_dir>/refassist/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("refassist").join("config.toml"))
}

/// Load config by cascading CWD `.refassist.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".refassist.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay
                .server
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.base_url.clone())),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
            fps: overlay
                .display
                .as_ref()
                .and_then(|d| d.fps)
                .or_else(|| base.display.as_ref().and_then(|d| d.fps)),
        }),
        output: Some(OutputConfig {
            download_dir: overlay
                .output
                .as_ref()
                .and_then(|o| o.download_dir.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.download_dir.clone())),
        }),
    }
}

/// Settings after applying flag > environment > file > default.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub download_dir: PathBuf,
    pub theme: Option<String>,
    pub fps: u32,
}

/// Values supplied on the command line. `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub theme: Option<String>,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(flags: Overrides, file: &ConfigFile) -> Self {
        Self::resolve_with(flags, file, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with(
        flags: Overrides,
        file: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let base_url = non_empty(flags.base_url)
            .or_else(|| non_empty(env(ENV_BASE_URL)))
            .or_else(|| non_empty(file.server.as_ref().and_then(|s| s.base_url.clone())))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let download_dir = flags
            .download_dir
            .or_else(|| non_empty(env(ENV_DOWNLOAD_DIR)).map(PathBuf::from))
            .or_else(|| {
                non_empty(file.output.as_ref().and_then(|o| o.download_dir.clone()))
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_download_dir);

        let theme = non_empty(flags.theme)
            .or_else(|| non_empty(file.display.as_ref().and_then(|d| d.theme.clone())));

        let fps = file
            .display
            .as_ref()
            .and_then(|d| d.fps)
            .unwrap_or(30)
            .clamp(1, 120);

        Self {
            base_url,
            download_dir,
            theme,
            fps,
        }
    }
}

/// Platform download directory, falling back to the working directory.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_url(url: &str) -> ConfigFile {
        ConfigFile {
            server: Some(ServerConfig {
                base_url: Some(url.into()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn overlay_wins_and_base_fills_gaps() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://base".into()),
            }),
            display: Some(DisplayConfig {
                theme: Some("light".into()),
                fps: Some(10),
            }),
            output: None,
        };
        let overlay = ConfigFile {
            display: Some(DisplayConfig {
                theme: Some("dark".into()),
                fps: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.server.unwrap().base_url.as_deref(), Some("http://base"));
        let display = merged.display.unwrap();
        assert_eq!(display.theme.as_deref(), Some("dark"));
        assert_eq!(display.fps, Some(10));
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = file_with_url("http://file");
        let env = |key: &str| (key == ENV_BASE_URL).then(|| "http://env".to_string());

        let s = Settings::resolve_with(
            Overrides {
                base_url: Some("http://flag".into()),
                ..Default::default()
            },
            &file,
            env,
        );
        assert_eq!(s.base_url, "http://flag");

        let s = Settings::resolve_with(Overrides::default(), &file, env);
        assert_eq!(s.base_url, "http://env");

        let s = Settings::resolve_with(Overrides::default(), &file, |_| None);
        assert_eq!(s.base_url, "http://file");

        let s = Settings::resolve_with(Overrides::default(), &ConfigFile::default(), |_| None);
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn blank_env_is_ignored() {
        let s = Settings::resolve_with(
            Overrides::default(),
            &file_with_url("http://file"),
            |_| Some("  ".into()),
        );
        assert_eq!(s.base_url, "http://file");
    }

    #[test]
    fn fps_is_clamped() {
        let file = ConfigFile {
            display: Some(DisplayConfig {
                theme: None,
                fps: Some(1000),
            }),
            ..Default::default()
        };
        let s = Settings::resolve_with(Overrides::default(), &file, |_| None);
        assert_eq!(s.fps, 120);
    }

    #[test]
    fn malformed_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "server = [").unwrap();
        assert_eq!(load_from_path(&path), None);
    }
}
