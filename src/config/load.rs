use std::{env, path::PathBuf};

use super::schema::Settings;

/// Layers, lowest first: struct defaults, the optional TOML file, then
/// `ENCORE__SECTION__KEY` environment variables.
impl Settings {
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }
        let env = ::config::Environment::with_prefix("ENCORE")
            .separator("__")
            .try_parsing(true);

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.audio.initial_volume;
        let checks = [
            ((0.0..=1.0).contains(&volume), "audio.initial_volume must be within 0.0..=1.0"),
            (self.audio.status_interval_ms > 0, "audio.status_interval_ms must be >= 1"),
            (self.controls.volume_step > 0.0, "controls.volume_step must be > 0"),
            (self.controls.scrub_seconds > 0, "controls.scrub_seconds must be >= 1"),
            (self.visualizer.interval_ms > 0, "visualizer.interval_ms must be >= 1"),
            (
                self.visualizer.transition_ms <= self.visualizer.interval_ms,
                "visualizer.transition_ms must not exceed visualizer.interval_ms",
            ),
            (!self.library.extensions.is_empty(), "library.extensions must not be empty"),
        ];
        match checks.into_iter().find(|(ok, _)| !ok) {
            Some((_, msg)) => Err(msg.to_string()),
            None => Ok(()),
        }
    }

    /// Render the effective settings as TOML (for `--print-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `ENCORE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ENCORE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/encore/config.toml`
/// or `~/.config/encore/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("encore").join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/encore/encore.log`
/// or `~/.local/state/encore/encore.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("encore").join("encore.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
