use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home/encore/config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.config/encore/config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home_then_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state/encore/encore.log")
    );

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/encore/encore.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 0.5
start_muted = true
status_interval_ms = 100
quit_fade_out_ms = 0

[playback]
auto_advance = true

[controls]
scrub_seconds = 9
volume_step = 0.1
seek_commit_ms = 250

[ui]
header_text = "hello"
show_visualizer = false
notice_ms = 1500

[visualizer]
interval_ms = 4000
transition_ms = 0

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[logging]
level = "debug"
file = "/tmp/encore-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 0.5);
    assert!(s.audio.start_muted);
    assert_eq!(s.audio.status_interval_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert!(s.playback.auto_advance);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.controls.seek_commit_ms, 250);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_visualizer);
    assert_eq!(s.ui.notice_ms, 1500);
    assert_eq!(s.visualizer.interval_ms, 4000);
    assert_eq!(s.visualizer.transition_ms, 0);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file.as_deref(),
        Some(std::path::Path::new("/tmp/encore-test.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__CONTROLS__SCRUB_SECONDS", "12");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 12);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "ENCORE_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 1.0);
    assert_eq!(s.visualizer.interval_ms, 3000);
    assert!(!s.playback.auto_advance);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    s = Settings::default();
    s.audio.status_interval_ms = 0;
    assert!(s.validate().is_err());

    s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    s = Settings::default();
    s.visualizer.transition_ms = s.visualizer.interval_ms + 1;
    let err = s.validate().unwrap_err();
    assert!(err.contains("visualizer.transition_ms"), "{err}");

    s = Settings::default();
    s.library.extensions.clear();
    assert!(s.validate().is_err());
}

#[test]
fn printed_config_parses_back() {
    let s = Settings::default();
    let text = s.to_toml().unwrap();
    assert!(text.contains("[visualizer]"));

    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed.controls.scrub_seconds, s.controls.scrub_seconds);
    assert_eq!(parsed.library.extensions, s.library.extensions);
}
