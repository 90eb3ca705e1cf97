use crate::config::Settings;

/// Load settings for this run. A broken config never blocks startup: the
/// defaults are used and the reason is handed back so it can be logged and
/// shown once the UI is up.
pub fn load_settings() -> (Settings, Option<String>) {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config: {e}"))
        .and_then(|s| {
            s.validate()
                .map(|()| s)
                .map_err(|msg| format!("invalid config: {msg}"))
        });
    match loaded {
        Ok(settings) => (settings, None),
        Err(reason) => (Settings::default(), Some(format!("{reason}; using defaults"))),
    }
}
