use std::env;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioEngine;
use crate::library::{DirectoryProvider, load_track_list};
use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod host;
mod keys;
mod mpris_sync;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = startup::parse_args(env::args().skip(1))
        .map_err(|msg| format!("{msg}\n{}", startup::USAGE))?;
    if args.help {
        println!("{}", startup::USAGE);
        return Ok(());
    }

    let (settings, config_warning) = settings::load_settings();
    if args.print_config {
        if let Some(warning) = &config_warning {
            eprintln!("encore: {warning}");
        }
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let log_path = logging::init(&settings.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), log = ?log_path, "starting encore");
    if let Some(warning) = &config_warning {
        tracing::warn!("{warning}");
    }

    let dir = args.dir.unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    });

    let provider = DirectoryProvider::new(Path::new(&dir), settings.library.clone());
    let (permission, tracks) = load_track_list(&provider);
    let mut app = App::new(tracks, permission);
    app.set_current_dir(provider.root().display().to_string());
    let route = startup::initial_route(&mut app, args.track);
    if let Some(warning) = config_warning {
        let ttl = Duration::from_millis(settings.ui.notice_ms);
        app.set_notice(warning, Instant::now(), ttl);
    }

    let engine = RodioEngine::new(&settings.audio);
    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let mut host = host::Host::new(engine.clone(), app, settings.clone());
    host.navigate(route, Instant::now());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();
        event_loop::run(&mut terminal, &settings, &mut host, &mpris, &control_rx, &mut state)
    })();

    // Fade out while the session still holds its voice, then let it go.
    engine.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    drop(host);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("bye");
    run_result
}
