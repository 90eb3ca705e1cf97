use crate::app::{App, Route};

pub const USAGE: &str = "usage: encore [DIR] [--track N] [--print-config]";

/// Command-line arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub dir: Option<String>,
    pub track: Option<usize>,
    pub print_config: bool,
    pub help: bool,
}

pub fn parse_args<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--print-config" => parsed.print_config = true,
            "-t" | "--track" => {
                let value = args.next().ok_or("--track needs a track number")?;
                let n: usize = value
                    .parse()
                    .map_err(|_| format!("invalid track number: {value}"))?;
                parsed.track = Some(n);
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option: {flag}")),
            dir => {
                if parsed.dir.is_some() {
                    return Err(format!("unexpected argument: {dir}"));
                }
                parsed.dir = Some(dir.to_string());
            }
        }
    }

    Ok(parsed)
}

/// The first screen to show. `--track N` opens track `N` (clamped) right
/// away; otherwise the list is shown.
pub fn initial_route(app: &mut App, track: Option<usize>) -> Route {
    match track {
        Some(n) => {
            app.set_selected(n);
            app.select_track().unwrap_or(Route::Tracks)
        }
        None => Route::Tracks,
    }
}
