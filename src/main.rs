// SPDX-License-Identifier: MPL-2.0
use gpx_geotag::application::geotag::{GeotagOptions, Geotagger, PhotoOutcome, WriteOutcome};
use gpx_geotag::config::{self, Config};
use gpx_geotag::domain::time::resolve_zone;
use gpx_geotag::error::Result;
use gpx_geotag::infrastructure::{load_gpx, ExifReader, ExifWriter};
use gpx_geotag::logging::{init_logging, VERBOSE_LOG_LEVEL};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: gpx_geotag [-g|--gpx] <track.gpx> [-t|--timezone <zone>] [options] <photo>...

Writes the GPS position recorded at each photo's capture time into its EXIF.

Options:
  -g, --gpx <file>        GPX track log (required)
  -t, --timezone <zone>   Zone of the camera clock: +02:00, -05, Z, Europe/Paris
                          (a zone, not a correction: a clock on UTC+2 is +02)
  -n, --dry-run           Match and report without writing
      --no-elevation      Do not write GPSAltitude
      --config <file>     Settings file (default: user config dir)
  -v, --verbose           Debug logging on stderr
  -h, --help              Show this help
";

struct Args {
    gpx: PathBuf,
    timezone: Option<String>,
    dry_run: bool,
    no_elevation: bool,
    verbose: bool,
    config: Option<PathBuf>,
    photos: Vec<PathBuf>,
}

/// Returns `Ok(None)` when help was requested.
fn parse_args() -> std::result::Result<Option<Args>, String> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let gpx: Option<PathBuf> = args
        .opt_value_from_str(["-g", "--gpx"])
        .map_err(|e| e.to_string())?;
    let timezone: Option<String> = args
        .opt_value_from_str(["-t", "--timezone"])
        .map_err(|e| e.to_string())?;
    let config: Option<PathBuf> = args
        .opt_value_from_str("--config")
        .map_err(|e| e.to_string())?;
    let dry_run = args.contains(["-n", "--dry-run"]);
    let no_elevation = args.contains("--no-elevation");
    let verbose = args.contains(["-v", "--verbose"]);

    let mut photos = Vec::new();
    for arg in args.finish() {
        let arg = PathBuf::from(arg);
        if arg.to_str().is_some_and(|s| s.starts_with('-')) {
            return Err(format!("unknown option '{}'", arg.display()));
        }
        photos.push(arg);
    }

    let gpx = gpx.ok_or_else(|| "missing required --gpx <track.gpx>".to_string())?;
    if photos.is_empty() {
        return Err("no photos given".to_string());
    }

    Ok(Some(Args {
        gpx,
        timezone,
        dry_run,
        no_elevation,
        verbose,
        config,
        photos,
    }))
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("warning: using default settings: {e}");
        Config::default()
    })
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let store = load_gpx(&args.gpx)?;

    let spec = args.timezone.as_deref().or(config.timezone.as_deref());
    let zone = resolve_zone(spec, &store)?;
    info!("interpreting capture times in {zone}");

    let options = GeotagOptions {
        dry_run: args.dry_run,
        write_elevation: config.write_elevation() && !args.no_elevation,
    };
    let tagger = Geotagger::new(&store, zone, ExifReader, ExifWriter).with_options(options);
    let report = tagger.geotag_all(&args.photos);

    for outcome in &report.outcomes {
        match outcome {
            PhotoOutcome::Done(result) => {
                println!("{result}");
                if let WriteOutcome::Failed(e) = &result.write {
                    eprintln!("{}: write failed: {e}", result.photo.display());
                }
            }
            PhotoOutcome::Failed { photo, error } => {
                eprintln!("{}: error: {error}", photo.display());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = load_config(args.config.as_ref());
    let level = if args.verbose {
        VERBOSE_LOG_LEVEL
    } else {
        config.log_level()
    };
    let _logger = init_logging(level)
        .map_err(|e| eprintln!("warning: logging disabled: {e}"))
        .ok();

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
