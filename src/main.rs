//! Headless nanoviz runner.
//!
//! Loads a visualization payload from a file or an `http(s)` URL (the
//! built-in demo scene when none is given), composes it, renders frames
//! with the headless backend and writes the composition report, or the
//! last frame's draw list, to stdout as JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;

use nanoviz::engine::command::{ViewMode, VizCommand};
use nanoviz::engine::Visualizer;
use nanoviz::error::VizError;
use nanoviz::net::http::BlockingClient;
use nanoviz::options::Options;
use nanoviz::payload::{parse_response, VisualizationPayload};
use nanoviz::quality::DeviceProfile;
use nanoviz::renderer::headless::HeadlessRenderer;

/// Directory searched by `--preset`.
const PRESET_DIR: &str = "presets";

const FRAME_MS: f64 = 1000.0 / 60.0;
const VIEWPORT: (u32, u32) = (1280, 720);

/// Render a molecule / nanoparticle payload headlessly and print the
/// composition report as JSON.
#[derive(Debug, Parser)]
#[command(name = "nanoviz", version)]
struct Args {
    /// Payload file or `http(s)` URL; the demo scene when omitted.
    input: Option<String>,

    /// Options TOML file.
    #[arg(long, conflicts_with = "preset")]
    options: Option<PathBuf>,

    /// Named preset from the `presets` directory.
    #[arg(long)]
    preset: Option<String>,

    /// Write the resolved options to this TOML file.
    #[arg(long)]
    save_options: Option<PathBuf>,

    /// Frames to render.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// View filter: both, nano, drug or interaction.
    #[arg(long, value_parser = parse_view)]
    view: Option<ViewMode>,

    /// Print the last frame's draw list instead of the report.
    #[arg(long)]
    dump_draw_list: bool,

    /// Print the options JSON schema and exit.
    #[arg(long)]
    schema: bool,
}

fn parse_view(value: &str) -> Result<ViewMode, String> {
    ViewMode::parse(value).ok_or_else(|| {
        let known: Vec<_> =
            ViewMode::ALL.into_iter().map(ViewMode::as_str).collect();
        format!("unknown view {value} (expected {})", known.join(", "))
    })
}

/// Read payload JSON from a URL (through the request throttle) or a file.
fn read_input(input: &str, options: &Options) -> Result<String, VizError> {
    if input.starts_with("http://") || input.starts_with("https://") {
        log::info!("fetching {input}");
        BlockingClient::new(&options.network).get(input)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

/// Options from `--preset`, `--options` or the defaults.
fn resolve_options(args: &Args) -> Result<Options, VizError> {
    if let Some(name) = &args.preset {
        let dir = Path::new(PRESET_DIR);
        let path = dir.join(format!("{name}.toml"));
        if !path.is_file() {
            let available = Options::list_presets(dir).join(", ");
            return Err(VizError::OptionsParse(format!(
                "unknown preset {name} (available: {available})"
            )));
        }
        return Options::load(&path);
    }
    args.options
        .as_deref()
        .map_or_else(|| Ok(Options::default()), Options::load)
}

fn run(args: &Args) -> Result<(), VizError> {
    let mut out = std::io::stdout().lock();
    if args.schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())?;
        writeln!(out, "{schema}")?;
        return Ok(());
    }

    let options = resolve_options(args)?;
    if let Some(path) = &args.save_options {
        options.save(path)?;
        log::info!("options written to {}", path.display());
    }

    let payload = match &args.input {
        Some(input) => {
            let response = parse_response(&read_input(input, &options)?)?;
            log::info!(
                "visualizing {}",
                response.molecule_name().unwrap_or("Unnamed")
            );
            response.visualization
        }
        None => {
            log::info!("no payload given, using the demo scene");
            VisualizationPayload::demo()
        }
    };

    let (width, height) = VIEWPORT;
    let mut viz = Visualizer::new(
        options,
        &DeviceProfile::desktop(1.0),
        HeadlessRenderer::new(),
        width,
        height,
    )?;
    if let Some(view) = args.view {
        viz.execute(VizCommand::SetView(view));
    }
    let report = viz.compose(&payload)?;

    let token = viz.start();
    let mut now = 0.0;
    for _ in 0..args.frames {
        now += FRAME_MS;
        let _ = viz.frame(token, now)?;
    }
    viz.stop();
    log::info!(
        "rendered {} frames, {} draw items in the last one",
        viz.backend().frames(),
        viz.backend().last_items().len()
    );

    let json = if args.dump_draw_list {
        viz.frame_json(now)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    writeln!(out, "{json}")?;
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        let argv = std::iter::once("nanoviz").chain(args.iter().copied());
        Args::try_parse_from(argv)
    }

    #[test]
    fn defaults_to_demo_and_sixty_frames() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.input, None);
        assert_eq!(args.frames, 60);
        assert_eq!(args.view, None);
        assert!(!args.dump_draw_list && !args.schema);
    }

    #[test]
    fn parses_flags_and_input() {
        let args = parse(&[
            "payload.json",
            "--frames",
            "5",
            "--view",
            "Nano",
            "--dump-draw-list",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some("payload.json"));
        assert_eq!(args.frames, 5);
        assert_eq!(args.view, Some(ViewMode::Nano));
        assert!(args.dump_draw_list);
    }

    #[test]
    fn unknown_preset_is_an_options_error() {
        let args = parse(&["--preset", "no-such-preset"]).unwrap();
        assert!(matches!(
            resolve_options(&args),
            Err(VizError::OptionsParse(_))
        ));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["--frames", "many"]).is_err());
        assert!(parse(&["--view", "everything"]).is_err());
        assert!(parse(&["--options"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--options", "a.toml", "--preset", "fast"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
