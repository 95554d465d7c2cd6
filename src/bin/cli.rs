//! deckshot command line
//!
//! Opens a slide deck in Chrome, walks it slide by slide and writes the
//! captured slides out as a PDF or a directory of PNGs.

use anyhow::Context;
use clap::{ArgAction, Parser};
use deckshot::{BrowserDeck, BrowserSession, ConfigOverrides, DeckConfig, DeckError, OutputFormat, ScratchArea,
               ScreenshotSink, TraversalController,
               capture::assemble,
               config::parse_size,
               rules::FrameworkMode,
               utils::normalize_location};
use std::{path::PathBuf, process::ExitCode, time::Duration};

#[derive(Parser)]
#[command(name = "deckshot")]
#[command(version)]
#[command(about = "Capture an HTML slide deck into a single document", long_about = None)]
struct Cli {
    /// Deck URL or path to a local HTML file
    url: Option<String>,

    /// JSON configuration file; command-line values take precedence
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output PDF file, or directory for PNG output
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum)]
    format: Option<OutputFormat>,

    /// Viewport size, e.g. 1920x1080
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    size: Option<(u32, u32)>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// WebSocket endpoint URL of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Disable the Chrome sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Milliseconds to wait after each slide change
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Milliseconds to wait after the deck has loaded
    #[arg(long, value_name = "MS")]
    load_pause: Option<u64>,

    /// Stop after this many slides
    #[arg(long, value_name = "N")]
    max_slides: Option<usize>,

    /// End-of-deck detection to use when no stop rule is configured
    #[arg(long, value_enum)]
    framework: Option<FrameworkMode>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            url: self.url.clone(),
            output: self.output.clone(),
            format: self.format,
            size: self.size,
            headless: self.headed.then_some(false),
            chrome_path: self.chrome_path.clone(),
            sandbox: self.no_sandbox.then_some(false),
            ws_endpoint: self.ws_endpoint.clone(),
            animation_delay_ms: self.delay,
            load_pause_ms: self.load_pause,
            max_slides: self.max_slides,
            framework: self.framework,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let verbose = cli.verbose;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let unreachable = e.downcast_ref::<DeckError>().is_some_and(DeckError::is_content_unreachable);

            if verbose > 0 {
                eprintln!("Error: {:?}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }

            if unreachable { ExitCode::from(2) } else { ExitCode::FAILURE }
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => DeckConfig::load(path)?,
        None => DeckConfig::default(),
    };
    let config = base.apply(cli.overrides());
    config.validate()?;

    let url = normalize_location(config.url.as_deref().unwrap_or_default());
    let rules = config.rules();

    let session = match config.connection_options() {
        Some(connection) => BrowserSession::connect(connection).context("Failed to attach to the browser")?,
        None => BrowserSession::launch(config.launch_options()).context("Failed to start the browser")?,
    };
    let scratch = ScratchArea::new().context("Failed to create a scratch directory")?;

    let deck = BrowserDeck::open(&session, &url).map_err(|e| DeckError::ContentUnreachable(Box::new(e)))?;
    if config.load_pause_ms > 0 {
        std::thread::sleep(Duration::from_millis(config.load_pause_ms));
    }

    let sink = ScreenshotSink::new(&session, scratch.path());
    let mut controller = TraversalController::new(deck, sink, rules, config.traversal_options());
    let report = controller.run()?;
    let (_, sink) = controller.into_parts();
    let images = sink.into_files();

    assemble(&session, config.format, &images, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    if let Err(e) = scratch.close() {
        log::warn!("Failed to remove scratch directory: {}", e);
    }

    eprintln!("Captured {} slide(s) into {}", report.slide_count(), config.output.display());
    if report.truncated {
        eprintln!("Stopped at the slide limit before the end of the deck was detected");
    }
    if !report.diagnostics.is_empty() {
        eprintln!("{} configuration warning(s), see the log output above", report.diagnostics.len());
    }

    Ok(())
}
