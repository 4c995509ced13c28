//! countdownd - live countdowns to configured events
//!
//! This is the main entry point for the countdownd service.
//! It wires together all the components:
//! - Configuration loading and reload on SIGHUP
//! - Core countdown engine
//! - Tokio-backed tick scheduler
//! - Terminal or JSON-lines render driver

mod render;
mod scheduler;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use countdown_config::{CountdownConfig, load_config};
use countdown_core::CountdownEngine;
use countdown_host_api::{RenderDriver, Scheduler, SystemClock};
use countdown_util::default_config_path;
use std::path::PathBuf;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::render::{JsonRenderer, TerminalRenderer};
use crate::scheduler::TokioScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Redraw countdown panels in the terminal
    Terminal,
    /// One JSON display update per line, for an external render layer
    Json,
}

/// countdownd - Live countdowns to configured events
#[derive(Parser, Debug)]
#[command(name = "countdownd")]
#[command(about = "Live countdowns to configured events", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/countdowns/config.toml)
    #[arg(short, long, env = "COUNTDOWN_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Where display updates go
    #[arg(short, long, value_enum, default_value_t = Output::Terminal)]
    output: Output,

    /// Render a single tick and exit
    #[arg(long)]
    once: bool,
}

type BoxedRenderer = Box<dyn RenderDriver + Send>;

fn make_renderer(output: Output, config: &CountdownConfig, redraw: bool) -> BoxedRenderer {
    match output {
        Output::Terminal => {
            let renderer = TerminalRenderer::new(std::io::stdout(), config.display.color_mode);
            if redraw {
                Box::new(renderer)
            } else {
                Box::new(renderer.without_clearing())
            }
        }
        Output::Json => Box::new(JsonRenderer::new(std::io::stdout())),
    }
}

/// New configuration handed to the tick routine
struct Reload {
    config: CountdownConfig,
    renderer: BoxedRenderer,
}

/// Main service state
struct Service {
    args: Args,
    engine: CountdownEngine,
    renderer: BoxedRenderer,
}

impl Service {
    fn new(args: Args) -> Result<Self> {
        let config = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        info!(
            config_path = %args.config.display(),
            event_count = config.events.len(),
            warning_count = config.warnings.len(),
            "Configuration loaded"
        );

        let renderer = make_renderer(args.output, &config, !args.once);
        let engine = CountdownEngine::new(config);

        Ok(Self {
            args,
            engine,
            renderer,
        })
    }

    fn run_once(mut self) {
        let report = self.engine.run_tick(&SystemClock, &mut self.renderer);
        debug!(applied = report.applied, skipped = report.skipped, "Single tick rendered");
    }

    async fn run(self) -> Result<()> {
        let Service {
            args,
            mut engine,
            mut renderer,
        } = self;

        let update_interval = engine.config().display.update_interval;
        let (reload_tx, mut reload_rx) = mpsc::unbounded_channel::<Reload>();

        // The tick routine owns the engine; reloads reach it through the channel
        let mut scheduler = TokioScheduler::current()?;
        let tick_handle = scheduler.schedule(
            update_interval,
            Box::new(move || {
                while let Ok(reload) = reload_rx.try_recv() {
                    engine.reload(reload.config);
                    renderer = reload.renderer;
                }

                let report = engine.run_tick(&SystemClock, &mut renderer);
                if report.skipped > 0 {
                    debug!(skipped = report.skipped, "Tick skipped display updates");
                }
            }),
        )?;

        // Set up signal handlers
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sighup =
            signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

        info!(update_interval_ms = update_interval.as_millis() as u64, "Service running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }

                // Signal: SIGHUP - reload configuration
                _ = sighup.recv() => {
                    info!("Received SIGHUP, reloading configuration");
                    match load_config(&args.config) {
                        Ok(config) => {
                            if config.display.update_interval != update_interval {
                                warn!(
                                    current_ms = update_interval.as_millis() as u64,
                                    configured_ms =
                                        config.display.update_interval.as_millis() as u64,
                                    "Update interval changes take effect after restart"
                                );
                            }
                            let renderer = make_renderer(args.output, &config, true);
                            if reload_tx.send(Reload { config, renderer }).is_err() {
                                warn!("Tick routine is gone, reload dropped");
                            }
                        }
                        Err(e) => {
                            error!(
                                error = %e,
                                "Failed to reload configuration, keeping current one"
                            );
                        }
                    }
                }
            }
        }

        tick_handle.cancel();
        info!("Shutdown complete");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging. Stdout carries the display, so logs go to stderr.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match args.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    info!(version = env!("CARGO_PKG_VERSION"), "countdownd starting");
    if countdown_util::is_mock_time_active() {
        warn!(now = %countdown_util::now(), "Mock time is active");
    }

    let service = Service::new(args)?;
    if service.args.once {
        service.run_once();
        return Ok(());
    }
    service.run().await
}
