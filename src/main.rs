//! Virtual joystick host simulator
//!
//! Drives the joystick core from the terminal, standing in for a UI framework.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use virtual_joystick::layout::MeasureSpec;
use virtual_joystick::render::{Frame, RendererRef};
use virtual_joystick::{JoystickActor, JoystickConfig};

/// Virtual joystick - pointer-to-polar reporting from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file (defaults apply when omitted)
    #[arg(short, long, env = "JOYSTICK_CONFIG")]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Initial view width; the configured fallback size when omitted
    #[arg(long)]
    width: Option<u32>,

    /// Initial view height; the configured fallback size when omitted
    #[arg(long)]
    height: Option<u32>,

    /// Reporting interval in milliseconds, overriding the config file
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    let mut config = match &args.config {
        Some(path) => {
            info!("Configuration file: {}", path);
            JoystickConfig::load(path).await?
        }
        None => JoystickConfig::default(),
    };
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = interval_ms;
        config.validate()?;
    }

    let policy = config.layout_policy();
    let side = |arg: Option<u32>| arg.map(MeasureSpec::Exactly).unwrap_or(MeasureSpec::Unspecified);
    let size = policy.measure(side(args.width), side(args.height));

    let renderer: RendererRef = Arc::new(|frame: &Frame| {
        debug!(
            "Redraw: button at ({:.1}, {:.1})",
            frame.position.x, frame.position.y
        );
    });

    let handle = JoystickActor::spawn(&config, Some(renderer));
    handle.resize(size, size)?;
    handle.set_listener(cli::printing_listener())?;
    info!(
        "Joystick ready: {}x{} view, reporting every {} ms",
        size, size, config.interval_ms
    );

    cli::run_repl(handle.clone()).await?;

    handle.shutdown().await;
    info!("Shut down");
    Ok(())
}

/// Log to stderr so records don't interleave with REPL output on stdout
fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level '{}'", level))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
