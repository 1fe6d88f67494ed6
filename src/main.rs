//! ST7735S LCD tool for Raspberry Pi
//!
//! Brings up an ST7735S panel from a JSON configuration and runs a one-shot
//! action on it:
//! - `--test`: colour cycle and shape test pattern
//! - `--clear`: fill the screen black
//! - `--fill R,G,B`: fill the screen with one colour

use anyhow::Context;
use clap::Parser;
use st7735s_lcd::config::{Config, DEFAULT_CONFIG_PATH};
use st7735s_lcd::{Color, Display, RpiTransport, Transport};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "st7735s-lcd")]
#[command(about = "ST7735S SPI LCD tool for Raspberry Pi")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Orientation 0-3 (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    orientation: Option<u8>,

    /// Gamma level 0-3 (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    gamma: Option<u8>,

    /// Enable display inversion (overrides config)
    #[arg(long)]
    invert: bool,

    /// Show test pattern and exit
    #[arg(long, conflicts_with_all = ["clear", "fill"])]
    test: bool,

    /// Clear display and exit
    #[arg(long, conflicts_with = "fill")]
    clear: bool,

    /// Fill display with a colour given as R,G,B and exit
    #[arg(long, value_name = "R,G,B")]
    fill: Option<Color>,

    /// Pulse the reset line before exiting (blanks the panel)
    #[arg(long)]
    reset_on_exit: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose);

    tracing::info!("Starting ST7735S LCD tool");

    let mut config = Config::load_or_default(&args.config);
    if let Some(orientation) = args.orientation {
        config.orientation = orientation;
    }
    if let Some(gamma) = args.gamma {
        config.gamma = gamma;
    }
    if args.invert {
        config.inverted = true;
    }
    config.validate()?;

    let transport = RpiTransport::new().context("Failed to open GPIO")?;
    let mut display = Display::initialize(transport, config.wiring(), config.pixel_format)
        .context("Failed to initialize display")?;

    display.set_orientation(config.orientation())?;
    display.set_gamma(config.gamma())?;
    display.set_inversion(config.inverted)?;

    if args.test {
        tracing::info!("Running test pattern...");
        test_pattern(&mut display)?;
        tracing::info!("Test pattern complete");
    } else if args.clear {
        tracing::info!("Clearing display...");
        display.fill_screen(Color::BLACK)?;
    } else if let Some(color) = args.fill {
        tracing::info!("Filling display with {:?}", color);
        display.fill_screen(color)?;
    }

    if args.reset_on_exit {
        display.destroy()?;
    }

    tracing::info!("Done");
    Ok(())
}

/// Colour cycle with timing, then lines, outlines, filled boxes and a raw
/// pixel stream
fn test_pattern<T: Transport>(display: &mut Display<T>) -> anyhow::Result<()> {
    let colors = [
        Color::RED,
        Color::GREEN,
        Color::BLUE,
        Color::YELLOW,
        Color::CYAN,
        Color::MAGENTA,
        Color::WHITE,
        Color::BLACK,
    ];

    let start = Instant::now();
    for color in colors {
        display.fill_screen(color)?;
    }
    tracing::info!("One fill_screen: ~{:?}", start.elapsed() / colors.len() as u32);

    let (w, h) = (display.width(), display.height());

    display.draw_hline(0, h - 11, w, Color::CYAN)?;
    display.draw_hline(0, h - 21, w, Color::YELLOW)?;
    display.draw_vline(w - 11, 0, h, Color::CYAN)?;
    display.draw_vline(w - 21, 0, h, Color::YELLOW)?;

    display.draw_rect(10, 10, 10, 10, Color::CYAN)?;
    display.draw_rect(10, 30, 10, 10, Color::YELLOW)?;
    display.fill_rect(30, 10, 10, 10, Color::CYAN)?;
    display.fill_rect(30, 30, 10, 10, Color::YELLOW)?;

    // Raw stream into a 10x10 window
    if display.set_window(20, 20, 29, 29)? {
        for _ in 0..50 {
            display.push_pixel_pair(Color::MAGENTA, Color::MAGENTA)?;
        }
    }
    display.set_window(0, 0, w - 1, h - 1)?;

    Ok(())
}

/// Initialize tracing/logging
///
/// Default level is "warn". Use --verbose flag for "debug" level.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("st7735s_lcd={}", level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
