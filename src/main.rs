//! ShroomTrack - production desk for a mushroom processing business.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use shroomtrack as app;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use app::config::{AppConfig, ConfigLoadResult, LoggingConfig, ServiceMode};
use app::ui::App;

/// Procurement, processing floor and sales desk.
#[derive(Parser)]
#[command(name = "shroomtrack")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Work from the local data file instead of the remote service
    #[arg(long)]
    local: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (mut config, startup_error) = load_config(&config_path);
    if cli.local {
        config.service.mode = ServiceMode::Local;
    }

    let _guard = init_logging(&config.logging, &config_path);

    tracing::info!("ShroomTrack starting...");
    tracing::info!("Config path: {:?}", config_path);
    if let Some(e) = &startup_error {
        tracing::warn!("Config invalid, using defaults: {e}");
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let service = app::service::connect(&config).context("Failed to set up the data service")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ShroomTrack")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ShroomTrack",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            install_icon_fonts(&cc.egui_ctx);
            let mut app = App::new(config, service, rt);
            app.error_message = startup_error;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}

/// Load the config; a missing file is written out with defaults, an invalid one is reported.
fn load_config(path: &Path) -> (AppConfig, Option<String>) {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => (config, None),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            if let Err(e) = config.save(path) {
                eprintln!("Could not write default config to {}: {e}", path.display());
            }
            (config, None)
        }
        ConfigLoadResult::Invalid(e) => (
            AppConfig::default(),
            Some(format!("Invalid config ({}): {e}. Using defaults.", path.display())),
        ),
    }
}

/// Stdout logging plus an optional daily rolling file.
///
/// The returned guard must live until exit so buffered file output is flushed.
fn init_logging(logging: &LoggingConfig, config_path: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    if !logging.file_enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
        return None;
    }

    let directory = if logging.directory.trim().is_empty() {
        config_path
            .parent()
            .map(|p| p.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    } else {
        PathBuf::from(&logging.directory)
    };

    let appender = tracing_appender::rolling::daily(directory, "shroomtrack.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Some(guard)
}

/// Register the phosphor icon font used by buttons and cards.
fn install_icon_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
