use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;
use polygon_annotate::app::AnnotatorApp;
use polygon_annotate::config::{AnnotatorConfig, ConfigOverrides};
use polygon_annotate::logging;
use polygon_annotate::palette::FillScheme;
use polygon_annotate::table::TagField;
use std::path::PathBuf;
use std::process::ExitCode;

/// Draw and tag polygonal regions over an image.
#[derive(Parser, Debug)]
#[command(name = "polygon-annotate", version)]
struct CliArgs {
    /// Background image to load on startup.
    #[arg(short, long, value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// JSON config file; flags below override its values.
    #[arg(short, long, value_name = "FILE.json")]
    config: Option<PathBuf>,

    /// Canvas width in pixels [default: 800]
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height in pixels [default: 550]
    #[arg(long)]
    height: Option<f32>,

    /// Distance to the first vertex that closes a polygon [default: 10]
    #[arg(long)]
    closure_threshold: Option<f32>,

    /// Spacing of the placeholder grid [default: 50]
    #[arg(long)]
    grid_spacing: Option<f32>,

    /// Fill table for polygon interiors.
    #[arg(long, value_enum)]
    fill_scheme: Option<FillScheme>,

    /// Key used for the tag in commit records.
    #[arg(long, value_enum)]
    tag_field: Option<TagField>,

    /// Enable debug logging (RUST_LOG is honored).
    #[arg(long)]
    debug: bool,
}

impl CliArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            surface_width: self.width,
            surface_height: self.height,
            closure_threshold: self.closure_threshold,
            grid_spacing: self.grid_spacing,
            fill_scheme: self.fill_scheme,
            tag_field: self.tag_field,
        }
    }

    fn resolve_config(&self) -> Result<AnnotatorConfig> {
        let base = match &self.config {
            Some(path) => AnnotatorConfig::load(path)?,
            None => AnnotatorConfig::default(),
        };
        let config = base.apply(&self.overrides());
        config.validate()?;
        Ok(config)
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config = args.resolve_config()?;
    tracing::debug!(?config, "resolved configuration");

    let (width, height) = config.surface_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width + 48.0, height + 260.0])
            .with_title("Polygon Drawing Tool"),
        ..Default::default()
    };

    let initial_image = args.image;
    eframe::run_native(
        "polygon-annotate",
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotatorApp::new(config, initial_image)))),
    )
    .map_err(|e| anyhow!("failed to run eframe: {e}"))
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
