use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pixelstamp_core::pipeline::{parse_image_list, MockupRow, Table, TranslationTable, WatermarkRequest};
use pixelstamp_core::{
    image_dimensions, Document, FileExporter, FsAssets, Pipeline, PipelineConfig, TextRenderer,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixelstamp", version, about = "Batch mockups, watermarks, resizes and translations")]
struct Cli {
    /// Pipeline settings (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Font used to draw text layers; overrides the config's `font_path`.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Allow any number of watermark tiles.
    #[arg(long, global = true, default_value_t = false)]
    no_tile_cap: bool,

    /// Log geometry and per-file details.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop each design into a template and recolor it, one export per CSV row.
    Mockup(MockupArgs),
    /// Resize and center-crop an image to an exact size.
    Resize(ResizeArgs),
    /// Tile a rotated watermark over a list of images.
    Watermark(WatermarkArgs),
    /// Export one copy of a template per language in a CSV table. Needs a font.
    Translate(TranslateArgs),
    /// Print `width,height` of an image.
    Dimensions(DimensionsArgs),
}

#[derive(Parser, Debug)]
struct MockupArgs {
    /// Folder holding the design files named in the CSV.
    images: PathBuf,
    /// Folder receiving the mockups.
    output: PathBuf,
    /// CSV with `design,color` rows after a header.
    csv: PathBuf,
    /// Template manifest (JSON).
    template: PathBuf,
}

#[derive(Parser, Debug)]
struct ResizeArgs {
    image: PathBuf,
    export: PathBuf,
    width: u32,
    height: u32,
}

#[derive(Parser, Debug)]
struct WatermarkArgs {
    /// Comma-separated image paths.
    images: String,
    /// Watermark tile image.
    watermark: PathBuf,
    output: PathBuf,
    /// Pattern rotation in degrees, positive = clockwise.
    #[arg(allow_negative_numbers = true)]
    rotation: f64,
    /// Tile opacity, 0 to 100.
    #[arg(value_parser = parse_percent)]
    opacity: f32,
    /// Diagonal of the largest image to cover, in pixels.
    diagonal: f64,
    tile_width: u32,
    tile_height: u32,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// CSV with a `*,layer...` header and `language,text...` rows.
    csv: PathBuf,
    /// Template manifest (JSON).
    template: PathBuf,
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct DimensionsArgs {
    image: PathBuf,
}

fn parse_percent(value: &str) -> Result<f32, String> {
    let percent: f32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("{percent} is outside 0..=100"));
    }
    Ok(percent)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(font) = cli.font {
        config.font_path = Some(font);
    }
    if cli.no_tile_cap {
        config.tile_cap = None;
    }

    tracing::debug!(?config, "effective config");

    let session = || -> anyhow::Result<Session> {
        Ok(Session {
            cancel: register_cancel_flag()?,
            text: load_font(&config)?,
            config,
        })
    };
    match cli.cmd {
        Command::Mockup(args) => session()?.mockup(args),
        Command::Resize(args) => session()?.resize(args),
        Command::Watermark(args) => session()?.watermark(args),
        Command::Translate(args) => session()?.translate(args),
        Command::Dimensions(args) => cmd_dimensions(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("load config '{}'", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn load_font(config: &PipelineConfig) -> anyhow::Result<Option<TextRenderer>> {
    config
        .font_path
        .as_deref()
        .map(|path| {
            TextRenderer::from_file(path).with_context(|| format!("load font '{}'", path.display()))
        })
        .transpose()
}

/// SIGINT/SIGTERM stop the run between rows.
fn register_cancel_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::flag;

        for signal in [SIGINT, SIGTERM] {
            flag::register(signal, Arc::clone(&flag))
                .with_context(|| format!("register handler for signal {signal}"))?;
        }
    }
    Ok(flag)
}

fn read_table(path: &Path) -> anyhow::Result<Table> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read csv '{}'", path.display()))?;
    Table::parse(&text).with_context(|| format!("parse csv '{}'", path.display()))
}

struct Session {
    config: PipelineConfig,
    cancel: Arc<AtomicBool>,
    text: Option<TextRenderer>,
}

impl Session {
    fn run<T>(
        &self,
        flow: impl FnOnce(&mut Pipeline<'_, FsAssets, FileExporter>) -> T,
    ) -> T {
        let assets = FsAssets;
        let mut sink = FileExporter;
        let mut pipeline = Pipeline::new(self.config.clone(), &assets, &mut sink)
            .with_cancel_flag(&self.cancel);
        if let Some(text) = &self.text {
            pipeline = pipeline.with_text_renderer(text);
        }
        flow(&mut pipeline)
    }

    fn mockup(&self, args: MockupArgs) -> anyhow::Result<()> {
        let rows = MockupRow::from_table(&read_table(&args.csv)?)
            .with_context(|| format!("read mockup rows from '{}'", args.csv.display()))?;
        let mut document = Document::load_template(&args.template, &FsAssets)
            .with_context(|| format!("load template '{}'", args.template.display()))?;

        let report = self
            .run(|pipeline| pipeline.mockup(&mut document, &args.images, &args.output, &rows))
            .context("mockup run failed")?;
        eprintln!("wrote {} mockup(s) to {}", report.batch.outputs.len(), args.output.display());
        Ok(())
    }

    fn resize(&self, args: ResizeArgs) -> anyhow::Result<()> {
        let report = self
            .run(|pipeline| pipeline.resize(&args.image, &args.export, args.width, args.height))
            .with_context(|| format!("resize '{}'", args.image.display()))?;
        for output in &report.outputs {
            eprintln!("wrote {}", output.display());
        }
        Ok(())
    }

    fn watermark(&self, args: WatermarkArgs) -> anyhow::Result<()> {
        let request = WatermarkRequest {
            images: parse_image_list(&args.images),
            watermark: args.watermark,
            output_dir: args.output,
            rotation_degrees: args.rotation,
            opacity: args.opacity / 100.0,
            diagonal: args.diagonal,
            tile_width: args.tile_width,
            tile_height: args.tile_height,
        };
        anyhow::ensure!(!request.images.is_empty(), "no images given");

        let report = self
            .run(|pipeline| pipeline.watermark(&request))
            .context("watermark run failed")?;
        eprintln!(
            "wrote {} watermarked image(s) to {}",
            report.outputs.len(),
            request.output_dir.display()
        );
        Ok(())
    }

    fn translate(&self, args: TranslateArgs) -> anyhow::Result<()> {
        let table = TranslationTable::from_table(&read_table(&args.csv)?)
            .with_context(|| format!("read translations from '{}'", args.csv.display()))?;
        let mut document = Document::load_template(&args.template, &FsAssets)
            .with_context(|| format!("load template '{}'", args.template.display()))?;

        let report = self
            .run(|pipeline| pipeline.translate(&mut document, &table, &args.output))
            .context("translate run failed")?;
        eprintln!("wrote {} translation(s) to {}", report.outputs.len(), args.output.display());
        Ok(())
    }
}

fn cmd_dimensions(args: DimensionsArgs) -> anyhow::Result<()> {
    let (width, height) = image_dimensions(&args.image)
        .with_context(|| format!("read dimensions of '{}'", args.image.display()))?;
    println!("{width},{height}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watermark_args_accept_negative_rotation() {
        let cli = Cli::try_parse_from([
            "pixelstamp", "watermark", "a.jpg,b.jpg", "wm.png", "out", "-30", "40", "1500", "200",
            "100",
        ])
        .unwrap();

        match cli.cmd {
            Command::Watermark(args) => {
                assert_eq!(args.rotation, -30.0);
                assert_eq!(args.opacity, 40.0);
                assert_eq!((args.tile_width, args.tile_height), (200, 100));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_opacity_out_of_range_is_rejected() {
        let result = Cli::try_parse_from([
            "pixelstamp", "watermark", "a.jpg", "wm.png", "out", "45", "150", "1500", "10", "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pixelstamp", "resize", "a.jpg", "web", "800", "600", "--no-tile-cap", "-v",
        ])
        .unwrap();
        assert!(cli.no_tile_cap);
        assert!(cli.verbose);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.json"))).is_err());
        assert_eq!(load_config(None).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixelstamp.json");
        std::fs::write(&path, r#"{"color_layer": "Shirt", "tile_cap": null}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.color_layer, "Shirt");
        assert_eq!(config.tile_cap, None);
    }
}
