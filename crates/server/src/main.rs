use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use ab_glyph::FontArc;
use clap::Parser;

use headcount_core::annotate::infrastructure::overlay_annotator::OverlayAnnotator;
use headcount_core::capture::domain::frame_source::{share, FrameSource, SharedSource};
use headcount_core::capture::infrastructure::v4l2_source::V4l2Source;
use headcount_core::detection::infrastructure::cascade_detector::{
    CascadeDetector, DetectorConfig,
};
use headcount_core::encode::infrastructure::jpeg_encoder::JpegFrameEncoder;
use headcount_core::pipeline::stream_pipeline::StreamPipeline;
use headcount_core::shared::asset_resolver;
use headcount_core::shared::constants::{
    CASCADE_MODEL_NAME, CASCADE_MODEL_URL, DEFAULT_LABEL_PREFIX, LABEL_FONT_NAME, LABEL_FONT_URL,
};

use headcount_server::app::{app, AppState, PipelineFactory};

/// Camera face counter served as a live annotated video stream.
#[derive(Parser)]
#[command(name = "headcount")]
struct Cli {
    /// Camera device index (/dev/videoN).
    #[arg(long, default_value = "0")]
    camera_index: usize,

    /// Requested capture width in pixels.
    #[arg(long, default_value = "640")]
    width: u32,

    /// Requested capture height in pixels.
    #[arg(long, default_value = "480")]
    height: u32,

    /// Address and port to serve on.
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Overlay text drawn before the face count.
    #[arg(long, default_value = DEFAULT_LABEL_PREFIX)]
    label: String,

    /// Local cascade model file (skips the download).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Local TTF file for the overlay label (skips the download).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Smallest face reported, in pixels per side.
    #[arg(long, default_value = "80")]
    min_face_size: u32,

    /// Cascade score threshold; higher rejects more candidate windows.
    #[arg(long, default_value = "2.0")]
    score_thresh: f64,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    // Everything that can fail permanently fails here, before the
    // server binds: assets, model load, camera open.
    let model_path = asset_resolver::resolve(
        CASCADE_MODEL_NAME,
        CASCADE_MODEL_URL,
        cli.model.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    let font_path = asset_resolver::resolve(
        LABEL_FONT_NAME,
        LABEL_FONT_URL,
        cli.font.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    let font = FontArc::try_from_vec(std::fs::read(&font_path)?)
        .map_err(|e| format!("invalid label font {}: {e}", font_path.display()))?;

    let config = DetectorConfig {
        min_face_size: cli.min_face_size,
        score_thresh: cli.score_thresh,
        ..DetectorConfig::default()
    };
    // Startup validation only; each stream builds its own engine.
    CascadeDetector::new(&model_path, config)?;

    let mut camera = V4l2Source::new(cli.camera_index, cli.width, cli.height);
    let info = camera.open()?;
    log::info!("streaming at {}x{}", info.width, info.height);
    let source = share(Box::new(camera));

    let factory = pipeline_factory(source, model_path, config, font, cli.label);
    let state = Arc::new(AppState::new(factory));

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn pipeline_factory(
    source: SharedSource,
    model_path: PathBuf,
    config: DetectorConfig,
    font: FontArc,
    label: String,
) -> PipelineFactory {
    Box::new(move || {
        let detector =
            CascadeDetector::new(&model_path, config).map_err(|e| e.to_string())?;
        Ok(StreamPipeline::new(
            source.clone(),
            Box::new(detector),
            Box::new(OverlayAnnotator::new(font.clone(), label.clone())),
            Box::new(JpegFrameEncoder::new()),
            None,
        ))
    })
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.width == 0 || cli.height == 0 {
        return Err("capture resolution must be nonzero".into());
    }
    if cli.min_face_size < 20 {
        return Err(format!(
            "min face size must be at least 20, got {}",
            cli.min_face_size
        )
        .into());
    }
    if let Some(model) = &cli.model {
        if !model.exists() {
            return Err(format!("model file not found: {}", model.display()).into());
        }
    }
    if let Some(font) = &cli.font {
        if !font.exists() {
            return Err(format!("font file not found: {}", font.display()).into());
        }
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading assets... {pct}%");
    } else {
        eprint!("\rDownloading assets... {downloaded} bytes");
    }
}
