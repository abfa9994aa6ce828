use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use moodcam_core::capture::domain::frame_capturer::FrameCapturer;
use moodcam_core::capture::infrastructure::png_encoder::PngFrameEncoder;
use moodcam_core::detection::domain::expression_detector::DetectionResult;
use moodcam_core::detection::domain::model_state::ModelState;
use moodcam_core::detection::infrastructure::onnx_detector_loader::OnnxDetectorLoader;
use moodcam_core::overlay::domain::annotation::format_label;
use moodcam_core::overlay::infrastructure::bitmap_renderer::BitmapOverlayRenderer;
use moodcam_core::persistence::domain::save_state::SaveState;
use moodcam_core::persistence::infrastructure::http_client::HttpPersistenceClient;
use moodcam_core::pipeline::capture_session::CaptureSession;
use moodcam_core::pipeline::detection_cycle::FrameSink;
use moodcam_core::pipeline::detection_session::DetectionSession;
use moodcam_core::pipeline::infrastructure::tickers::{CappedTicker, IntervalTicker};
use moodcam_core::shared::constants::{
    DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_ENDPOINT,
};
use moodcam_core::shared::frame::Frame;
use moodcam_core::source::domain::video_source::SourceConstraints;
use moodcam_core::source::infrastructure::nokhwa_camera::NokhwaSourceProvider;

/// Webcam photo booth and live expression detection.
#[derive(Parser)]
#[command(name = "moodcam")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive photo booth: capture stills and persist them.
    Capture {
        /// Camera device index.
        #[arg(long, default_value = "0")]
        device: u32,

        /// Requested capture width.
        #[arg(long, default_value_t = DEFAULT_CAPTURE_WIDTH)]
        width: u32,

        /// Requested capture height.
        #[arg(long, default_value_t = DEFAULT_CAPTURE_HEIGHT)]
        height: u32,

        /// Snapshot file-write endpoint.
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
    /// Live face/expression detection with overlay rendering.
    Detect {
        /// Camera device index.
        #[arg(long, default_value = "0")]
        device: u32,

        /// Requested capture width.
        #[arg(long, default_value_t = DEFAULT_CAPTURE_WIDTH)]
        width: u32,

        /// Requested capture height.
        #[arg(long, default_value_t = DEFAULT_CAPTURE_HEIGHT)]
        height: u32,

        /// Number of detection cycles to run.
        #[arg(long, default_value = "300")]
        frames: usize,

        /// Milliseconds between cycles.
        #[arg(long, default_value = "33")]
        interval_ms: u64,

        /// Directory for annotated frames (omit to log results only).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Face detection confidence threshold (0.0-1.0).
        #[arg(long, default_value = "0.7")]
        confidence: f32,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    match cli.command {
        Command::Capture {
            device,
            width,
            height,
            endpoint,
        } => run_capture(device, SourceConstraints { width, height }, &endpoint),
        Command::Detect {
            device,
            width,
            height,
            frames,
            interval_ms,
            out,
            confidence,
        } => run_detect(
            device,
            SourceConstraints { width, height },
            frames,
            interval_ms,
            out,
            confidence,
        ),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Capture { width, height, .. } => {
            validate_resolution(*width, *height)?;
        }
        Command::Detect {
            width,
            height,
            frames,
            interval_ms,
            confidence,
            ..
        } => {
            validate_resolution(*width, *height)?;
            if *frames == 0 {
                return Err("Frame count must be at least 1".into());
            }
            if *interval_ms == 0 {
                return Err("Interval must be at least 1ms".into());
            }
            if !(0.0..=1.0).contains(confidence) {
                return Err(format!(
                    "Confidence must be between 0.0 and 1.0, got {confidence}"
                )
                .into());
            }
        }
    }
    Ok(())
}

fn validate_resolution(width: u32, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    if width == 0 || height == 0 {
        return Err(format!("Resolution must be non-zero, got {width}x{height}").into());
    }
    Ok(())
}

fn run_capture(
    device: u32,
    constraints: SourceConstraints,
    endpoint: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = CaptureSession::new(
        Box::new(NokhwaSourceProvider::new(device)),
        FrameCapturer::new(Box::new(PngFrameEncoder::new())),
        Box::new(HttpPersistenceClient::new(endpoint)),
        constraints,
    );
    session.start()?;

    println!("Photo booth ready.");
    println!("Commands: [c]apture  [s]ave  [r]etake  [q]uit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "c" | "capture" => match session.capture() {
                Ok(snapshot) => {
                    println!("Captured {}x{} snapshot", snapshot.width(), snapshot.height());
                }
                Err(e) => eprintln!("Capture failed: {e}"),
            },
            "s" | "save" => {
                if let Some(name) = session.save_state().file_name() {
                    println!("Already saved as: {name}");
                    continue;
                }
                match session.save().clone() {
                    SaveState::Saved(name) => println!("Saved as: {name}"),
                    SaveState::Failed(e) => eprintln!("Save failed: {e} (retry or retake)"),
                    _ => println!("Nothing captured yet"),
                }
            }
            "r" | "retake" => match session.retake() {
                Ok(()) => println!("Snapshot discarded, live preview restarted"),
                Err(e) => eprintln!("Retake failed: {e}"),
            },
            "q" | "quit" => break,
            "" => {}
            other => println!("Unknown command: {other}"),
        }
    }

    session.shutdown();
    Ok(())
}

fn run_detect(
    device: u32,
    constraints: SourceConstraints,
    frames: usize,
    interval_ms: u64,
    out: Option<PathBuf>,
    confidence: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &out {
        std::fs::create_dir_all(dir)?;
    }

    let mut session = DetectionSession::new(
        Box::new(NokhwaSourceProvider::new(device)),
        constraints,
    );

    let loader =
        OnnxDetectorLoader::new(confidence).with_progress(Arc::new(download_progress));
    let state = session.load_model(&loader).clone();
    eprintln!();
    if let ModelState::Failed(e) = state {
        return Err(format!("Model load failed: {e}").into());
    }

    let ticks = CappedTicker::new(
        Box::new(IntervalTicker::new(Duration::from_millis(interval_ms))),
        frames,
    );
    let sink = AnnotatedFrameSink::new(out);

    session.start(
        Box::new(BitmapOverlayRenderer::new()),
        Box::new(sink),
        Box::new(ticks),
    )?;
    log::info!("detection loop started for {frames} cycles");
    session.wait();
    log::info!("detection loop finished");
    Ok(())
}

/// Logs each cycle's dominant expression and optionally writes the
/// annotated frame as a PNG.
struct AnnotatedFrameSink {
    dir: Option<PathBuf>,
    encoder: PngFrameEncoder,
    cycle: usize,
}

impl AnnotatedFrameSink {
    fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            encoder: PngFrameEncoder::new(),
            cycle: 0,
        }
    }
}

impl FrameSink for AnnotatedFrameSink {
    fn deliver(&mut self, frame: Frame, result: Option<&DetectionResult>) {
        use moodcam_core::capture::domain::frame_capturer::FrameEncoder;

        match result {
            Some(r) => {
                let (expression, score) = r.expressions.dominant();
                log::info!("cycle {}: {}", self.cycle, format_label(expression, score));
            }
            None => log::debug!("cycle {}: no face", self.cycle),
        }

        if let Some(dir) = &self.dir {
            match self.encoder.encode(&frame) {
                Ok(bytes) => {
                    let path = dir.join(format!("frame_{:05}.png", self.cycle));
                    if let Err(e) = std::fs::write(&path, bytes) {
                        log::warn!("failed to write {}: {e}", path.display());
                    }
                }
                Err(e) => log::warn!("failed to encode frame {}: {e}", self.cycle),
            }
        }
        self.cycle += 1;
    }
}

fn download_progress(name: &str, downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading {name}... {pct}%");
    } else {
        eprint!("\rDownloading {name}... {downloaded} bytes");
    }
}
