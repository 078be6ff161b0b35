mod settings;

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};

use declassify_core::compositing::disclosure_compositor::DisclosureCompositor;
use declassify_core::io::domain::image_reader::ImageReader;
use declassify_core::io::domain::image_writer::ImageWriter;
use declassify_core::io::infrastructure::image_file_reader::{is_image, ImageFileReader};
use declassify_core::io::infrastructure::image_file_writer::ImageFileWriter;
use declassify_core::pipeline::vision_tasks::{
    process_caption, process_detect, process_pointing, process_query,
};
use declassify_core::shared::constants::MAX_BLUR_RADIUS;
use declassify_core::shared::frame::Frame;
use declassify_core::vision::domain::vision_model::VisionModel;
use declassify_core::vision::infrastructure::moondream_client::MoondreamClient;
use declassify_core::vision::infrastructure::recorded_vision_model::RecordedVisionModel;

use settings::Settings;

/// Ask a vision model about an image and reveal only what it found.
#[derive(Parser)]
#[command(name = "declassify")]
struct Cli {
    #[command(subcommand)]
    task: Task,

    /// Replay model responses from a JSON file instead of calling the API.
    #[arg(long, global = true)]
    recorded: Option<PathBuf>,

    /// Blur radius (Gaussian sigma, pixels) for concealed areas.
    #[arg(long, global = true)]
    blur_radius: Option<f64>,

    /// Half-side of the square revealed around each pointed location.
    #[arg(long, global = true)]
    point_radius: Option<u32>,

    /// TrueType font for box labels.
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// API request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Task {
    /// Describe the image.
    Caption {
        /// Input image file.
        image: PathBuf,
    },
    /// Ask a question about the image.
    Query {
        image: PathBuf,

        #[arg(short, long, default_value = "")]
        question: String,
    },
    /// Blur everything except the detected objects.
    Detect {
        image: PathBuf,

        /// What to look for, e.g. "face".
        #[arg(short, long, default_value = "")]
        subject: String,

        /// Annotated output image.
        #[arg(short, long)]
        output: PathBuf,

        /// Shrink the output to fit this many pixels on its longest side.
        #[arg(long)]
        max_side: Option<u32>,
    },
    /// Blur everything except the locations the model points at.
    Point {
        image: PathBuf,

        #[arg(short, long, default_value = "")]
        prompt: String,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        max_side: Option<u32>,
    },
    /// Print the effective settings, optionally saving them as defaults.
    Config {
        #[arg(long)]
        save: bool,
    },
}

impl Task {
    fn input(&self) -> Option<&Path> {
        match self {
            Task::Caption { image }
            | Task::Query { image, .. }
            | Task::Detect { image, .. }
            | Task::Point { image, .. } => Some(image.as_path()),
            Task::Config { .. } => None,
        }
    }

    fn output(&self) -> Option<&Path> {
        match self {
            Task::Detect { output, .. } | Task::Point { output, .. } => Some(output.as_path()),
            _ => None,
        }
    }
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
    let settings = effective_settings(&cli, Settings::load());
    settings.validate()?;

    match &cli.task {
        Task::Config { save } => run_config(&settings, *save),
        Task::Caption { image } => {
            let model = build_model(&cli, &settings)?;
            let frame = read_image(image)?;
            println!("{}", process_caption(model.as_ref(), Some(&frame))?);
            Ok(())
        }
        Task::Query { image, question } => {
            let model = build_model(&cli, &settings)?;
            let frame = read_image(image)?;
            println!("{}", process_query(model.as_ref(), Some(&frame), question)?);
            Ok(())
        }
        Task::Detect {
            image,
            subject,
            output,
            max_side,
        } => {
            let model = build_model(&cli, &settings)?;
            let compositor = build_compositor(&settings);
            let frame = read_image(image)?;
            let annotated = process_detect(model.as_ref(), &compositor, Some(&frame), subject)?;
            write_image(&annotated, output, *max_side)
        }
        Task::Point {
            image,
            prompt,
            output,
            max_side,
        } => {
            let model = build_model(&cli, &settings)?;
            let compositor = build_compositor(&settings);
            let frame = read_image(image)?;
            let annotated = process_pointing(model.as_ref(), &compositor, Some(&frame), prompt)?;
            write_image(&annotated, output, *max_side)
        }
    }
}

fn run_config(settings: &Settings, save: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    if save {
        let path = settings.save()?;
        log::info!("Settings saved to {}", path.display());
    }
    Ok(())
}

/// Saved settings with any command-line overrides applied.
fn effective_settings(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(radius) = cli.blur_radius {
        settings.blur_radius = radius;
    }
    if let Some(radius) = cli.point_radius {
        settings.point_radius = radius;
    }
    if let Some(font) = &cli.font {
        settings.font = Some(font.clone());
    }
    if let Some(secs) = cli.timeout {
        settings.timeout_secs = secs;
    }
    settings
}

fn build_model(
    cli: &Cli,
    settings: &Settings,
) -> Result<Box<dyn VisionModel>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.recorded {
        log::info!("Replaying responses from {}", path.display());
        return Ok(Box::new(RecordedVisionModel::from_path(path)?));
    }
    let client = MoondreamClient::from_env(Duration::from_secs(settings.timeout_secs))?;
    log::info!("Using Moondream API at {}", client.endpoint());
    Ok(Box::new(client))
}

fn build_compositor(settings: &Settings) -> DisclosureCompositor {
    DisclosureCompositor::with_options(settings.compositor_options(), settings.font.as_deref())
}

fn read_image(path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
    let reader: Box<dyn ImageReader> = Box::new(ImageFileReader::new());
    reader.read(path)
}

fn write_image(
    frame: &Frame,
    path: &Path,
    max_side: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let writer: Box<dyn ImageWriter> = Box::new(ImageFileWriter::new());
    writer.write(frame, path, max_side)?;
    log::info!("Output written to {}", path.display());
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = cli.task.input() {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    if let Some(output) = cli.task.output() {
        if !is_image(output) {
            return Err(format!(
                "Output must have an image extension (png, jpg, ...), got {}",
                output.display()
            )
            .into());
        }
    }
    if let Some(radius) = cli.blur_radius {
        if !(0.0..=MAX_BLUR_RADIUS).contains(&radius) {
            return Err(format!(
                "Blur radius must be between 0 and {MAX_BLUR_RADIUS}, got {radius}"
            )
            .into());
        }
    }
    if let Some(font) = &cli.font {
        if !font.exists() {
            return Err(format!("Font file not found: {}", font.display()).into());
        }
    }
    if let Some(recorded) = &cli.recorded {
        if !recorded.exists() {
            return Err(format!("Recorded responses not found: {}", recorded.display()).into());
        }
    }
    if cli.timeout == Some(0) {
        return Err("Timeout must be at least 1 second".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("declassify").chain(args.iter().copied())).unwrap()
    }

    fn existing_input(dir: &Path) -> PathBuf {
        let path = dir.join("in.png");
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["detect", "in.png", "-s", "face", "-o", "out.png", "--blur-radius", "4"]);
        assert_eq!(cli.blur_radius, Some(4.0));
        assert!(matches!(cli.task, Task::Detect { ref subject, .. } if subject == "face"));
    }

    #[test]
    fn test_detect_requires_output() {
        let result = Cli::try_parse_from(["declassify", "detect", "in.png", "-s", "face"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_question_defaults_to_empty() {
        let cli = parse(&["query", "in.png"]);
        assert!(matches!(cli.task, Task::Query { ref question, .. } if question.is_empty()));
    }

    #[test]
    fn test_validate_missing_input() {
        let cli = parse(&["caption", "/nonexistent/in.png"]);
        let err = validate(&cli).unwrap_err().to_string();
        assert!(err.starts_with("Input file not found"));
    }

    #[test]
    fn test_validate_rejects_non_image_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = existing_input(dir.path());
        let cli = parse(&["point", input.to_str().unwrap(), "-o", "out.txt"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_blur_radius() {
        let cli = parse(&["config", "--blur-radius=-1"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_blur_radius() {
        let cli = parse(&["config", "--blur-radius", "1e9"]);
        let err = validate(&cli).unwrap_err().to_string();
        assert!(err.starts_with("Blur radius must be between 0 and 500"));
    }

    #[test]
    fn test_validate_accepts_config() {
        let cli = parse(&["config"]);
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_flags_override_saved_settings() {
        let cli = parse(&["config", "--point-radius", "9", "--timeout", "3"]);
        let saved = Settings {
            blur_radius: 2.0,
            ..Settings::default()
        };
        let settings = effective_settings(&cli, saved);
        assert_eq!(settings.point_radius, 9);
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.blur_radius, 2.0);
    }
}
