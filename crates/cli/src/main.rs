use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use face_crop_core::comparison::infrastructure::http_face_comparer::HttpFaceComparer;
use face_crop_core::detection::domain::object_detector::ObjectDetector;
use face_crop_core::detection::infrastructure::model_resolver;
use face_crop_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use face_crop_core::extraction::region_extractor::RegionExtractor;
use face_crop_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use face_crop_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use face_crop_core::pipeline::compare_faces_use_case::CompareFacesUseCase;
use face_crop_core::pipeline::extract_faces_use_case::ExtractFacesUseCase;
use face_crop_core::shared::constants::{
    DEFAULT_COMPARE_URL, DEFAULT_IMAGE_PATH, DEFAULT_MODEL_PATH, DEFAULT_OUTPUT_DIR,
    DEFAULT_TARGET_CLASS,
};

/// Crop detected faces from an image and compare the first two with a remote service.
#[derive(Parser)]
#[command(name = "face-crop")]
struct Cli {
    /// Image to extract faces from.
    #[arg(long, default_value = DEFAULT_IMAGE_PATH)]
    image: PathBuf,

    /// Directory receiving the cropped faces.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Comparison endpoint receiving the two crops as multipart fields image1/image2.
    #[arg(long, default_value = DEFAULT_COMPARE_URL)]
    api_url: String,

    /// YOLO detection model (ONNX). Looked up in the model cache when missing.
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Download the model from this URL when it is not found locally.
    #[arg(long)]
    model_url: Option<String>,

    /// Detector class index to extract.
    #[arg(long, default_value_t = DEFAULT_TARGET_CLASS)]
    target_class: usize,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Comparison request timeout in seconds (no timeout when omitted).
    #[arg(long)]
    timeout_secs: Option<u64>,
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

    let detector = build_detector(&cli)?;
    let extractor = RegionExtractor::new(Box::new(ImageFileWriter::new()));
    let mut extract = ExtractFacesUseCase::new(
        Box::new(ImageFileReader::new()),
        detector,
        extractor,
        cli.target_class,
    );
    let regions = extract.execute(&cli.image, &cli.output_dir)?;

    if regions.is_empty() {
        eprintln!("No faces extracted from {}.", cli.image.display());
        return Ok(());
    }
    eprintln!(
        "Extracted {} faces to {}",
        regions.len(),
        cli.output_dir.display()
    );

    let mut comparer = HttpFaceComparer::new(&cli.api_url);
    if let Some(secs) = cli.timeout_secs {
        comparer = comparer.with_timeout(Duration::from_secs(secs));
    }
    let compare = CompareFacesUseCase::new(Box::new(comparer));
    if let Some(result) = compare.execute(&regions)? {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {}", cli.model.display());
    let model_path = model_resolver::resolve(
        &cli.model,
        cli.model_url.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    if cli.model_url.is_some() {
        eprintln!();
    }

    Ok(Box::new(OnnxYoloDetector::new(&model_path, cli.confidence)?))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.image.is_file() {
        return Err(format!("Input image not found: {}", cli.image.display()).into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.timeout_secs == Some(0) {
        return Err("Timeout must be at least 1 second".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading detection model... {pct}%");
    } else {
        eprint!("\rDownloading detection model... {downloaded} bytes");
    }
}
