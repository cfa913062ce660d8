use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::domain::detection::Detection;
use crate::extraction::domain::extracted_region::ExtractedRegion;
use crate::extraction::domain::extraction_error::ExtractionError;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::constants::CROP_EXTENSION;
use crate::shared::frame::Frame;

/// Crops detections of one class out of an image and saves each crop.
///
/// Files are named `{source_image_id}_{sequence_index}.{extension}`, so a
/// second run over the same image overwrites the first run's crops.
pub struct RegionExtractor {
    image_writer: Box<dyn ImageWriter>,
    extension: String,
}

impl RegionExtractor {
    pub fn new(image_writer: Box<dyn ImageWriter>) -> Self {
        Self {
            image_writer,
            extension: CROP_EXTENSION.to_string(),
        }
    }

    /// Changes the extension (and therefore the encoding) of written crops.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Writes one crop per detection whose `class_id` equals `target_class_id`.
    ///
    /// Detections are visited in the given order. Box coordinates are
    /// truncated toward zero and clamped to the image. A degenerate box still
    /// produces a write attempt with a zero-size crop; the writer decides
    /// whether that fails. Crops written before a failure stay on disk.
    pub fn extract(
        &self,
        image: &Frame,
        source_image_id: &str,
        detections: &[Detection],
        target_class_id: usize,
        output_dir: &Path,
    ) -> Result<Vec<ExtractedRegion>, ExtractionError> {
        fs::create_dir_all(output_dir).map_err(|e| ExtractionError::OutputDir {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let mut regions = Vec::new();
        for detection in detections.iter().filter(|d| d.class_id == target_class_id) {
            let sequence_index = regions.len() + 1;
            let crop = crop_detection(image, detection);
            let file_path = self.region_path(output_dir, source_image_id, sequence_index);

            self.image_writer
                .write(&file_path, &crop)
                .map_err(|e| ExtractionError::Write {
                    path: file_path.clone(),
                    message: e.to_string(),
                })?;
            log::info!(
                "Region {sequence_index} extracted and saved to {}",
                file_path.display()
            );

            regions.push(ExtractedRegion {
                source_image_id: source_image_id.to_string(),
                sequence_index,
                file_path,
            });
        }

        if regions.is_empty() {
            log::info!("No regions of class {target_class_id} found in {source_image_id}");
        } else {
            log::info!("Total {} regions extracted from {source_image_id}", regions.len());
        }
        Ok(regions)
    }

    pub fn region_path(
        &self,
        output_dir: &Path,
        source_image_id: &str,
        sequence_index: usize,
    ) -> PathBuf {
        output_dir.join(format!(
            "{source_image_id}_{sequence_index}.{}",
            self.extension
        ))
    }
}

fn crop_detection(image: &Frame, detection: &Detection) -> Frame {
    let bounds = detection.bbox.pixel_bounds();
    let (x1, y1, x2, y2) = bounds.clamp_to(image.width(), image.height());

    if bounds.is_degenerate() {
        log::warn!("Degenerate box {:?}, crop will be empty", detection.bbox);
    } else if (x1 as i64, y1 as i64, x2 as i64, y2 as i64)
        != (bounds.x1, bounds.y1, bounds.x2, bounds.y2)
    {
        log::warn!(
            "Box {:?} exceeds {}x{} image, clamped",
            detection.bbox,
            image.width(),
            image.height()
        );
    }

    image.crop(x1, y1, x2, y2)
}
