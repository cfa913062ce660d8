use std::path::PathBuf;

/// A crop written to disk for one matching detection.
///
/// `sequence_index` starts at 1 and is dense per source image, in the order
/// the detections were supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedRegion {
    pub source_image_id: String,
    pub sequence_index: usize,
    pub file_path: PathBuf,
}
