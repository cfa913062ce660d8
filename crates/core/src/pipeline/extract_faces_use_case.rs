use std::path::Path;

use crate::detection::domain::object_detector::ObjectDetector;
use crate::extraction::domain::extracted_region::ExtractedRegion;
use crate::extraction::domain::extraction_error::ExtractionError;
use crate::extraction::region_extractor::RegionExtractor;
use crate::imaging::domain::image_reader::ImageReader;

/// Single-image extraction pipeline: read → detect → crop → write.
pub struct ExtractFacesUseCase {
    reader: Box<dyn ImageReader>,
    detector: Box<dyn ObjectDetector>,
    extractor: RegionExtractor,
    target_class_id: usize,
}

impl ExtractFacesUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        detector: Box<dyn ObjectDetector>,
        extractor: RegionExtractor,
        target_class_id: usize,
    ) -> Self {
        Self {
            reader,
            detector,
            extractor,
            target_class_id,
        }
    }

    /// Extracts every target-class region of `image_path` into `output_dir`.
    ///
    /// Crops are named after the image's file stem. A decode failure aborts
    /// before the detector runs.
    pub fn execute(
        &mut self,
        image_path: &Path,
        output_dir: &Path,
    ) -> Result<Vec<ExtractedRegion>, ExtractionError> {
        let frame = self
            .reader
            .read(image_path)
            .map_err(|e| ExtractionError::Load {
                path: image_path.to_path_buf(),
                message: e.to_string(),
            })?;
        log::info!(
            "Loaded {} ({}x{})",
            image_path.display(),
            frame.width(),
            frame.height()
        );

        let detections = self
            .detector
            .detect(&frame)
            .map_err(|e| ExtractionError::Detection(e.to_string()))?;
        log::info!("Detector returned {} candidates", detections.len());

        let source_image_id = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        self.extractor.extract(
            &frame,
            &source_image_id,
            &detections,
            self.target_class_id,
            output_dir,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::{BoundingBox, Detection};
    use crate::imaging::domain::image_writer::ImageWriter;
    use crate::shared::frame::Frame;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubReader {
        frame: Option<Frame>,
    }

    impl ImageReader for StubReader {
        fn read(&self, _path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
            self.frame.clone().ok_or_else(|| "corrupt JPEG".into())
        }
    }

    struct StubDetector {
        detections: Vec<Detection>,
        calls: Arc<Mutex<usize>>,
    }

    impl ObjectDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.detections.clone())
        }
    }

    struct FailingDetector;

    impl ObjectDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Err("session crashed".into())
        }
    }

    struct StubImageWriter {
        written: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl ImageWriter for StubImageWriter {
        fn write(&self, path: &Path, _frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.written.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    // --- Helpers ---

    fn make_frame() -> Frame {
        Frame::new(vec![0; 64 * 64 * 3], 64, 64, 3)
    }

    fn det(class_id: usize) -> Detection {
        Detection::new(BoundingBox::new(2.0, 2.0, 12.0, 12.0), 0.8, class_id)
    }

    fn extractor(written: &Arc<Mutex<Vec<PathBuf>>>) -> RegionExtractor {
        RegionExtractor::new(Box::new(StubImageWriter {
            written: written.clone(),
        }))
    }

    // --- Tests ---

    #[test]
    fn test_names_crops_after_image_stem() {
        let dir = tempfile::tempdir().unwrap();
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut uc = ExtractFacesUseCase::new(
            Box::new(StubReader {
                frame: Some(make_frame()),
            }),
            Box::new(StubDetector {
                detections: vec![det(0), det(2), det(0)],
                calls: Arc::new(Mutex::new(0)),
            }),
            extractor(&written),
            0,
        );

        let regions = uc
            .execute(Path::new("images/sample.jpg"), dir.path())
            .unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].source_image_id, "sample");
        assert_eq!(regions[0].file_path, dir.path().join("sample_1.jpg"));
        assert_eq!(regions[1].file_path, dir.path().join("sample_2.jpg"));
        assert_eq!(written.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_uses_injected_target_class() {
        let dir = tempfile::tempdir().unwrap();
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut uc = ExtractFacesUseCase::new(
            Box::new(StubReader {
                frame: Some(make_frame()),
            }),
            Box::new(StubDetector {
                detections: vec![det(0), det(2), det(0)],
                calls: Arc::new(Mutex::new(0)),
            }),
            extractor(&written),
            2,
        );

        let regions = uc.execute(Path::new("card.png"), dir.path()).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].file_path, dir.path().join("card_1.jpg"));
    }

    #[test]
    fn test_load_failure_aborts_before_detection() {
        let dir = tempfile::tempdir().unwrap();
        let written = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(Mutex::new(0));
        let mut uc = ExtractFacesUseCase::new(
            Box::new(StubReader { frame: None }),
            Box::new(StubDetector {
                detections: vec![det(0)],
                calls: calls.clone(),
            }),
            extractor(&written),
            0,
        );

        let err = uc.execute(Path::new("broken.jpg"), dir.path()).unwrap_err();

        match err {
            ExtractionError::Load { path, message } => {
                assert_eq!(path, Path::new("broken.jpg"));
                assert_eq!(message, "corrupt JPEG");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detector_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let written = Arc::new(Mutex::new(Vec::new()));
        let mut uc = ExtractFacesUseCase::new(
            Box::new(StubReader {
                frame: Some(make_frame()),
            }),
            Box::new(FailingDetector),
            extractor(&written),
            0,
        );

        let err = uc.execute(Path::new("a.jpg"), dir.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Detection(ref m) if m == "session crashed"));
    }
}
