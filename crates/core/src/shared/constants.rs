/// Detector weights looked up next to the working directory, then in the model cache.
pub const DEFAULT_MODEL_PATH: &str = "last.onnx";

/// Image processed when none is given on the command line.
pub const DEFAULT_IMAGE_PATH: &str = "images/dio&ktpnya.jpg";

pub const DEFAULT_OUTPUT_DIR: &str = "extracted_faces";

pub const DEFAULT_COMPARE_URL: &str = "http://127.0.0.1:8000/verification/compare-faces";

/// The detector's first class label. The face model is trained with faces at index 0.
pub const DEFAULT_TARGET_CLASS: usize = 0;

/// File extension (and therefore encoding) of saved crops.
pub const CROP_EXTENSION: &str = "jpg";

/// Multipart field names expected by the comparison service.
pub const COMPARE_FIELD_FIRST: &str = "image1";
pub const COMPARE_FIELD_SECOND: &str = "image2";

/// Application directory name under the platform cache directory.
pub const APP_DIR_NAME: &str = "FaceCrop";
