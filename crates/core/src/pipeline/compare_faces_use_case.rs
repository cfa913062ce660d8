use thiserror::Error;

use crate::comparison::domain::face_comparer::{ComparisonError, ComparisonResult, FaceComparer};
use crate::extraction::domain::extracted_region::ExtractedRegion;

#[derive(Error, Debug)]
pub enum CompareFacesError {
    #[error("comparison needs two extracted regions, found {0}")]
    NotEnoughRegions(usize),
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

/// Sends the first two extracted regions to a comparison service.
pub struct CompareFacesUseCase {
    comparer: Box<dyn FaceComparer>,
}

impl CompareFacesUseCase {
    pub fn new(comparer: Box<dyn FaceComparer>) -> Self {
        Self { comparer }
    }

    /// Returns `Ok(None)` when nothing was extracted, which callers treat as
    /// a clean "no faces" outcome. A single region is an error.
    pub fn execute(
        &self,
        regions: &[ExtractedRegion],
    ) -> Result<Option<ComparisonResult>, CompareFacesError> {
        match regions {
            [] => Ok(None),
            [_] => Err(CompareFacesError::NotEnoughRegions(1)),
            [first, second, ..] => {
                if regions.len() > 2 {
                    log::info!(
                        "{} regions extracted, comparing the first two",
                        regions.len()
                    );
                }
                let result = self
                    .comparer
                    .compare(&first.file_path, &second.file_path)?;
                Ok(Some(result))
            }
        }
    }
}
