pub mod extracted_region;
pub mod extraction_error;
