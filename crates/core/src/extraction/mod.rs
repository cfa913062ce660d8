pub mod domain;
pub mod region_extractor;
