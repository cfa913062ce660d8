pub mod comparison;
pub mod detection;
pub mod extraction;
pub mod imaging;
pub mod pipeline;
pub mod shared;
