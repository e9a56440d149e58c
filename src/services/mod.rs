pub mod analysis_service;
pub mod analyzer;
pub mod decoder;
pub mod extractor;
pub mod reconciler;
pub mod staging;
