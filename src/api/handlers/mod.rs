pub mod assets;
pub mod upload;
