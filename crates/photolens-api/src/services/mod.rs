//! Services behind the HTTP handlers.

pub mod analysis;
pub mod asset_store;

pub use analysis::{run_analysis, AnalysisInput};
pub use asset_store::{AssetStore, AssetUpload, CloudinaryStore};
