pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod prompt;
pub mod ui;
pub mod upload;

pub use analysis::{AnalysisResult, Modality};
pub use app::{Controller, ViewState};
pub use config::Config;
pub use error::AnalysisError;
pub use gateway::AnalysisGateway;
pub use upload::{select_file, RawFile, UploadFile, ValidationError};
