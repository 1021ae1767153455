use std::fmt;

use crate::analysis::AnalysisResult;
use crate::upload::UploadFile;

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred during analysis. Please try again.";

/// Which view the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Uploading,
    Analyzing,
    Results,
    Error,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Analyzing => "analyzing",
            Self::Results => "results",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Inputs that drive the view-state machine.
#[derive(Debug)]
pub enum ViewEvent {
    Start,
    FileAccepted(UploadFile),
    AnalysisComplete(AnalysisResult),
    AnalysisFailed(String),
    Reset,
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FileAccepted(_) => "file accepted",
            Self::AnalysisComplete(_) => "analysis complete",
            Self::AnalysisFailed(_) => "analysis failed",
            Self::Reset => "reset",
        }
    }
}

/// Per-session view state. Owns the current upload (and so its preview).
#[derive(Debug)]
pub struct Session {
    pub state: ViewState,
    pub current_file: Option<UploadFile>,
    pub result: Option<AnalysisResult>,
    pub error_message: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: ViewState::Idle,
            current_file: None,
            result: None,
            error_message: String::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
