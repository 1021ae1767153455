use thiserror::Error;

use super::event_handler::{handle_view_event, TransitionError};
use super::state::{Session, ViewEvent, ViewState};
use crate::analysis::AnalysisResult;
use crate::gateway::AnalysisGateway;
use crate::upload::{select_file, RawFile, ValidationError};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The file was rejected; the controller stays in `Uploading`.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Sequences upload capture and the analysis gateway for one user session.
#[derive(Debug)]
pub struct Controller {
    session: Session,
    gateway: AnalysisGateway,
}

impl Controller {
    pub fn new(gateway: AnalysisGateway) -> Self {
        Self {
            session: Session::new(),
            gateway,
        }
    }

    pub fn state(&self) -> ViewState {
        self.session.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.session.result.as_ref()
    }

    pub fn error_message(&self) -> &str {
        &self.session.error_message
    }

    /// `Idle -> Uploading`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        handle_view_event(&mut self.session, ViewEvent::Start)
    }

    /// `Results | Error | Uploading -> Idle`, dropping file, result and error.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        handle_view_event(&mut self.session, ViewEvent::Reset)
    }

    /// Validate `raw` and, if accepted, run the analysis to completion.
    ///
    /// Returns `Ok` once the controller has settled in `Results` or `Error`;
    /// gateway failures are recorded on the session, not returned. A
    /// rejected file leaves the controller in `Uploading`.
    pub async fn submit(&mut self, raw: RawFile) -> Result<(), SubmitError> {
        if self.session.state != ViewState::Uploading {
            return Err(TransitionError {
                from: self.session.state,
                event: "file accepted",
            }
            .into());
        }

        let file = select_file(raw)?;
        log::info!("Preview available at {}", file.preview_url());
        handle_view_event(&mut self.session, ViewEvent::FileAccepted(file))?;

        let Some(file) = self.session.current_file.as_ref() else {
            return Err(TransitionError {
                from: self.session.state,
                event: "analysis started",
            }
            .into());
        };
        let outcome = self.gateway.analyze(file).await;

        let event = match outcome {
            Ok(result) => {
                log::info!("Analysis complete, overall score {}", result.overall_score);
                ViewEvent::AnalysisComplete(result)
            }
            Err(e) => {
                log::error!("Analysis failed: {e}");
                ViewEvent::AnalysisFailed(e.to_string())
            }
        };
        handle_view_event(&mut self.session, event)?;
        Ok(())
    }
}
