use thiserror::Error;

use super::state::{Session, ViewEvent, ViewState, GENERIC_ERROR_MESSAGE};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot handle '{event}' while {from}")]
pub struct TransitionError {
    pub from: ViewState,
    pub event: &'static str,
}

/// Apply an event to the session. This is the core state machine.
///
/// Events that are not valid in the current state are rejected and leave
/// the session untouched.
pub fn handle_view_event(session: &mut Session, event: ViewEvent) -> Result<(), TransitionError> {
    let from = session.state;
    match (from, event) {
        (ViewState::Idle, ViewEvent::Start) => {
            session.state = ViewState::Uploading;
        }
        (ViewState::Uploading, ViewEvent::FileAccepted(file)) => {
            // Replacing the file drops the previous one and its preview.
            session.current_file = Some(file);
            session.error_message.clear();
            session.state = ViewState::Analyzing;
        }
        (ViewState::Analyzing, ViewEvent::AnalysisComplete(result)) => {
            session.result = Some(result);
            session.state = ViewState::Results;
        }
        (ViewState::Analyzing, ViewEvent::AnalysisFailed(message)) => {
            session.error_message = if message.trim().is_empty() {
                GENERIC_ERROR_MESSAGE.to_string()
            } else {
                message
            };
            session.state = ViewState::Error;
        }
        (ViewState::Uploading | ViewState::Results | ViewState::Error, ViewEvent::Reset) => {
            if let Some(file) = session.current_file.take() {
                if let Err(e) = file.preview.release() {
                    log::warn!("Failed to release preview: {e}");
                }
            }
            session.result = None;
            session.error_message.clear();
            session.state = ViewState::Idle;
        }
        (_, event) => {
            log::info!("Ignoring '{}' while status={from}", event.name());
            return Err(TransitionError {
                from,
                event: event.name(),
            });
        }
    }

    if session.state != from {
        log::debug!("View state {from} -> {}", session.state);
    }
    Ok(())
}
