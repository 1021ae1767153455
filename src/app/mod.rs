mod event_handler;
mod pipeline;
mod state;

pub use event_handler::{handle_view_event, TransitionError};
pub use pipeline::{Controller, SubmitError};
pub use state::{Session, ViewEvent, ViewState, GENERIC_ERROR_MESSAGE};
