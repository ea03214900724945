//! Caller-injected observation hooks for the completion pipeline

use log::{error, info};

/// Hooks invoked around each completion call.
/// Destination and formatting stay with the caller.
pub trait CompletionObserver: Send + Sync
{   /// A request is about to be submitted
    fn on_request(&self, model_id: &str, prompt_chars: usize);

    /// A normalized completion was produced
    fn on_response(&self, model_id: &str, response_chars: usize);

    /// The call failed with a taxonomy error
    fn on_error(
      &self
    , model_id: &str
    , error: &crate::error::Error
    );
}

/// Observer that forwards events to the `log` facade
pub struct LogObserver;

impl CompletionObserver for LogObserver
{   fn on_request(&self, model_id: &str, prompt_chars: usize)
    {   info!(
          "Sending completion request to {} ({} chars)",
          model_id, prompt_chars
        );
    }

    fn on_response(&self, model_id: &str, response_chars: usize)
    {   info!(
          "Completion from {} finished ({} chars)",
          model_id, response_chars
        );
    }

    fn on_error(
      &self
    , model_id: &str
    , error: &crate::error::Error
    )
    {   error!("Completion from {} failed: {}", model_id, error);
    }
}

/// Observer that drops every event
pub struct NullObserver;

impl CompletionObserver for NullObserver
{   fn on_request(&self, _model_id: &str, _prompt_chars: usize) {}

    fn on_response(&self, _model_id: &str, _response_chars: usize) {}

    fn on_error(
      &self
    , _model_id: &str
    , _error: &crate::error::Error
    ) {}
}
