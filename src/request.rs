//! Unified completion request and result types

use serde::{Deserialize, Serialize};

/// One chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest
{   /// Model identifier, e.g. "llama3-8b-8192"
    pub model_id: String
  , /// Prompt text; truncated to the configured cap before submission
    pub prompt_text: String
  , /// Optional system message
    pub system_message: Option<String>
  , /// Sampling temperature, valid range 0.0..=2.0
    pub temperature: f32
  , /// Nucleus sampling parameter
    pub top_p: Option<f32>
  , /// Maximum tokens to generate; must be positive
    pub max_output_tokens: usize
  , /// Whether the transport uses the streamed wire format
    pub streaming: bool
  , /// Normalization applied to the successful result
    pub normalize: crate::normalize::NormalizeMode
}

impl CompletionRequest
{   /// Request with the defaults used for lesson generation
    pub fn new(model_id: String, prompt_text: String) -> Self
    {   CompletionRequest
        {   model_id
          , prompt_text
          , system_message: Some(
              crate::prompt::SYSTEM_MESSAGE.to_string()
            )
          , temperature: 0.7
          , top_p: Some(1.0)
          , max_output_tokens: 1500
          , streaming: true
          , normalize:
              crate::normalize::NormalizeMode::CollapseWhitespace
        }
    }

    /// Reject parameter values outside the accepted ranges.
    pub fn validate(&self)
      -> Result<(), crate::error::Error>
    {   if !(0.0..=2.0).contains(&self.temperature)
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!(
                "temperature out of range: {}",
                self.temperature
              )
            ));
        }

        if self.max_output_tokens == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "max_output_tokens must be positive".to_string()
            ));
        }

        Ok(())
    }
}

/// Ordered incremental fragment of model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChunk
{   /// Text carried by the fragment; None for heartbeat chunks
    pub content: Option<String>
}

impl CompletionChunk
{   /// Fragment carrying text
    pub fn text(content: String) -> Self
    {   CompletionChunk
        {   content: Some(content)
        }
    }

    /// Fragment with no content
    pub fn heartbeat() -> Self
    {   CompletionChunk
        {   content: None
        }
    }
}

/// Final assembled completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion
{   /// Normalized completion text
    pub text: String
  , /// Set when the submitted prompt was cut down to the cap
    pub truncated_prompt: bool
}
