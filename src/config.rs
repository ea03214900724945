//! Configuration for the completion client and its collaborators

use serde::{Deserialize, Serialize};

/// Completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig
{   /// Chat-completion API base URL
    pub api_base: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
  , /// Prompt cap in characters; longer prompts are truncated
    pub prompt_cap: usize
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   api_base: "https://api.groq.com/openai/v1".to_string()
          , timeout_secs: 30
          , prompt_cap: 4000
        }
    }
}

/// Retrieval endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig
{   /// Endpoint answering `{question}` posts with source fragments
    pub endpoint: String
  , /// Request timeout in seconds
    pub timeout_secs: u64
}

impl RetrievalConfig
{   /// Configuration with the default timeout
    pub fn new(endpoint: String) -> Self
    {   RetrievalConfig
        {   endpoint
          , timeout_secs: 30
        }
    }
}

/// Backoff configuration for caller-driven retries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig
{   /// Max retry attempts
    pub max_retries: usize
  , /// Backoff multiplier for retries
    pub backoff_multiplier: f32
  , /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64
}

impl Default for RetryConfig
{   fn default() -> Self
    {   RetryConfig
        {   max_retries: 3
          , backoff_multiplier: 2.0
          , initial_backoff_ms: 100
        }
    }
}

/// Aggregate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AulagenConfig
{   /// Completion client configuration
    pub client: ClientConfig
  , /// Retrieval configuration; absent when no RAG backend is used
    pub retrieval: Option<RetrievalConfig>
  , /// Retry configuration
    pub retry: RetryConfig
}

impl Default for AulagenConfig
{   fn default() -> Self
    {   AulagenConfig
        {   client: ClientConfig::default()
          , retrieval: None
          , retry: RetryConfig::default()
        }
    }
}
