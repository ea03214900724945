use std::fmt;

/// Maximum characters of raw provider output carried inside an error
const CONTEXT_CAP: usize = 200;

/// Truncate raw response text so error values stay readable in logs.
pub fn truncate_context(body: &str) -> String
{   if body.chars().count() <= CONTEXT_CAP
    {   return body.to_string();
    }
    let cut: String = body.chars().take(CONTEXT_CAP).collect();
    format!("{}...", cut)
}

/// Failure taxonomy for the completion pipeline
/// Implements Clone so callers can keep it alongside fallback output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No credential was supplied for the call
    MissingCredential
  , /// Connection, timeout or HTTP-layer failure
    TransportError(String)
  , /// Response body had an unexpected shape
    MalformedResponse(String)
  , /// Accumulated completion was empty or all-whitespace
    EmptyResponse
  , /// HTTP 429 from the provider
    RateLimited(String)
  , /// HTTP 401 from the provider
    AuthenticationFailed(String)
  , /// HTTP 5xx from the provider
    ServerError(u16, String)
  , /// Request failed local validation
    InvalidConfiguration(String)
}

impl Error
{   /// Map a non-2xx HTTP status onto the taxonomy.
    pub fn from_status(status: u16, body: &str) -> Self
    {   let context = truncate_context(body);
        match status
        {   401 => Error::AuthenticationFailed(context)
          , 429 => Error::RateLimited(context)
          , s if s >= 500 => Error::ServerError(s, context)
          , s => Error::TransportError(
              format!("HTTP {}: {}", s, context)
            )
        }
    }

    /// Whether a caller-driven retry with backoff can help
    pub fn is_retryable(&self) -> bool
    {   matches!(
          self,
          Error::RateLimited(_) | Error::ServerError(_, _)
        )
    }

    /// Whether the caller should mask the failure with the generic plan
    pub fn degrades_to_fallback(&self) -> bool
    {   matches!(
          self,
          Error::MalformedResponse(_) | Error::EmptyResponse
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingCredential => {
              write!(f, "No API credential supplied")
            }
          , Error::TransportError(msg) => {
              write!(f, "Transport error: {}", msg)
            }
          , Error::MalformedResponse(msg) => {
              write!(f, "Malformed response: {}", msg)
            }
          , Error::EmptyResponse => {
              write!(f, "Completion was empty")
            }
          , Error::RateLimited(msg) => {
              write!(f, "Rate limited by provider: {}", msg)
            }
          , Error::AuthenticationFailed(msg) => {
              write!(f, "Authentication failed: {}", msg)
            }
          , Error::ServerError(status, msg) => {
              write!(f, "Provider error {}: {}", status, msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
