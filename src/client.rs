use log::{debug, warn};

/// Append chunk contents in arrival order.
/// Chunks without content contribute nothing; no reordering, no
/// deduplication.
pub fn accumulate<I>(chunks: I) -> String
where
  I: IntoIterator<Item = crate::request::CompletionChunk>
{   let mut buffer = String::new();
    for chunk in chunks
    {   if let Some(content) = chunk.content
        {   buffer.push_str(&content);
        }
    }
    buffer
}

/// Cut the prompt at `cap` characters.
/// Returns None when the prompt already fits.
pub fn truncate_prompt(prompt: &str, cap: usize)
  -> Option<String>
{   match prompt.char_indices().nth(cap)
    {   Some((idx, _)) => Some(prompt[..idx].to_string())
      , None => None
    }
}

/// Client for one chat-completion endpoint
pub struct CompletionClient
{   transport: Box<dyn crate::providers::CompletionTransport>
  , config: crate::config::ClientConfig
  , observer: Box<dyn crate::observer::CompletionObserver>
}

impl CompletionClient
{   /// Client over the streamed wire format
    pub fn streaming(
      config: crate::config::ClientConfig
    ) -> Self
    {   let transport = Box::new(
          crate::providers::groq::SseTransport::new(&config)
        );
        CompletionClient::with_transport(transport, config)
    }

    /// Client over the single-body wire format
    pub fn blocking(
      config: crate::config::ClientConfig
    ) -> Self
    {   let transport = Box::new(
          crate::providers::groq::RestTransport::new(&config)
        );
        CompletionClient::with_transport(transport, config)
    }

    /// Client whose transport matches the requested wire format
    pub fn from_config(
      config: crate::config::ClientConfig
    , streaming: bool
    ) -> Self
    {   if streaming
        {   CompletionClient::streaming(config)
        } else
        {   CompletionClient::blocking(config)
        }
    }

    /// Client over a caller-supplied transport
    pub fn with_transport(
      transport: Box<dyn crate::providers::CompletionTransport>
    , config: crate::config::ClientConfig
    ) -> Self
    {   debug!(
          "Creating CompletionClient over {}",
          transport.name()
        );
        CompletionClient
        {   transport
          , config
          , observer: Box::new(crate::observer::LogObserver)
        }
    }

    /// Replace the default log observer
    pub fn with_observer(
      mut self
    , observer: Box<dyn crate::observer::CompletionObserver>
    ) -> Self
    {   self.observer = observer;
        self
    }

    /// Submit one request and return the normalized completion.
    ///
    /// Exactly one outbound call is made; retries stay with the
    /// caller. Every failure path maps onto the error taxonomy.
    pub async fn complete(
      &self
    , request: crate::request::CompletionRequest
    , api_key: &str
    ) -> Result<
        crate::request::Completion,
        crate::error::Error
      >
    {   let mut request = request;

        if let Err(err) = request.validate()
        {   self.observer.on_error(&request.model_id, &err);
            return Err(err);
        }

        if api_key.trim().is_empty()
        {   let err = crate::error::Error::MissingCredential;
            self.observer.on_error(&request.model_id, &err);
            return Err(err);
        }

        let mut truncated_prompt = false;
        if let Some(shorter) = truncate_prompt(
          &request.prompt_text,
          self.config.prompt_cap
        )
        {   warn!(
              "Prompt truncated from {} to {} chars",
              request.prompt_text.chars().count(),
              self.config.prompt_cap
            );
            request.prompt_text = shorter;
            truncated_prompt = true;
        }

        self.observer.on_request(
          &request.model_id,
          request.prompt_text.chars().count()
        );

        let chunks = match self.transport
          .fetch(&request, api_key)
          .await
        {   Ok(chunks) => chunks
          , Err(err) => {
              self.observer.on_error(&request.model_id, &err);
              return Err(err);
            }
        };

        let raw = accumulate(chunks);
        if raw.trim().is_empty()
        {   let err = crate::error::Error::EmptyResponse;
            self.observer.on_error(&request.model_id, &err);
            return Err(err);
        }

        let text = crate::normalize::normalize(
          request.normalize,
          &raw
        );

        self.observer.on_response(
          &request.model_id,
          text.chars().count()
        );

        Ok(crate::request::Completion
        {   text
          , truncated_prompt
        })
    }
}
