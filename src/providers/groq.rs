use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, trace, error};
use serde::{Deserialize, Serialize};

// ===== Wire Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqChatResponse
{   pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ChatMessage
  , pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqStreamChunk
{   #[serde(default)]
    pub choices: Vec<StreamChoice>
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice
{   pub delta: StreamDelta
  , pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamDelta
{   #[serde(default)]
    pub content: Option<String>
}

/// Build the chat-completion body shared by both transports.
pub fn build_chat_request(
  request: &crate::request::CompletionRequest
, stream: bool
) -> GroqChatRequest
{   let mut messages = Vec::new();

    if let Some(system) = &request.system_message
    {   messages.push(ChatMessage
        {   role: "system".to_string()
          , content: system.clone()
        });
    }

    messages.push(ChatMessage
    {   role: "user".to_string()
      , content: request.prompt_text.clone()
    });

    GroqChatRequest
    {   model: request.model_id.clone()
      , messages
      , temperature: Some(request.temperature)
      , top_p: request.top_p
      , max_tokens: Some(request.max_output_tokens)
      , stream: if stream { Some(true) } else { None }
    }
}

fn build_http_client(timeout_secs: u64) -> reqwest::Client
{   reqwest::Client::builder()
      .timeout(std::time::Duration::from_secs(timeout_secs))
      .build()
      .unwrap_or_else(|_| reqwest::Client::new())
}

// ===== Blocking REST Transport =====

/// Transport that reads the completion as one JSON body
pub struct RestTransport
{   http_client: reqwest::Client
  , api_base: String
}

impl RestTransport
{   pub fn new(config: &crate::config::ClientConfig) -> Self
    {   debug!("Creating RestTransport for {}", config.api_base);
        RestTransport
        {   http_client: build_http_client(config.timeout_secs)
          , api_base: config.api_base.clone()
        }
    }
}

#[async_trait]
impl crate::providers::CompletionTransport for RestTransport
{   fn name(&self) -> &'static str
    {   "groq-rest"
    }

    async fn fetch(
      &self
    , request: &crate::request::CompletionRequest
    , api_key: &str
    ) -> Result<
        Vec<crate::request::CompletionChunk>,
        crate::error::Error
      >
    {   let body = build_chat_request(request, false);
        trace!("Chat request: {:?}", body);

        let response = self.http_client
          .post(format!("{}/chat/completions", self.api_base))
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .json(&body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::TransportError(e.to_string())
          })?;

        let status = response.status();
        trace!("Chat response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_| String::new());
            error!(
              "Chat API error {}: {}",
              status, error_text
            );
            return Err(crate::error::Error::from_status(
              status.as_u16(),
              &error_text
            ));
        }

        let chat_response: GroqChatResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::MalformedResponse(
              e.to_string()
            )
          })?;

        let content = chat_response.choices.first()
          .map(|c| c.message.content.clone())
          .ok_or_else(|| {
            error!("No choices in response");
            crate::error::Error::MalformedResponse(
              "response contained no choices".to_string()
            )
          })?;

        Ok(vec![crate::request::CompletionChunk::text(content)])
    }
}

// ===== Streaming Transport =====

/// Transport that reassembles the completion from SSE chunks
pub struct SseTransport
{   http_client: reqwest::Client
  , api_base: String
}

impl SseTransport
{   pub fn new(config: &crate::config::ClientConfig) -> Self
    {   debug!("Creating SseTransport for {}", config.api_base);
        SseTransport
        {   http_client: build_http_client(config.timeout_secs)
          , api_base: config.api_base.clone()
        }
    }
}

#[async_trait]
impl crate::providers::CompletionTransport for SseTransport
{   fn name(&self) -> &'static str
    {   "groq-sse"
    }

    async fn fetch(
      &self
    , request: &crate::request::CompletionRequest
    , api_key: &str
    ) -> Result<
        Vec<crate::request::CompletionChunk>,
        crate::error::Error
      >
    {   let body = build_chat_request(request, true);
        trace!("Chat request: {:?}", body);

        let response = self.http_client
          .post(format!("{}/chat/completions", self.api_base))
          .header("Authorization", format!("Bearer {}", api_key))
          .header("Content-Type", "application/json")
          .json(&body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::TransportError(e.to_string())
          })?;

        let status = response.status();
        trace!("Chat response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_| String::new());
            error!(
              "Chat API error {}: {}",
              status, error_text
            );
            return Err(crate::error::Error::from_status(
              status.as_u16(),
              &error_text
            ));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut chunks = Vec::new();

        while let Some(piece) = stream.next().await
        {   let bytes = piece.map_err(|e| {
              error!("Stream read error: {}", e);
              crate::error::Error::TransportError(e.to_string())
            })?;

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            for payload in drain_sse_events(&mut buffer)
            {   if let Some(chunk) = parse_stream_payload(&payload)?
                {   chunks.push(chunk);
                }
            }
        }

        // Trailing event that never got its blank-line terminator
        if !buffer.trim().is_empty()
        {   buffer.push_str("\n\n");
            for payload in drain_sse_events(&mut buffer)
            {   if let Some(chunk) = parse_stream_payload(&payload)?
                {   chunks.push(chunk);
                }
            }
        }

        debug!("Stream finished with {} chunks", chunks.len());
        Ok(chunks)
    }
}

// ===== SSE Helpers =====

const SSE_EVENT_SEPARATOR: &str = "\n\n";

/// Drain complete SSE events from the buffer and return their data
/// payloads. Incomplete events stay buffered for the next call.
pub fn drain_sse_events(buffer: &mut String) -> Vec<String>
{   let mut events = Vec::new();

    while let Some(idx) = buffer.find(SSE_EVENT_SEPARATOR)
    {   let raw_event = buffer[..idx].replace('\r', "");
        buffer.drain(..idx + SSE_EVENT_SEPARATOR.len());

        if raw_event.trim().is_empty()
        {   continue;
        }

        let mut data_lines = Vec::new();
        for line in raw_event.lines()
        {   if let Some(data) = line.strip_prefix("data:")
            {   data_lines.push(data.trim_start().to_string());
            }
        }

        if !data_lines.is_empty()
        {   events.push(data_lines.join("\n"));
        }
    }

    events
}

/// Parse one SSE payload into a chunk.
/// Returns None for blanks and the `[DONE]` terminator.
pub fn parse_stream_payload(payload: &str)
  -> Result<
      Option<crate::request::CompletionChunk>,
      crate::error::Error
    >
{   let trimmed = payload.trim();
    if trimmed.is_empty() || trimmed == "[DONE]"
    {   return Ok(None);
    }

    let parsed: GroqStreamChunk
      = serde_json::from_str(trimmed).map_err(|e| {
        error!("Stream payload parse error: {}", e);
        crate::error::Error::MalformedResponse(format!(
          "{}: {}",
          e,
          crate::error::truncate_context(trimmed)
        ))
      })?;

    let content = parsed.choices
      .into_iter()
      .next()
      .and_then(|choice| choice.delta.content);

    Ok(Some(crate::request::CompletionChunk
    {   content
    }))
}
