//! Client for the retrieval endpoint that seeds activity prompts

use log::{debug, trace, error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
struct Fragment
{   text: String
}

#[derive(Debug, Clone, Deserialize)]
struct ActivityPayload
{   atividade_texto: String
}

#[derive(Debug, Serialize)]
struct Question<'a>
{   question: &'a str
}

/// Resolve a retrieval body into plain source text.
///
/// Accepts either a list of `{text}` fragments, joined in arrival
/// order, or a single `{atividade_texto}` object.
pub fn parse_retrieval_body(body: &str)
  -> Result<String, crate::error::Error>
{   if let Ok(fragments)
      = serde_json::from_str::<Vec<Fragment>>(body)
    {   let joined = fragments
          .into_iter()
          .map(|fragment| fragment.text)
          .collect::<Vec<_>>()
          .join("\n");
        return Ok(joined);
    }

    if let Ok(payload)
      = serde_json::from_str::<ActivityPayload>(body)
    {   return Ok(payload.atividade_texto);
    }

    error!("Unexpected retrieval body shape");
    Err(crate::error::Error::MalformedResponse(
      crate::error::truncate_context(body)
    ))
}

/// Client for the upstream retrieval endpoint
pub struct RetrievalClient
{   http_client: reqwest::Client
  , endpoint: String
}

impl RetrievalClient
{   pub fn new(
      config: &crate::config::RetrievalConfig
    ) -> Self
    {   debug!(
          "Creating RetrievalClient for {}",
          config.endpoint
        );
        let http_client = reqwest::Client::builder()
          .timeout(std::time::Duration::from_secs(
            config.timeout_secs
          ))
          .build()
          .unwrap_or_else(|_| reqwest::Client::new());

        RetrievalClient
        {   http_client
          , endpoint: config.endpoint.clone()
        }
    }

    /// Post a question and return the resolved source text.
    pub async fn fetch_activity(
      &self
    , question: &str
    , api_token: &str
    ) -> Result<String, crate::error::Error>
    {   if api_token.trim().is_empty()
        {   error!("No retrieval token supplied");
            return Err(crate::error::Error::MissingCredential);
        }

        let response = self.http_client
          .post(&self.endpoint)
          .header(
            "Authorization",
            format!("Bearer {}", api_token)
          )
          .json(&Question { question })
          .send()
          .await
          .map_err(|e| {
            error!("Retrieval HTTP error: {}", e);
            crate::error::Error::TransportError(e.to_string())
          })?;

        let status = response.status();
        trace!("Retrieval response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_| String::new());
            error!(
              "Retrieval error {}: {}",
              status, error_text
            );
            return Err(crate::error::Error::from_status(
              status.as_u16(),
              &error_text
            ));
        }

        let body = response.text().await.map_err(|e| {
          error!("Retrieval read error: {}", e);
          crate::error::Error::TransportError(e.to_string())
        })?;

        let text = parse_retrieval_body(&body)?;
        if text.trim().is_empty()
        {   return Err(crate::error::Error::EmptyResponse);
        }

        Ok(text)
    }
}
