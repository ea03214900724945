use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use aulagen::client::{accumulate, truncate_prompt, CompletionClient};
use aulagen::config::ClientConfig;
use aulagen::error::Error;
use aulagen::fallback::{generic_lesson_plan, FallbackPlaceholders};
use aulagen::normalize::{
  collapse_whitespace, normalize, preserve_markdown_structure,
  NormalizeMode
};
use aulagen::prompt;
use aulagen::prompt::PromptRequest;
use aulagen::providers::groq::{
  drain_sse_events, parse_stream_payload
};
use aulagen::providers::CompletionTransport;
use aulagen::request::{CompletionChunk, CompletionRequest};
use aulagen::retrieval::parse_retrieval_body;
use aulagen::retry::RetryPolicy;

fn init_logging()
{   let _ = env_logger::builder()
      .is_test(true)
      .try_init();
}

// ===== Transport Double =====

/// Shared state so tests can inspect the transport after the client
/// takes ownership of it
#[derive(Default)]
struct MockState
{   calls: AtomicUsize
  , received_prompt: Mutex<Option<String>>
}

struct MockTransport
{   state: Arc<MockState>
  , script: Result<Vec<CompletionChunk>, Error>
}

impl MockTransport
{   fn with_chunks(
      state: Arc<MockState>
    , chunks: Vec<CompletionChunk>
    ) -> Self
    {   MockTransport
        {   state
          , script: Ok(chunks)
        }
    }

    fn with_error(
      state: Arc<MockState>
    , error: Error
    ) -> Self
    {   MockTransport
        {   state
          , script: Err(error)
        }
    }
}

#[async_trait::async_trait]
impl CompletionTransport for MockTransport
{   fn name(&self) -> &'static str
    {   "mock"
    }

    async fn fetch(
      &self
    , request: &CompletionRequest
    , _api_key: &str
    ) -> Result<Vec<CompletionChunk>, Error>
    {   self.state.calls.fetch_add(1, Ordering::SeqCst);
        *self.state.received_prompt.lock().unwrap()
          = Some(request.prompt_text.clone());
        self.script.clone()
    }
}

fn mock_client(
  state: Arc<MockState>
, chunks: Vec<CompletionChunk>
) -> CompletionClient
{   let transport = Box::new(
      MockTransport::with_chunks(state, chunks)
    );
    CompletionClient::with_transport(
      transport,
      ClientConfig::default()
    )
}

// ===== Prompt Builder =====

#[test]
fn test_prompt_builder_determinism()
{   let request = PromptRequest
    {   subject: "Matemática".to_string()
      , thematic_unit: "Frações".to_string()
      , knowledge_objective: "Comparação de frações".to_string()
      , class_profile: "Turma heterogênea".to_string()
      , reference_date: "Março de 2024".to_string()
    };

    let first = prompt::lesson_plan_prompt(&request);
    let second = prompt::lesson_plan_prompt(&request);
    assert_eq!(first, second);

    for marker in prompt::SECTION_MARKERS
    {   assert!(
          first.contains(marker),
          "missing marker: {}",
          marker
        );
    }
    assert!(prompt::has_required_sections(&first));
}

#[test]
fn test_prompt_builder_defaults()
{   let request = PromptRequest::new(
      "Matemática".to_string(),
      "Frações".to_string()
    );
    assert_eq!(request.knowledge_objective, "");
    assert_eq!(request.class_profile, "");
    assert_eq!(request.reference_date, "");

    let rendered = prompt::lesson_plan_prompt(&request);
    assert!(rendered.contains("- Componente: Matemática"));
    assert!(rendered.contains("- Unidade Temática: Frações"));
    assert!(rendered.contains("- Objetivo de Conhecimento: \n"));
}

#[test]
fn test_activity_and_analysis_prompts()
{   let activity = prompt::activity_prompt(
      "Texto base sobre sílabas"
    );
    assert!(activity.contains("Texto base sobre sílabas"));
    assert!(activity.contains("passo a passo"));

    let analysis = prompt::analysis_prompt(
      "Alice: hipótese A\nBruno: hipótese B"
    );
    assert!(analysis.contains("no máximo 3"));
    assert!(analysis.contains("Alice: hipótese A"));
}

// ===== Accumulation =====

#[test]
fn test_accumulate_skips_empty_chunks()
{   let chunks = vec![
      CompletionChunk::text("Ol".to_string()),
      CompletionChunk::heartbeat(),
      CompletionChunk::text("á, ".to_string()),
      CompletionChunk::text("mundo".to_string()),
    ];
    assert_eq!(accumulate(chunks), "Olá, mundo");
}

#[test]
fn test_accumulate_preserves_order()
{   let chunks = vec![
      CompletionChunk::text("1".to_string()),
      CompletionChunk::text("2".to_string()),
      CompletionChunk::heartbeat(),
      CompletionChunk::text("3".to_string()),
    ];
    assert_eq!(accumulate(chunks), "123");
}

// ===== Normalization =====

#[test]
fn test_collapse_whitespace()
{   assert_eq!(
      collapse_whitespace("a\n\n  b\r\nc"),
      "a b c"
    );
    assert_eq!(collapse_whitespace("  já  pronto  "), "já pronto");
    assert_eq!(collapse_whitespace("\n \t \r\n"), "");
}

#[test]
fn test_normalize_idempotent()
{   let messy = "  # Título \r\n\r\n\r\n- item  um\n-  item dois \n";

    for mode in [
      NormalizeMode::CollapseWhitespace,
      NormalizeMode::PreserveMarkdownStructure,
    ] {
      let once = normalize(mode, messy);
      let twice = normalize(mode, &once);
      assert_eq!(once, twice, "mode not idempotent: {:?}", mode);
    }
}

#[test]
fn test_preserve_markdown_structure()
{   let raw = "## Objetivo Geral\r\n\r\n\r\nTexto   corrido.\n\n- item um\n-  item  dois\n\n\n";
    let cleaned = preserve_markdown_structure(raw);
    assert_eq!(
      cleaned,
      "## Objetivo Geral\n\nTexto corrido.\n\n- item um\n- item dois"
    );
}

// ===== Truncation =====

#[test]
fn test_truncate_prompt()
{   let long: String = "a".repeat(5000);
    let cut = truncate_prompt(&long, 4000)
      .expect("over-cap prompt must be cut");
    assert_eq!(cut.chars().count(), 4000);

    assert!(truncate_prompt("curto", 4000).is_none());
    assert!(truncate_prompt(&"é".repeat(4000), 4000).is_none());
}

// ===== Completion Client =====

#[tokio::test]
async fn test_missing_credential_skips_transport()
{   init_logging();
    let state = Arc::new(MockState::default());
    let client = mock_client(
      state.clone(),
      vec![CompletionChunk::text("nunca chega".to_string())]
    );

    let request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "qualquer prompt".to_string()
    );

    let result = client.complete(request, "").await;
    assert_eq!(result, Err(Error::MissingCredential));
    assert_eq!(state.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_blank_credential_skips_transport()
{   let state = Arc::new(MockState::default());
    let client = mock_client(
      state.clone(),
      vec![CompletionChunk::text("nunca chega".to_string())]
    );

    let request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "qualquer prompt".to_string()
    );

    let result = client.complete(request, "   ").await;
    assert_eq!(result, Err(Error::MissingCredential));
    assert_eq!(state.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_transport_error_propagates()
{   tokio_test::block_on(async {
      let state = Arc::new(MockState::default());
      let transport = Box::new(MockTransport::with_error(
        state.clone(),
        Error::RateLimited("try later".to_string())
      ));
      let client = CompletionClient::with_transport(
        transport,
        ClientConfig::default()
      );

      let request = CompletionRequest::new(
        "llama3-8b-8192".to_string(),
        "prompt".to_string()
      );

      let result = client.complete(request, "key").await;
      assert_eq!(
        result,
        Err(Error::RateLimited("try later".to_string()))
      );
      assert_eq!(state.calls.load(Ordering::SeqCst), 1);
    });
}

#[tokio::test]
async fn test_empty_response_is_failure()
{   let state = Arc::new(MockState::default());
    let client = mock_client(
      state,
      vec![
        CompletionChunk::heartbeat(),
        CompletionChunk::text("  \n\t ".to_string()),
        CompletionChunk::heartbeat(),
      ]
    );

    let request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "prompt".to_string()
    );

    let result = client.complete(request, "key").await;
    assert_eq!(result, Err(Error::EmptyResponse));
}

#[tokio::test]
async fn test_end_to_end_lesson_plan()
{   init_logging();
    let prompt_request = PromptRequest::new(
      "Matemática".to_string(),
      "Frações".to_string()
    );
    let prompt_text = prompt::lesson_plan_prompt(&prompt_request);

    let state = Arc::new(MockState::default());
    let client = mock_client(
      state.clone(),
      vec![
        CompletionChunk::text("Intro".to_string()),
        CompletionChunk::text("dução: ".to_string()),
        CompletionChunk::text("frações\n\n".to_string()),
        CompletionChunk::text(
          "são partes de um todo.".to_string()
        ),
      ]
    );

    let request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      prompt_text
    );

    let completion = client
      .complete(request, "key")
      .await
      .expect("scripted transport must succeed");

    assert_eq!(
      completion.text,
      "Introdução: frações são partes de um todo."
    );
    assert!(!completion.truncated_prompt);
    assert_eq!(state.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_truncation_reported()
{   let state = Arc::new(MockState::default());
    let client = mock_client(
      state.clone(),
      vec![CompletionChunk::text("plano".to_string())]
    );

    let request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "p".repeat(5000)
    );

    let completion = client
      .complete(request, "key")
      .await
      .expect("scripted transport must succeed");

    assert!(completion.truncated_prompt);

    let received = state.received_prompt
      .lock()
      .unwrap()
      .clone()
      .expect("transport must have seen the prompt");
    assert_eq!(received.chars().count(), 4000);
}

#[tokio::test]
async fn test_markdown_mode_keeps_structure()
{   let state = Arc::new(MockState::default());
    let client = mock_client(
      state,
      vec![
        CompletionChunk::text(
          "## Objetivo Geral\n\nTexto.".to_string()
        ),
      ]
    );

    let mut request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "prompt".to_string()
    );
    request.normalize
      = NormalizeMode::PreserveMarkdownStructure;

    let completion = client
      .complete(request, "key")
      .await
      .expect("scripted transport must succeed");

    assert_eq!(
      completion.text,
      "## Objetivo Geral\n\nTexto."
    );
}

// ===== Request Validation =====

#[tokio::test]
async fn test_request_validation()
{   let state = Arc::new(MockState::default());
    let client = mock_client(
      state.clone(),
      vec![CompletionChunk::text("ok".to_string())]
    );

    let mut hot = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "prompt".to_string()
    );
    hot.temperature = 3.0;
    let result = client.complete(hot, "key").await;
    assert!(matches!(
      result,
      Err(Error::InvalidConfiguration(_))
    ));

    let mut empty_budget = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "prompt".to_string()
    );
    empty_budget.max_output_tokens = 0;
    let result = client.complete(empty_budget, "key").await;
    assert!(matches!(
      result,
      Err(Error::InvalidConfiguration(_))
    ));

    assert_eq!(state.calls.load(Ordering::SeqCst), 0);
}

// ===== Error Taxonomy =====

#[test]
fn test_status_code_mapping()
{   assert!(matches!(
      Error::from_status(401, "bad key"),
      Error::AuthenticationFailed(_)
    ));
    assert!(matches!(
      Error::from_status(429, "slow down"),
      Error::RateLimited(_)
    ));
    assert!(matches!(
      Error::from_status(500, "boom"),
      Error::ServerError(500, _)
    ));
    assert!(matches!(
      Error::from_status(503, ""),
      Error::ServerError(503, _)
    ));
    assert!(matches!(
      Error::from_status(418, "teapot"),
      Error::TransportError(_)
    ));
}

#[test]
fn test_error_classification()
{   assert!(Error::RateLimited(String::new()).is_retryable());
    assert!(Error::ServerError(502, String::new()).is_retryable());
    assert!(!Error::MissingCredential.is_retryable());
    assert!(
      !Error::AuthenticationFailed(String::new()).is_retryable()
    );

    assert!(Error::EmptyResponse.degrades_to_fallback());
    assert!(
      Error::MalformedResponse(String::new())
        .degrades_to_fallback()
    );
    assert!(!Error::MissingCredential.degrades_to_fallback());
}

// ===== Fallback =====

#[test]
fn test_fallback_document()
{   let generic = generic_lesson_plan(
      &FallbackPlaceholders::default()
    );
    assert!(!generic.trim().is_empty());
    assert!(prompt::has_required_sections(&generic));
    assert!(generic.contains("[Componente]"));
    assert_eq!(
      generic,
      generic_lesson_plan(&FallbackPlaceholders::default())
    );

    let filled = generic_lesson_plan(&FallbackPlaceholders
    {   subject: "Matemática".to_string()
      , thematic_unit: "Frações".to_string()
      , knowledge_objective: "Comparação".to_string()
    });
    assert!(filled.contains(
      "**Componente Curricular:** Matemática"
    ));
    assert!(prompt::has_required_sections(&filled));
}

// ===== SSE Parsing =====

#[test]
fn test_drain_sse_events()
{   let mut buffer = String::new();
    buffer.push_str("data: {\"a\":1}\n\n");
    buffer.push_str("event: message\ndata: {\"b\":2}\n\n");
    buffer.push_str("data: incompleto");

    let events = drain_sse_events(&mut buffer);
    assert_eq!(
      events,
      vec![
        "{\"a\":1}".to_string(),
        "{\"b\":2}".to_string(),
      ]
    );
    assert_eq!(buffer, "data: incompleto");

    buffer.push_str("\n\n");
    let rest = drain_sse_events(&mut buffer);
    assert_eq!(rest, vec!["incompleto".to_string()]);
    assert!(buffer.is_empty());
}

#[test]
fn test_parse_stream_payload()
{   let chunk = parse_stream_payload(
      "{\"choices\":[{\"delta\":{\"content\":\"Olá\"}}]}"
    )
      .expect("well-formed payload must parse")
      .expect("payload carries a chunk");
    assert_eq!(chunk.content, Some("Olá".to_string()));

    let heartbeat = parse_stream_payload(
      "{\"choices\":[{\"delta\":{}}]}"
    )
      .expect("heartbeat payload must parse")
      .expect("payload carries a chunk");
    assert_eq!(heartbeat.content, None);

    assert_eq!(
      parse_stream_payload("[DONE]")
        .expect("terminator is not an error"),
      None
    );

    assert!(matches!(
      parse_stream_payload("not json"),
      Err(Error::MalformedResponse(_))
    ));
}

// ===== Retrieval =====

#[test]
fn test_parse_retrieval_body()
{   let fragments = parse_retrieval_body(
      "[{\"text\":\"primeira\"},{\"text\":\"segunda\"}]"
    )
      .expect("fragment list must parse");
    assert_eq!(fragments, "primeira\nsegunda");

    let object = parse_retrieval_body(
      "{\"atividade_texto\":\"texto da atividade\"}"
    )
      .expect("activity object must parse");
    assert_eq!(object, "texto da atividade");

    assert!(matches!(
      parse_retrieval_body("{\"outro\":true}"),
      Err(Error::MalformedResponse(_))
    ));
}

// ===== Retry Policy =====

#[test]
fn test_retry_policy()
{   let policy = RetryPolicy::default();

    let limited = Error::RateLimited(String::new());
    let first = policy.next_delay(&limited, 0)
      .expect("rate limit is retryable");
    let second = policy.next_delay(&limited, 1)
      .expect("still within budget");
    assert!(second > first);

    assert_eq!(policy.next_delay(&limited, 3), None);
    assert_eq!(
      policy.next_delay(&Error::MissingCredential, 0),
      None
    );
}

// ===== Live API (needs GROQ_API_KEY) =====

#[tokio::test]
#[ignore]
async fn test_groq_streaming_live()
{   init_logging();
    let api_key = match std::env::var("GROQ_API_KEY")
    {   Ok(key) => key
      , Err(_) => {
          println!("Skipping: GROQ_API_KEY not set");
          return;
        }
    };

    let client = CompletionClient::streaming(
      ClientConfig::default()
    );
    let request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "Diga olá em uma frase.".to_string()
    );

    match client.complete(request, &api_key).await
    {   Ok(completion) => {
          println!("Response: {}", completion.text);
          assert!(!completion.text.is_empty());
        }
      , Err(e) => {
          println!("API error: {}", e);
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_groq_blocking_live()
{   init_logging();
    let api_key = match std::env::var("GROQ_API_KEY")
    {   Ok(key) => key
      , Err(_) => {
          println!("Skipping: GROQ_API_KEY not set");
          return;
        }
    };

    let mut request = CompletionRequest::new(
      "llama3-8b-8192".to_string(),
      "Diga olá em uma frase.".to_string()
    );
    request.streaming = false;

    let client = CompletionClient::from_config(
      ClientConfig::default(),
      request.streaming
    );

    match client.complete(request, &api_key).await
    {   Ok(completion) => {
          println!("Response: {}", completion.text);
          assert!(!completion.text.is_empty());
        }
      , Err(e) => {
          println!("API error: {}", e);
        }
    }
}
