//! aulagen: completion core for a lesson-plan generator.
//!
//! The crate renders structured pedagogical parameters into a prompt,
//! submits it to a chat-completion endpoint over a streaming or a
//! blocking transport, reassembles the text from incremental chunks,
//! normalizes it for rendering, and supplies a generic fallback plan
//! when the live pipeline fails.

pub mod error;
pub mod config;
pub mod prompt;
pub mod normalize;
pub mod fallback;
pub mod observer;
pub mod request;
pub mod providers;
pub mod retrieval;
pub mod retry;
pub mod client;

pub use crate::client::CompletionClient;
pub use crate::error::Error;
pub use crate::fallback::{generic_lesson_plan, FallbackPlaceholders};
pub use crate::normalize::NormalizeMode;
pub use crate::prompt::{PromptRequest, PromptTemplate};
pub use crate::request::{Completion, CompletionChunk, CompletionRequest};
pub use crate::retrieval::RetrievalClient;
pub use crate::retry::RetryPolicy;
