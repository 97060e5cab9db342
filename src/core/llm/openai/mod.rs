//! OpenAI Chat Completions API integration.
//!
//! - API Endpoint: `POST https://api.openai.com/v1/chat/completions`
//! - One request per user message; the reply is the first choice's content.

mod client;
mod config;
mod messages;

pub use client::OpenAIChat;
pub use config::{OPENAI_CHAT_COMPLETIONS_PATH, OPENAI_DEFAULT_CHAT_MODEL, OpenAIChatConfig};
pub use messages::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
