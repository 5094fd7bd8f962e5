//! LLM provider abstractions and implementations.

mod claude;
mod mock;
mod provider;
mod retry;

pub use claude::ClaudeProvider;
pub use mock::{MockLlmProvider, MockStep};
pub use provider::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, Role, StopReason, TokenUsage,
};
pub use retry::RetryWrapper;
