pub mod client;
pub mod error;
pub mod types;

pub use client::AnthropicClient;
pub use error::ModelError;
pub use types::{Message, MessagesRequest, MessagesResponse, Usage};

/// Client-agnostic completion request composed by the controller.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Rendered state instruction, sent as the system message.
    pub system: Option<String>,
    /// Transcript plus the current turn input, in order.
    pub messages: Vec<Message>,
    /// When set, the model must pick exactly one of these tokens instead of
    /// replying with free text.
    pub choices: Option<Vec<String>>,
}

/// What the model produced: free text or a structured choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    Choice(String),
}

/// A stateless request/response capability over a chat completion service.
///
/// Implementations decide how `choices` is enforced on the wire; the
/// contract is that a choice request comes back as `Completion::Choice`
/// whenever the endpoint produced well-formed structured output.
pub trait ModelClient: Send + Sync {
    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, ModelError>> + Send;
}
