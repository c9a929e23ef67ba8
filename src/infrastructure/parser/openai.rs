//! OpenAI chat-completion request parser

use serde::Deserialize;

use crate::domain::{Context, DomainError, RequestParser};

/// Only the fields the cache key is built from; everything else is ignored
#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    messages: Vec<ChatMessageBody>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageBody {
    #[serde(default)]
    content: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl MessageContent {
    fn into_text(self) -> String {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Parser for OpenAI-style `{"messages": [{"role": ..., "content": ...}]}` bodies
///
/// Keeps each message's content in order and drops roles, names, tool calls
/// and every top-level parameter. Structured content keeps its text parts
/// only; a message without content contributes an empty string so positions
/// are preserved.
#[derive(Debug, Clone, Default)]
pub struct OpenAiChatParser;

impl OpenAiChatParser {
    pub fn new() -> Self {
        Self
    }
}

impl RequestParser for OpenAiChatParser {
    fn parse(&self, body: &[u8]) -> Result<Context, DomainError> {
        let request: ChatCompletionBody = serde_json::from_slice(body)
            .map_err(|e| DomainError::parse(format!("Invalid chat completion body: {}", e)))?;

        Ok(request
            .messages
            .into_iter()
            .map(|message| message.content.map(MessageContent::into_text).unwrap_or_default())
            .collect())
    }
}
