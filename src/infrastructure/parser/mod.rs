//! Request parser implementations

mod openai;

pub use openai::OpenAiChatParser;
