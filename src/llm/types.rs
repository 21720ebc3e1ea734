//! Common types for LLM interactions

/// LLM request
#[derive(Debug, Clone, Default)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Message in conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub text: String,
}

impl LlmMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Text parts of the first candidate, in order
    pub parts: Vec<String>,
    pub end_turn: bool,
    pub usage: Usage,
}

impl LlmResponse {
    /// Get text content from the response
    pub fn text(&self) -> String {
        self.parts.concat()
    }

    /// True when the response carries no visible text
    pub fn is_blank(&self) -> bool {
        self.parts.iter().all(|p| p.trim().is_empty())
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_concatenates_parts() {
        let response = LlmResponse {
            parts: vec!["Hello, ".to_string(), "world".to_string()],
            end_turn: true,
            usage: Usage::default(),
        };
        assert_eq!(response.text(), "Hello, world");
        assert!(!response.is_blank());
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        let response = LlmResponse {
            parts: vec!["  ".to_string(), "\n".to_string()],
            end_turn: true,
            usage: Usage::default(),
        };
        assert!(response.is_blank());
    }
}
