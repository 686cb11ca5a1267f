//! Wire types for the OpenAI chat completion format.

use serde::{Deserialize, Serialize};

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// A chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// A chat completion response. Only the fields replypane reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatResponse {
    /// Text of the first choice, if it has any non-blank content.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: i32,

    pub message: ResponseMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice. `content` may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_flat() {
        let req = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            max_tokens: 800,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["max_tokens"], 800);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
    }

    #[test]
    fn first_text_skips_null_and_blank() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text(), None);

        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  \n"}}]}"#).unwrap();
        assert_eq!(resp.first_text(), None);

        let resp: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(resp.choices.is_empty());
        assert_eq!(resp.first_text(), None);
    }

    #[test]
    fn first_text_returns_content() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"id":"c1","model":"m","choices":[{"index":0,"message":{"role":"assistant","content":"Sure."},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text(), Some("Sure."));
    }
}
