//! Offline backend producing templated replies.

use async_trait::async_trait;
use replypane_types::{GenerationRequest, Tone};
use tracing::debug;

use crate::backend::ReplyBackend;
use crate::error::Result;

/// Deterministic in (tone, subject, intent). Never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(tone: Tone, subject: &str, intent: Option<&str>) -> String {
        let intent_line = |lead: &str| {
            intent
                .map(|i| format!("{lead}{}\n\n", i.trim_end_matches('.')))
                .unwrap_or_default()
        };
        match tone {
            Tone::Formal => format!(
                "Thank you for your email regarding {subject}.\n\n\
                 {}I have reviewed your message and will follow up with the \
                 requested information shortly.\n\nBest regards",
                intent_line("Regarding next steps: ")
            ),
            Tone::Informal => format!(
                "Hi,\n\nThanks for your note about {subject}!\n\n\
                 {}I'll get back to you soon.\n\nCheers",
                intent_line("Quick thought: ")
            ),
            Tone::Direct => format!(
                "Re: {subject}.\n\n{}I will respond in full shortly.\n\nRegards",
                intent_line("Decision: ")
            ),
        }
    }
}

#[async_trait]
impl ReplyBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        debug!(tone = %request.tone, "mock backend generating reply");
        Ok(Self::reply(
            request.tone,
            &request.context.subject,
            request.intent.as_deref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formal_opening() {
        let reply = MockBackend::reply(Tone::Formal, "Test Subject: Project Discussion", None);
        assert!(reply.starts_with(
            "Thank you for your email regarding Test Subject: Project Discussion."
        ));
    }

    #[test]
    fn deterministic() {
        for tone in Tone::ALL {
            assert_eq!(
                MockBackend::reply(tone, "S", Some("decline")),
                MockBackend::reply(tone, "S", Some("decline"))
            );
        }
    }

    #[test]
    fn inputs_change_output() {
        let base = MockBackend::reply(Tone::Formal, "S", None);
        assert_ne!(base, MockBackend::reply(Tone::Informal, "S", None));
        assert_ne!(base, MockBackend::reply(Tone::Formal, "T", None));
        assert_ne!(base, MockBackend::reply(Tone::Formal, "S", Some("decline politely")));
        assert!(MockBackend::reply(Tone::Direct, "S", Some("no.")).contains("Decision: no\n"));
    }
}
