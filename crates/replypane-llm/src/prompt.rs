//! Prompt construction shared by the real backends.

use replypane_types::{GenerationRequest, Tone};

/// Appended to every system prompt.
pub const SAME_LANGUAGE_RULE: &str = "Reply in the same language as the original email.";

/// Style instruction for a tone.
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => "Write in a professional, formal tone.",
        Tone::Informal => "Write in a casual, friendly tone.",
        Tone::Direct => "Write in a concise, direct and assertive tone. Get to the point.",
    }
}

/// The system message: role, tone policy, language rule.
pub fn system_prompt(tone: Tone) -> String {
    format!(
        "You draft replies to emails on behalf of the user. {} {} \
         Return only the reply body, without a subject line.",
        tone_instruction(tone),
        SAME_LANGUAGE_RULE
    )
}

/// The user message: the email context fields, then the user's intent.
pub fn user_prompt(request: &GenerationRequest) -> String {
    let ctx = &request.context;
    let attachments = if ctx.attachments.is_empty() {
        "none".to_owned()
    } else {
        ctx.attachments.join(", ")
    };
    let recipients = if ctx.recipients.is_empty() {
        "none".to_owned()
    } else {
        ctx.recipient_list()
    };

    let mut prompt = format!(
        "Write a reply to this email.\n\n\
         Subject: {}\n\
         From: {}\n\
         To: {}\n\
         Received: {}\n\
         Attachments: {}\n\n\
         {}",
        ctx.subject, ctx.sender, recipients, ctx.received_at, attachments, ctx.body
    );
    if let Some(intent) = &request.intent {
        prompt.push_str("\n\nWhat the reply should say: ");
        prompt.push_str(intent);
    }
    prompt
}
