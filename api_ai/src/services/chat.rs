use common::error::{AppError, Res};

use crate::{
    dtos::chat::{ChatMessage, ChatRequest},
    services::gateway_client::GatewayClient,
};

pub const MAX_REPLY_WORDS: usize = 30;
pub const MAX_REPLY_CHARS: usize = 180;

const SYSTEM_PROMPT: &str = "You are the EcoFin assistant. EcoFin helps Indian small businesses \
turn GST invoices into verified carbon credits, track ESG scores and qualify for green loans. \
Answer only questions about these topics. Keep every answer under 30 words and under 180 \
characters. Write plain sentences: never use exclamation marks, markdown, bold, italics or lists.";

/// Display name of a language code; unknown values are used verbatim.
pub fn language_name(code: Option<&str>) -> &str {
    match code.map(str::trim) {
        None | Some("") | Some("en") => "English",
        Some("hi") => "Hindi",
        Some("bn") => "Bengali",
        Some("ta") => "Tamil",
        Some("te") => "Telugu",
        Some("mr") => "Marathi",
        Some("gu") => "Gujarati",
        Some("kn") => "Kannada",
        Some(other) => other,
    }
}

pub fn build_messages(req: &ChatRequest) -> Vec<ChatMessage> {
    let mut system = format!(
        "{} Reply in {}.",
        SYSTEM_PROMPT,
        language_name(req.language.as_deref())
    );
    if let Some(context) = req.context.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        system.push_str("\n\nContext about the user:\n");
        system.push_str(context);
    }

    vec![
        ChatMessage {
            role: "system".to_string(),
            content: system,
        },
        ChatMessage {
            role: "user".to_string(),
            content: req.query.trim().to_string(),
        },
    ]
}

/// Forces a model reply into the chat widget's limits: no emphasis
/// markers or exclamation marks, at most 30 words and 180 characters.
pub fn tidy_reply(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .map(|c| if c == '!' { '.' } else { c })
        .collect();

    let mut text = cleaned
        .split_whitespace()
        .take(MAX_REPLY_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    while text.contains("..") {
        text = text.replace("..", ".");
    }

    if text.chars().count() > MAX_REPLY_CHARS {
        let cut: String = text.chars().take(MAX_REPLY_CHARS).collect();
        let cut = match cut.rfind(' ') {
            Some(idx) if idx > 0 => cut[..idx].to_string(),
            _ => cut,
        };
        text = cut
            .trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '-') || c.is_whitespace())
            .to_string();
    }
    text
}

pub async fn answer(client: &GatewayClient, req: &ChatRequest) -> Res<String> {
    if req.query.trim().is_empty() {
        return Err(AppError::BadRequest("Query is required".to_string()));
    }
    let raw = client.complete(build_messages(req)).await?;
    Ok(tidy_reply(&raw))
}
