//! Server-side HTML rendering of chat turns.

use care_types::{ChatTurn, Speaker};

/// Escape text for safe insertion into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn icon(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "👤",
        Speaker::Assistant => "🏥",
    }
}

fn message_class(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "user-message",
        Speaker::Assistant => "assistant-message",
    }
}

/// One chat bubble. Line breaks in the message become `<br>`.
pub fn render_chat_message(turn: &ChatTurn) -> String {
    let body = escape_html(&turn.message).replace('\n', "<br>");
    format!(
        r#"<div class="chat-message {class}"><div class="icon">{icon}</div><div class="message-content"><b>{label}:</b><br>{body}</div></div>"#,
        class = message_class(turn.speaker),
        icon = icon(turn.speaker),
        label = turn.speaker.label(),
        body = body,
    )
}

pub fn render_transcript(turns: &[ChatTurn]) -> String {
    turns
        .iter()
        .map(render_chat_message)
        .collect::<Vec<_>>()
        .join("\n")
}
