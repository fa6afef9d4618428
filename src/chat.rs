//! Chat-style tutoring variant: conversational prompts over session history.

use crate::session::Turn;

pub const CHAT_SYSTEM_PROMPT: &str = r#"
You are a study assistant helping students prepare for AP exams. Answer
questions clearly and concisely. When a student asks about a graded
response, explain which rubric criteria were met or missed. Do not invent
rubric criteria or scores.
"#;

/// Build a conversational prompt from bounded session history plus the
/// new message. History turns are rendered as "Student:"/"Assistant:"
/// lines so the model continues the exchange.
pub fn build_chat_prompt(history: &[Turn], message: &str) -> String {
    let mut prompt = String::new();
    for turn in history {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
    }
    prompt.push_str(&format!("Student: {message}\nAssistant:"));
    prompt
}
