/// Prompts offered to operators before they type their own question.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What's causing the drop in OEE today?",
    "Which products have the highest profit margin?",
    "When should we order more raw materials?",
    "How can we reduce production costs?",
];

/// Shown in place of a reply while the assistant is thinking.
pub const PENDING_INDICATOR: &str = "Analyzing data...";

pub const INPUT_PLACEHOLDER: &str = "Ask about your manufacturing data...";

/// Shown when a question arrives while the previous one is still pending.
pub const BUSY_NOTICE: &str = "Still analyzing the previous question, please wait.";

/// Truncate turn content to a short single-line preview.
pub fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or(text);
    if first_line.chars().count() > 60 {
        let head: String = first_line.chars().take(57).collect();
        format!("{}...", head)
    } else {
        first_line.to_string()
    }
}
