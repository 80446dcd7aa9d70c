use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Local>,
}

/// Question/answer pairs in the order they were asked.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ChatTurn { question: question.into(), answer: answer.into(), timestamp: Local::now() });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// `Q: ...\nA: ...\n---` per turn, turns separated by a blank line.
    pub fn export(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("Q: {}\nA: {}\n---", t.question, t.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// `chat_history_YYYYmmdd_HHMMSS.txt` for the given moment.
    pub fn export_file_name(at: DateTime<Local>) -> String {
        format!("chat_history_{}.txt", at.format("%Y%m%d_%H%M%S"))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.export()).with_context(|| format!("Failed to write history to {}", path.display()))
    }
}
