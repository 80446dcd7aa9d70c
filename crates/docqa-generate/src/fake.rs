use anyhow::Result;

use docqa_core::traits::Generator;

use crate::prompt::context_of;

/// Echoes the start of the prompt's context, at most `max_length` chars.
/// Deterministic; used in tests and when no model is available.
pub struct FakeGenerator {
    max_length: usize,
}

impl FakeGenerator {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Generator for FakeGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let source = context_of(prompt).unwrap_or(prompt);
        let answer: String = source.chars().take(self.max_length).collect();
        Ok(answer.trim().to_string())
    }
}
