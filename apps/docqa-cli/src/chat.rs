//! Interactive chat input: `:`-prefixed commands, anything else is a question.

use std::path::PathBuf;

use chrono::Local;

use crate::history::ChatHistory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput<'a> {
    Quit,
    Help,
    Reset,
    Clear,
    /// Target file; defaults to a timestamped name when none is given.
    Export(PathBuf),
    Load(Option<&'a str>),
    Blank,
    /// The line exactly as typed.
    Question(&'a str),
}

pub fn parse_line(line: &str) -> ChatInput<'_> {
    let input = line.trim();
    let (cmd, arg) = input.split_once(' ').map_or((input, ""), |(cmd, arg)| (cmd, arg.trim()));
    match (cmd, arg) {
        (":quit" | ":q", _) => ChatInput::Quit,
        (":help", _) => ChatInput::Help,
        (":reset", _) => ChatInput::Reset,
        (":clear", _) => ChatInput::Clear,
        (":export", "") => ChatInput::Export(PathBuf::from(ChatHistory::export_file_name(Local::now()))),
        (":export", file) => ChatInput::Export(PathBuf::from(file)),
        (":load", "") => ChatInput::Load(None),
        (":load", file) => ChatInput::Load(Some(file)),
        ("", _) => ChatInput::Blank,
        _ => ChatInput::Question(line),
    }
}
