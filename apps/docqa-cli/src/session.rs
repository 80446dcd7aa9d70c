use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use docqa_core::types::Reply;
use docqa_rag::{RagEngine, LOAD_FAILURE_PREFIX};

use crate::history::ChatHistory;
use crate::upload::StagedUpload;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub name: String,
    pub size_bytes: u64,
    pub chunks: usize,
    pub load_time: Duration,
    pub uploaded_at: DateTime<Local>,
}

impl DocumentInfo {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Size: {:.1} KB", self.size_kb())?;
        writeln!(f, "Chunks: {}", self.chunks)?;
        writeln!(f, "Uploaded: {}", self.uploaded_at.format("%Y-%m-%d %H:%M:%S"))?;
        write!(f, "Load time: {:.2}s", self.load_time.as_secs_f64())
    }
}

/// One user's engine plus the conversation around it.
pub struct Session {
    engine: RagEngine,
    history: ChatHistory,
    document: Option<DocumentInfo>,
}

impl Session {
    pub fn new(engine: RagEngine) -> Self {
        Self { engine, history: ChatHistory::new(), document: None }
    }

    /// Load a document from disk. The error is the user-facing message.
    pub fn load_path(&mut self, path: &Path) -> Result<&DocumentInfo, String> {
        let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        self.load_from(path, name, size_bytes)
    }

    /// Load staged upload bytes; the staged file is removed before returning.
    pub fn load_upload(&mut self, upload: StagedUpload) -> Result<&DocumentInfo, String> {
        let name = upload.name().to_string();
        let size = upload.size();
        self.load_from(upload.path(), name, size)
    }

    fn load_from(&mut self, path: &Path, name: String, size_bytes: u64) -> Result<&DocumentInfo, String> {
        self.document = None;
        let uploaded_at = Local::now();
        let start = Instant::now();
        match self.engine.load_document(path) {
            Ok(chunks) => Ok(&*self.document.insert(DocumentInfo {
                name,
                size_bytes,
                chunks,
                load_time: start.elapsed(),
                uploaded_at,
            })),
            Err(e) => Err(format!("{LOAD_FAILURE_PREFIX}{e}")),
        }
    }

    /// Ask a question and record the turn.
    pub fn ask(&mut self, question: &str) -> Reply {
        let reply = self.engine.answer(question);
        self.history.push(question, reply.text.clone());
        reply
    }

    /// Forget the document and the conversation.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.history.clear();
        self.document = None;
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }

    pub fn document(&self) -> Option<&DocumentInfo> {
        self.document.as_ref()
    }

    pub fn engine(&self) -> &RagEngine {
        &self.engine
    }
}
