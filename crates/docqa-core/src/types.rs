//! Domain types shared by the extractor, index and engine.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// A fixed-width fragment of the loaded document.
///
/// - `id`: `"{doc_id}:{chunk_index}"`, the key the vector index reports back
/// - `doc_id`: stable document identity (file stem)
/// - `doc_path`: path the document was loaded from
/// - `content`: the text payload of the chunk
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub doc_path: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl DocumentChunk {
    /// Build the ordered chunk list for one document from chunker output.
    pub fn from_pieces<S: AsRef<str>>(doc_id: &str, doc_path: &str, pieces: &[S]) -> Vec<Self> {
        let total_chunks = pieces.len();
        pieces
            .iter()
            .enumerate()
            .map(|(chunk_index, piece)| Self {
                id: format!("{doc_id}:{chunk_index}"),
                doc_id: doc_id.to_string(),
                doc_path: doc_path.to_string(),
                content: piece.as_ref().to_string(),
                chunk_index,
                total_chunks,
            })
            .collect()
    }
}

/// One nearest-neighbour result.
///
/// `position` is the 0-based slot the vector occupied when the index was
/// built, `id` the chunk recorded for that slot. `distance` is squared L2,
/// lower is closer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub position: usize,
    pub id: ChunkId,
    pub distance: f32,
}

/// What kind of text a query produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyKind {
    /// Generated from retrieved context.
    Answer,
    /// Instructional message, e.g. no document loaded yet.
    Info,
    /// A query-time failure rendered as text.
    Error,
}

/// The result of a question. Always displayable, never an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    pub fn answer(text: impl Into<String>) -> Self {
        Self { kind: ReplyKind::Answer, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: ReplyKind::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: ReplyKind::Error, text: text.into() }
    }

    pub fn is_answer(&self) -> bool {
        self.kind == ReplyKind::Answer
    }
}
