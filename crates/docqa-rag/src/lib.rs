//! docqa-rag
//!
//! The retrieval-augmented engine. Owns the chunks and vector index of at most
//! one document and moves between two states:
//!
//! - `Empty`: nothing loaded; queries get an instructional reply
//! - `Loaded`: chunks plus an index built over their embeddings
//!
//! Loading always starts from `Empty`, so a failed load never leaves a
//! previous document answerable.

use anyhow::anyhow;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use docqa_core::chunker::chunk_text;
use docqa_core::config::Settings;
use docqa_core::traits::{Embedder, Generator, TextExtractor};
use docqa_core::types::{DocumentChunk, Reply};
use docqa_core::{Error, Result};
use docqa_extract::PdfExtractor;
use docqa_generate::build_prompt;
use docqa_vector::FlatL2Index;

pub const NO_DOCUMENT_MESSAGE: &str = "Please upload a document first.";
pub const LOAD_FAILURE_PREFIX: &str = "Failed to load document: ";
const ANSWER_FAILURE_PREFIX: &str = "Error generating answer: ";

enum EngineState {
    Empty,
    Loaded { chunks: Vec<DocumentChunk>, index: FlatL2Index },
}

pub struct RagEngine {
    extractor: Box<dyn TextExtractor>,
    embedder: Box<dyn Embedder>,
    generator: Box<dyn Generator>,
    width: usize,
    top_k: usize,
    state: EngineState,
}

impl RagEngine {
    /// Engine reading PDFs with [`PdfExtractor`].
    pub fn new(embedder: Box<dyn Embedder>, generator: Box<dyn Generator>, settings: &Settings) -> Self {
        Self::with_extractor(Box::new(PdfExtractor::new()), embedder, generator, settings)
    }

    pub fn with_extractor(
        extractor: Box<dyn TextExtractor>,
        embedder: Box<dyn Embedder>,
        generator: Box<dyn Generator>,
        settings: &Settings,
    ) -> Self {
        Self {
            extractor,
            embedder,
            generator,
            width: settings.chunking.width,
            top_k: settings.retrieval.top_k,
            state: EngineState::Empty,
        }
    }

    /// Extract, chunk, embed and index the document at `path`, replacing
    /// whatever was loaded before. Returns the number of chunks.
    pub fn load_document(&mut self, path: &Path) -> Result<usize> {
        self.state = EngineState::Empty;
        let start = Instant::now();

        let text = self.extractor.extract(path)?;
        if text.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        let pieces = chunk_text(&text, self.width);
        if pieces.is_empty() {
            return Err(Error::EmptyChunkSet);
        }
        let doc_id = path.file_stem().map_or_else(|| "document".to_string(), |s| s.to_string_lossy().into_owned());
        let chunks = DocumentChunk::from_pieces(&doc_id, &path.to_string_lossy(), &pieces);
        debug!(doc_id = %doc_id, chunks = chunks.len(), width = self.width, "chunked document");

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_batch(&contents).map_err(|e| Error::Embedding(e.to_string()))?;
        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!("expected {} vectors, got {}", chunks.len(), vectors.len())));
        }

        let index = FlatL2Index::build(chunks.iter().map(|c| c.id.clone()).zip(vectors).collect())?;
        let count = chunks.len();
        info!(path = %path.display(), chunks = count, dim = index.dim(), elapsed = ?start.elapsed(), "document loaded");
        self.state = EngineState::Loaded { chunks, index };
        Ok(count)
    }

    /// Answer `query` from the loaded document. Never fails: the absence of a
    /// document and any pipeline error come back as non-answer replies.
    pub fn answer(&self, query: &str) -> Reply {
        let EngineState::Loaded { chunks, index } = &self.state else {
            return Reply::info(NO_DOCUMENT_MESSAGE);
        };
        match self.generate_answer(chunks, index, query) {
            Ok(text) => Reply::answer(text),
            Err(e) => {
                warn!(error = %e, "query failed");
                Reply::error(format!("{ANSWER_FAILURE_PREFIX}{e:#}"))
            }
        }
    }

    pub fn retrieve_and_answer(&self, question: &str) -> String {
        self.answer(question).text
    }

    fn generate_answer(&self, chunks: &[DocumentChunk], index: &FlatL2Index, query: &str) -> anyhow::Result<String> {
        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("embedder returned no vector for the query"))?;
        let hits = index.search(&query_vec, self.top_k)?;

        let mut context = Vec::with_capacity(hits.len());
        for hit in &hits {
            let chunk = chunks
                .get(hit.position)
                .filter(|c| c.id == hit.id)
                .ok_or_else(|| anyhow!("index returned unknown chunk {} at position {}", hit.id, hit.position))?;
            context.push(chunk.content.as_str());
        }
        debug!(hits = hits.len(), "retrieved context");

        let prompt = build_prompt(&context, query);
        self.generator.generate(&prompt)
    }

    pub fn reset(&mut self) {
        self.state = EngineState::Empty;
        debug!("engine reset");
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, EngineState::Loaded { .. })
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        match &self.state {
            EngineState::Loaded { chunks, .. } => chunks,
            EngineState::Empty => &[],
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks().len()
    }

    /// Number of vectors in the current index, 0 when empty.
    pub fn index_len(&self) -> usize {
        match &self.state {
            EngineState::Loaded { index, .. } => index.len(),
            EngineState::Empty => 0,
        }
    }
}
