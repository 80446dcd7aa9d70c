use std::path::Path;

pub trait TextExtractor: Send + Sync {
    /// Full plain text of the document at `path`, pages in order.
    fn extract(&self, path: &Path) -> crate::Result<String>;
}

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
