//! docqa-embed
//!
//! Sentence embeddings for chunks and queries. The default model is a
//! BERT-family encoder (all-MiniLM-L6-v2) run through candle with masked mean
//! pooling; a hashing `FakeEmbedder` stands in for it in tests and offline
//! development (`embedding.use_fake = true` or `APP_USE_FAKE_EMBEDDINGS=1`).

use anyhow::{anyhow, Result};
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use docqa_core::config::{fake_embeddings_requested, EmbeddingSettings};
use docqa_core::traits::Embedder;

pub mod device;
pub mod pool;
pub mod tokenize;
pub mod weights;

pub use pool::masked_mean_l2;

pub const FAKE_DIM: usize = 384;
const PROBE_TEXT: &str = "dimension probe";

pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    pad_id: u32,
    max_len: usize,
    dim: usize,
}

impl MiniLmEmbedder {
    pub fn new(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let pad_id = tokenizer.get_padding().map_or(0, |p| p.pad_id);

        let config: BertConfig = weights::read_json_config(model_dir)?;
        let vb = weights::load_var_builder(model_dir, DType::F32, &device)?;
        let model = BertModel::load(vb, &config)?;

        let mut embedder = Self { model, tokenizer, device, pad_id, max_len, dim: 0 };
        embedder.dim = embedder
            .encode(&[PROBE_TEXT.to_string()])?
            .first()
            .map(Vec::len)
            .ok_or_else(|| anyhow!("probe encoding returned no vector"))?;
        info!(dim = embedder.dim, "embedding model loaded");
        Ok(embedder)
    }

    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize::tokenize_batch(&self.tokenizer, texts, self.max_len, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let vectors: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > 1000 {
            warn!(?elapsed, batch = texts.len(), "slow embedding batch");
        } else {
            debug!(?elapsed, batch = texts.len(), "embedded batch");
        }
        Ok(vectors)
    }
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.encode(texts)?;
        if vectors.len() != texts.len() {
            return Err(anyhow!("embedder returned {} vectors for {} inputs", vectors.len(), texts.len()));
        }
        Ok(vectors)
    }
}

/// Deterministic bag-of-words hashing embedder. Texts sharing words land
/// close together, which is enough to exercise retrieval without a model.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        let tokens = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|t| !t.is_empty());
        for token in tokens {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = usize::try_from(h % self.dim as u64).unwrap_or(0);
            let val = 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

/// Build the embedder described by `settings`, resolving the model directory
/// against `base_dir`.
pub fn get_default_embedder(settings: &EmbeddingSettings, base_dir: &Path) -> Result<Box<dyn Embedder>> {
    if settings.use_fake || fake_embeddings_requested() {
        info!(dim = FAKE_DIM, "using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(FAKE_DIM)));
    }
    let model_dir = weights::resolve_model_dir(base_dir, &settings.model_dir)?;
    Ok(Box::new(MiniLmEmbedder::new(&model_dir, settings.max_len)?))
}
