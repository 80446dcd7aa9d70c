use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{Config as T5Config, T5ForConditionalGeneration};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use docqa_core::config::GenerationSettings;
use docqa_core::traits::Generator;
use docqa_embed::{device, weights};

/// Encoder input cap for flan-t5.
pub const MAX_INPUT_TOKENS: usize = 512;

#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f64,
    pub top_p: Option<f64>,
    pub seed: Option<u64>,
}

impl From<&GenerationSettings> for Sampling {
    fn from(s: &GenerationSettings) -> Self {
        Self { temperature: s.temperature, top_p: s.top_p, seed: s.seed }
    }
}

pub struct T5Generator {
    model: Mutex<T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    device: Device,
    use_cache: bool,
    start_token: u32,
    eos_token: u32,
    max_length: usize,
    sampling: Sampling,
}

impl T5Generator {
    pub fn new(model_dir: &Path, max_length: usize, sampling: Sampling) -> Result<Self> {
        let device = device::select_device();
        info!(dir = %model_dir.display(), "loading generation model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config: T5Config = weights::read_json_config(model_dir)?;
        let vb = weights::load_var_builder(model_dir, DType::F32, &device)?;
        let model = T5ForConditionalGeneration::load(vb, &config)?;

        let start_token = u32::try_from(config.decoder_start_token_id.unwrap_or(config.pad_token_id))?;
        let eos_token = u32::try_from(config.eos_token_id)?;
        info!(max_length, temperature = sampling.temperature, "generation model loaded");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            use_cache: config.use_cache,
            start_token,
            eos_token,
            max_length,
            sampling,
        })
    }

    fn logits_processor(&self) -> LogitsProcessor {
        let seed = self.sampling.seed.unwrap_or_else(rand::random);
        LogitsProcessor::new(seed, Some(self.sampling.temperature), self.sampling.top_p)
    }
}

impl Generator for T5Generator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let enc = self.tokenizer.encode(prompt, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut input_ids = enc.get_ids().to_vec();
        if input_ids.len() > MAX_INPUT_TOKENS {
            debug!(tokens = input_ids.len(), "truncating prompt");
            input_ids.truncate(MAX_INPUT_TOKENS - 1);
            input_ids.push(self.eos_token);
        }
        let input = Tensor::new(input_ids.as_slice(), &self.device)?.unsqueeze(0)?;

        let mut model = self.model.lock().map_err(|_| anyhow!("generation model lock poisoned"))?;
        model.clear_kv_cache();
        let encoder_output = model.encode(&input)?;

        let mut processor = self.logits_processor();
        let mut output = vec![self.start_token];
        for step in 0..self.max_length {
            let decoder_input = if step == 0 || !self.use_cache {
                Tensor::new(output.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output.last().copied().unwrap_or(self.start_token);
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };
            let logits = model.decode(&decoder_input, &encoder_output)?.squeeze(0)?;
            let next = processor.sample(&logits)?;
            if next == self.eos_token {
                break;
            }
            output.push(next);
        }
        model.clear_kv_cache();
        drop(model);

        let text = self
            .tokenizer
            .decode(&output[1..], true)
            .map_err(|e| anyhow!("Detokenization failed: {}", e))?;
        debug!(elapsed = ?start.elapsed(), tokens = output.len() - 1, "generated answer");
        Ok(text.trim().to_string())
    }
}
