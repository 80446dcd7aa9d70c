//! Locating model directories and loading their weights into a `VarBuilder`.

use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use docqa_core::config::resolve_with_base;

/// Find the model directory for a configured path.
///
/// Tries the path resolved against `base`, then the same path one level up
/// (workspace-root layout when running from a crate directory).
pub fn resolve_model_dir(base: &Path, configured: &str) -> Result<PathBuf> {
    let primary = resolve_with_base(base, configured);
    if primary.exists() {
        info!(dir = %primary.display(), "using model dir");
        return Ok(primary);
    }
    let parent = resolve_with_base(base, format!("../{configured}"));
    if parent.exists() {
        info!(dir = %parent.display(), "using parent model dir");
        return Ok(parent);
    }
    Err(anyhow!(
        "Could not locate model directory. Checked {} and {}",
        primary.display(),
        parent.display()
    ))
}

/// Prefer `model.safetensors`, fall back to `pytorch_model.bin`.
pub fn load_var_builder(model_dir: &Path, dtype: DType, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // SAFETY: the weights file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], dtype, device)? };
        return Ok(vb);
    }
    let pickle = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights: HashMap<String, Tensor> = candle_core::pickle::read_all(&pickle)?.into_iter().collect();
        return Ok(VarBuilder::from_tensors(weights, dtype, device));
    }
    Err(anyhow!("No model.safetensors or pytorch_model.bin in {}", model_dir.display()))
}

pub fn read_json_config<T: serde::de::DeserializeOwned>(model_dir: &Path) -> Result<T> {
    let path = model_dir.join("config.json");
    let raw = std::fs::read_to_string(&path).map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&raw)?)
}
