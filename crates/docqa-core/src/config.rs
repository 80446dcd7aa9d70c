//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys use `__`, e.g. `APP_RETRIEVAL__TOP_K=5`). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against a known base
//! directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    env_name: String,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let base_dir = env::current_dir()?;
        let config = Self { figment, env_name, base_dir };
        config.validate_for_env()?;
        Ok(config)
    }

    /// Wrap an already assembled figment, e.g. one built in a test.
    pub fn from_figment(figment: Figment, base_dir: impl Into<PathBuf>) -> Self {
        Self { figment, env_name: "dev".to_string(), base_dir: base_dir.into() }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The typed, validated view of the whole configuration.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path against the directory the config was loaded from.
    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }

    fn validate_for_env(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        match self.env_name.as_str() {
            "prod" | "production" => {
                if settings.embedding.use_fake
                    || settings.generation.use_fake
                    || fake_embeddings_requested()
                    || fake_generator_requested()
                {
                    anyhow::bail!("fake models are not allowed in production");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            other => tracing::warn!(env = other, "unknown RUST_ENV, using base config only"),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk width in characters.
    pub width: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { width: 300 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: String,
    /// Token budget per input; longer inputs are truncated.
    pub max_len: usize,
    pub use_fake: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: "models/all-MiniLM-L6-v2".to_string(), max_len: 256, use_fake: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model_dir: String,
    /// Upper bound on generated tokens.
    pub max_length: usize,
    pub temperature: f64,
    pub top_p: Option<f64>,
    /// Fixed sampling seed; random per generator when unset.
    pub seed: Option<u64>,
    pub use_fake: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model_dir: "models/flan-t5-small".to_string(),
            max_length: 100,
            temperature: 1.0,
            top_p: None,
            seed: None,
            use_fake: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.chunking.width == 0 {
            return Err(Error::InvalidConfig("chunking.width must be at least 1".into()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".into()));
        }
        if self.embedding.max_len == 0 {
            return Err(Error::InvalidConfig("embedding.max_len must be at least 1".into()));
        }
        if self.generation.max_length == 0 {
            return Err(Error::InvalidConfig("generation.max_length must be at least 1".into()));
        }
        if !(self.generation.temperature > 0.0) {
            return Err(Error::InvalidConfig("generation.temperature must be positive".into()));
        }
        if let Some(p) = self.generation.top_p {
            if !(p > 0.0 && p <= 1.0) {
                return Err(Error::InvalidConfig("generation.top_p must be in (0, 1]".into()));
            }
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// `APP_USE_FAKE_EMBEDDINGS=1` swaps in the hashing embedder regardless of config.
pub fn fake_embeddings_requested() -> bool {
    env_flag("APP_USE_FAKE_EMBEDDINGS")
}

/// `APP_USE_FAKE_GENERATOR=1` swaps in the echo generator regardless of config.
pub fn fake_generator_requested() -> bool {
    env_flag("APP_USE_FAKE_GENERATOR")
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
