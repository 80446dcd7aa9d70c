//! docqa-generate
//!
//! Answer generation: the prompt layout shared by every generator, a
//! flan-t5 generator on candle, and a deterministic fake for tests
//! (`generation.use_fake = true` or `APP_USE_FAKE_GENERATOR=1`).

use anyhow::Result;
use std::path::Path;
use tracing::info;

use docqa_core::config::{fake_generator_requested, GenerationSettings};
use docqa_core::traits::Generator;

pub mod fake;
pub mod prompt;
pub mod t5;

pub use fake::FakeGenerator;
pub use prompt::build_prompt;
pub use t5::{Sampling, T5Generator};

pub fn get_default_generator(settings: &GenerationSettings, base_dir: &Path) -> Result<Box<dyn Generator>> {
    if settings.use_fake || fake_generator_requested() {
        info!("using FakeGenerator");
        return Ok(Box::new(FakeGenerator::new(settings.max_length)));
    }
    let model_dir = docqa_embed::weights::resolve_model_dir(base_dir, &settings.model_dir)?;
    Ok(Box::new(T5Generator::new(&model_dir, settings.max_length, Sampling::from(settings))?))
}
