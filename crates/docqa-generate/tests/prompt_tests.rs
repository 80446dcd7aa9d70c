use docqa_core::config::GenerationSettings;
use docqa_generate::{build_prompt, get_default_generator, FakeGenerator};
use docqa_core::traits::Generator;
use std::path::Path;

#[test]
fn prompt_layout_is_exact() {
    let prompt = build_prompt(&["first chunk", "second chunk"], "What is it?");
    assert_eq!(prompt, "Context: first chunk second chunk\n\nQuestion: What is it?\nAnswer:");
}

#[test]
fn prompt_keeps_query_verbatim_and_handles_no_context() {
    let prompt = build_prompt::<&str>(&[], "  spaced  ");
    assert_eq!(prompt, "Context: \n\nQuestion:   spaced  \nAnswer:");
}

#[test]
fn fake_generator_echoes_bounded_context() {
    let generator = FakeGenerator::new(10);
    let prompt = build_prompt(&["The sky is blue."], "What color is the sky?");
    assert_eq!(generator.generate(&prompt).expect("generate"), "The sky is");
}

#[test]
fn fake_generator_selected_by_settings() {
    let settings = GenerationSettings { use_fake: true, ..GenerationSettings::default() };
    let generator = get_default_generator(&settings, Path::new(".")).expect("generator");
    let prompt = build_prompt(&["apple pie recipe"], "apple pie");
    assert_eq!(generator.generate(&prompt).expect("generate"), "apple pie recipe");
}
