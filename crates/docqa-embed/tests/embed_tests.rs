use docqa_core::config::EmbeddingSettings;
use docqa_core::traits::Embedder;
use docqa_embed::{get_default_embedder, FakeEmbedder, FAKE_DIM};
use std::path::Path;

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    let settings = EmbeddingSettings { use_fake: true, ..EmbeddingSettings::default() };
    let embedder = get_default_embedder(&settings, Path::new(".")).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 2);
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), FAKE_DIM);
    assert_eq!(embedder.dim(), FAKE_DIM);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn fake_embedder_ignores_case_and_punctuation() {
    let embedder = FakeEmbedder::new(FAKE_DIM);
    let embs = embedder
        .embed_batch(&["What color is the sky?".to_string(), "what COLOR is the sky".to_string()])
        .expect("embed_batch");
    assert!((dot(&embs[0], &embs[1]) - 1.0).abs() < 1e-5);
}

#[test]
fn shared_words_score_higher_than_disjoint_text() {
    let embedder = FakeEmbedder::new(FAKE_DIM);
    let texts = vec![
        "apple pie".to_string(),
        "apple pie recipe".to_string(),
        "car engine repair".to_string(),
    ];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert!(dot(&embs[0], &embs[1]) > dot(&embs[0], &embs[2]));
}

#[test]
fn empty_batch_and_blank_text() {
    let embedder = FakeEmbedder::new(8);
    assert!(embedder.embed_batch(&[]).expect("empty batch").is_empty());

    let embs = embedder.embed_batch(&["   ".to_string()]).expect("blank text");
    assert_eq!(embs[0].len(), 8);
    assert!(embs[0].iter().all(|x| x.is_finite()));
}

#[test]
fn missing_model_dir_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = EmbeddingSettings { model_dir: "no-such-model".into(), use_fake: false, ..EmbeddingSettings::default() };
    if std::env::var("APP_USE_FAKE_EMBEDDINGS").is_ok() {
        return;
    }
    assert!(get_default_embedder(&settings, dir.path()).is_err());
}
