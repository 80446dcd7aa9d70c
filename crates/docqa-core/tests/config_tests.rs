use docqa_core::config::{resolve_with_base, Config, Settings};
use docqa_core::Error;
use figment::Jail;
use std::path::Path;

#[test]
fn defaults_apply_without_any_files() {
    Jail::expect_with(|_jail| {
        let config = Config::load().expect("load");
        let settings = config.settings().expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.chunking.width, 300);
        assert_eq!(settings.retrieval.top_k, 3);
        assert_eq!(settings.generation.max_length, 100);
        Ok(())
    });
}

#[test]
fn env_file_and_app_vars_layer_over_base() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [chunking]
            width = 120

            [retrieval]
            top_k = 4
            "#,
        )?;
        jail.create_file(
            "config.test.toml",
            r#"
            [embedding]
            use_fake = true
            "#,
        )?;
        jail.set_env("RUST_ENV", "test");
        jail.set_env("APP_RETRIEVAL__TOP_K", "5");

        let config = Config::load().expect("load");
        let settings = config.settings().expect("settings");
        assert_eq!(settings.chunking.width, 120);
        assert_eq!(settings.retrieval.top_k, 5, "env overrides file");
        assert!(settings.embedding.use_fake);
        assert_eq!(config.get::<usize>("chunking.width").expect("key"), 120);
        Ok(())
    });
}

#[test]
fn zero_width_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[chunking]\nwidth = 0\n")?;
        assert!(Config::load().is_err());
        Ok(())
    });

    let mut settings = Settings::default();
    settings.chunking.width = 0;
    assert!(matches!(settings.validate(), Err(Error::InvalidConfig(_))));
}

#[test]
fn production_refuses_fake_models() {
    Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "prod");
        jail.set_env("APP_GENERATION__USE_FAKE", "true");
        assert!(Config::load().is_err());
        Ok(())
    });
}

#[test]
fn production_refuses_fake_model_env_switches() {
    for var in ["APP_USE_FAKE_EMBEDDINGS", "APP_USE_FAKE_GENERATOR"] {
        Jail::expect_with(|jail| {
            jail.set_env("RUST_ENV", "prod");
            jail.set_env(var, "1");
            assert!(Config::load().is_err(), "{var} must be refused in prod");
            Ok(())
        });
    }
}

#[test]
fn fake_model_env_switches_allowed_outside_production() {
    Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "test");
        jail.set_env("APP_USE_FAKE_EMBEDDINGS", "true");
        assert!(docqa_core::config::fake_embeddings_requested());
        assert!(Config::load().is_ok());
        Ok(())
    });
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = Path::new("/srv/docqa");
    assert_eq!(resolve_with_base(base, "models/x"), base.join("models/x"));
    assert_eq!(resolve_with_base(base, "/abs/models"), Path::new("/abs/models"));
}
