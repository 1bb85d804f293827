//! Tests for configuration loading and the dataset repository factory.

mod support;

use std::path::PathBuf;

use blockscope::config::{AppConfig, ConfigError};
use blockscope::db::RepositoryFactory;

#[test]
fn test_from_file_reads_all_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blockscope.toml");
    std::fs::write(
        &path,
        r#"
[server]
host = "127.0.0.1"
port = 9000

[data]
dir = "fixtures"

[llm]
model = "gpt-4o-mini"
timeout_secs = 5
"#,
    )
    .unwrap();

    let config = AppConfig::from_file(&path).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:9000");
    assert_eq!(config.data.dir, PathBuf::from("fixtures"));
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.timeout_secs, 5);
    assert!(config.llm.api_key.is_none());
}

#[test]
fn test_from_file_missing_is_read_error() {
    let result = AppConfig::from_file("/definitely/not/here/blockscope.toml");
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_env_overrides_file_values() {
    support::with_scoped_env(
        &[
            ("PORT", Some("7070")),
            ("DATA_DIR", Some("/srv/blocks")),
            ("BLOCK_SUMMARY_PATH", None),
            ("OPENAI_API_KEY", Some("sk-test")),
            ("OPENAI_MODEL", None),
            ("LLM_TIMEOUT_SECS", Some("12")),
        ],
        || {
            let mut config = AppConfig::default();
            config.apply_env().unwrap();
            assert_eq!(config.server.port, 7070);
            assert_eq!(
                config.data.block_summary_path(),
                PathBuf::from("/srv/blocks/block_summary.json")
            );
            assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.llm.model, "gpt-3.5-turbo");
            assert_eq!(config.llm.timeout_secs, 12);
        },
    );
}

#[test]
fn test_invalid_env_value_is_rejected() {
    support::with_scoped_env(&[("PORT", Some("not-a-port"))], || {
        let mut config = AppConfig::default();
        let err = config.apply_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    });
}

#[tokio::test]
async fn test_factory_loads_configured_paths() {
    let dir = tempfile::tempdir().unwrap();
    let samples = dir.path().join("samples.json");
    std::fs::write(
        &samples,
        r#"[{"site":"rust","question_title":"Why borrow?","blocks":[{"type":"Claim","text":"Because."}]}]"#,
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.data.dir = dir.path().to_path_buf();
    config.data.answer_samples_path = Some(samples);

    let repo = RepositoryFactory::from_config(&config);
    assert_eq!(repo.samples().await.unwrap().len(), 1);

    let status = repo.dataset_status().await.unwrap();
    assert!(!status[0].loaded);
    assert!(status[0].error.is_some());
    assert!(status[1].loaded);
}
