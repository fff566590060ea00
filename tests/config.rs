use pdfsum::cli::Args;
use pdfsum::config::{
    expand_env_var_in_string, init_config_files, normalize_endpoint, validate_api_key, Config,
    JsonConfig, API_KEY_PLACEHOLDER, DEFAULT_SYSTEM_PROMPT,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_normalize_endpoint() {
    assert_eq!(
        normalize_endpoint("http://localhost:11434/v1"),
        "http://localhost:11434/v1/chat/completions"
    );
    assert_eq!(
        normalize_endpoint("http://localhost:11434/v1/"),
        "http://localhost:11434/v1/chat/completions"
    );
    assert_eq!(
        normalize_endpoint("https://api.example.com/"),
        "https://api.example.com/v1/chat/completions"
    );
    assert_eq!(
        normalize_endpoint("https://api.openai.com/v1/chat/completions"),
        "https://api.openai.com/v1/chat/completions"
    );
}

#[test]
fn test_placeholder_api_key_is_rejected() {
    assert!(validate_api_key(API_KEY_PLACEHOLDER).is_err());
    assert!(validate_api_key("   ").is_err());
    assert!(validate_api_key("${PDFSUM_TEST_UNSET_KEY}").is_err());
    assert!(validate_api_key("sk-test").is_ok());
}

#[test]
fn test_expand_env_var() {
    std::env::set_var("PDFSUM_TEST_EXPAND", "sk-expanded");
    assert_eq!(expand_env_var_in_string("${PDFSUM_TEST_EXPAND}"), "sk-expanded");
    assert_eq!(
        expand_env_var_in_string("${PDFSUM_TEST_DEFINITELY_UNSET}"),
        "${PDFSUM_TEST_DEFINITELY_UNSET}"
    );
}

#[test]
fn test_init_config_files_writes_once() {
    let temp_dir = TempDir::new().unwrap();

    let created = init_config_files(temp_dir.path()).unwrap();
    assert_eq!(created.len(), 2);

    let prompt = fs::read_to_string(temp_dir.path().join("system_prompt.txt")).unwrap();
    assert_eq!(prompt, DEFAULT_SYSTEM_PROMPT);

    let config = JsonConfig::load_from(&temp_dir.path().join(".pdfsum.yaml")).unwrap();
    assert_eq!(config.api.api_key.as_deref(), Some(API_KEY_PLACEHOLDER));
    assert_eq!(config.model.default_model.as_deref(), Some("gpt-3.5-turbo"));
    assert!(config.output.stream);

    assert!(init_config_files(temp_dir.path()).unwrap().is_empty());
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pdfsum.json");
    fs::write(
        &path,
        r#"{"model": {"default_model": "gpt-4o"}, "output": {"stream": false}}"#,
    )
    .unwrap();

    let config = JsonConfig::load_from(&path).unwrap();
    assert_eq!(config.model.default_model.as_deref(), Some("gpt-4o"));
    assert!(!config.output.stream);
    assert_eq!(config.conversations_dir(), PathBuf::from("conversations"));
}

#[test]
fn test_invalid_config_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.yaml");
    fs::write(&path, "api: [unclosed").unwrap();

    let err = JsonConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.yaml"));
}

#[test]
fn test_malformed_config_is_not_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let broken = temp_dir.path().join(".pdfsum.yaml");
    let fallback = temp_dir.path().join(".pdfsum.json");
    fs::write(&broken, "storage: [unclosed").unwrap();
    fs::write(&fallback, r#"{"storage": {"conversations_dir": "other"}}"#).unwrap();

    let err = JsonConfig::load_first(&[broken, fallback]).unwrap_err();
    assert!(format!("{:#}", err).contains(".pdfsum.yaml"));
}

#[test]
fn test_load_first_defaults_when_nothing_exists() {
    let temp_dir = TempDir::new().unwrap();

    let config = JsonConfig::load_first(&[temp_dir.path().join("missing.yaml")]).unwrap();
    assert_eq!(config.conversations_dir(), PathBuf::from("conversations"));
}

#[test]
fn test_resolve_layers_args_over_file() {
    std::env::set_var("OPENAI_API_KEY", "sk-test");

    let mut json_config = JsonConfig::default();
    json_config.model.default_model = Some("from-file".to_string());
    json_config.model.system_prompt = Some("file prompt".to_string());
    json_config.storage.conversations_dir = Some("convs".to_string());
    json_config.output.path = Some("file-output.txt".to_string());

    let args = Args {
        output: Some("cli-output.txt".to_string()),
        api_endpoint: Some("http://localhost:8080/v1".to_string()),
        no_stream: true,
        ..Default::default()
    };

    let config = Config::resolve(&args, json_config).unwrap();
    assert_eq!(config.api_key, "sk-test");
    assert_eq!(config.api_endpoint, "http://localhost:8080/v1/chat/completions");
    assert_eq!(config.system_prompt, "file prompt");
    assert_eq!(config.conversations_dir, PathBuf::from("convs"));
    assert_eq!(config.output_path, PathBuf::from("cli-output.txt"));
    assert!(!config.stream);
    if std::env::var("PDFSUM_MODEL").is_err() {
        assert_eq!(config.model, "from-file");
    }
}
