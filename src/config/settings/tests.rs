use super::*;
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.ollama.protocol, "http");
    assert_eq!(config.ollama.host, "localhost");
    assert_eq!(config.ollama.port, 11434);
    assert_eq!(config.ollama.model, "all-minilm");
    assert_eq!(config.ollama.embedding_dimension, 384);
    assert_eq!(config.index.backend, IndexBackend::Qdrant);
    assert_eq!(config.index.port, 6333);
    assert_eq!(config.index.collection, "faq_collection");
    assert_eq!(config.index.distance, Distance::Cosine);
    assert_eq!(config.faq.source, FaqSourceKind::Inline);
    assert_eq!(config.faq.id_strategy, IdStrategy::Sequential);
    assert_eq!(config.faq.min_score, None);
}

#[test]
fn config_validation() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    let mut invalid_config = config.clone();
    invalid_config.ollama.protocol = "ftp".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.port = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.model = String::new();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.ollama.batch_size = 1001;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.index.collection = "  ".to_string();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidCollection(_))
    ));

    let mut invalid_config = config.clone();
    invalid_config.server.bind = "not an address".to_string();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidBindAddress(_))
    ));

    let mut invalid_config = config;
    invalid_config.faq.min_score = Some(1.5);
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidMinScore(_))
    ));
}

#[test]
fn memory_backend_skips_connection_checks() {
    let mut config = Config::default();
    config.index.backend = IndexBackend::Memory;
    config.index.port = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn url_generation() {
    let config = Config::default();
    let url = config
        .ollama_url()
        .expect("should generate ollama_url successfully");
    assert_eq!(url.as_str(), "http://localhost:11434/");

    let url = config
        .qdrant_url()
        .expect("should generate qdrant_url successfully");
    assert_eq!(url.as_str(), "http://localhost:6333/");
}

#[test]
fn toml_serialization() {
    let mut config = Config::default();
    config.index.api_key = Some("secret".to_string());
    config.faq.min_score = Some(0.5);
    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    let parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    assert_eq!(config, parsed_config);
}

#[test]
fn partial_toml_uses_defaults() {
    let toml_str = r#"
        [ollama]
        host = "embedder"

        [index]
        backend = "memory"
        distance = "dot"

        [faq]
        source = "file"
        id_strategy = "content_hash"
    "#;
    let config: Config = toml::from_str(toml_str).expect("should parse toml correctly");

    assert_eq!(config.ollama.host, "embedder");
    assert_eq!(config.ollama.port, 11434);
    assert_eq!(config.index.backend, IndexBackend::Memory);
    assert_eq!(config.index.distance, Distance::Dot);
    assert_eq!(config.index.collection, "faq_collection");
    assert_eq!(config.faq.source, FaqSourceKind::File);
    assert_eq!(config.faq.id_strategy, IdStrategy::ContentHash);
    assert_eq!(config.server.bind, "127.0.0.1:8000");
}

#[test]
fn setter_validation() {
    let mut config = OllamaConfig::default();

    assert!(config.set_protocol("https".to_string()).is_ok());
    assert!(config.set_host("example.com".to_string()).is_ok());
    assert!(config.set_port(8080).is_ok());
    assert!(config.set_model("new-model".to_string()).is_ok());
    assert!(config.set_batch_size(128).is_ok());
    assert!(config.set_embedding_dimension(768).is_ok());

    assert!(config.set_protocol("ftp".to_string()).is_err());
    assert!(config.set_protocol("HTTP".to_string()).is_err());
    assert!(config.set_port(0).is_err());
    assert!(config.set_model(String::new()).is_err());
    assert!(config.set_batch_size(0).is_err());
    assert!(config.set_embedding_dimension(0).is_err());

    let mut index = IndexConfig::default();
    assert!(index.set_collection("other".to_string()).is_ok());
    assert!(index.set_collection(String::new()).is_err());
    assert!(index.set_port(0).is_err());

    let mut server = ServerConfig::default();
    assert!(server.set_bind("0.0.0.0:9000".to_string()).is_ok());
    assert!(server.set_bind("localhost".to_string()).is_err());
    assert_eq!(server.bind, "0.0.0.0:9000");
}

#[test]
fn load_missing_config_returns_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let config = Config::load(temp_dir.path()).expect("should load defaults");
    assert_eq!(config.base_dir, temp_dir.path());
    assert_eq!(config.ollama, OllamaConfig::default());
    assert_eq!(config.index, IndexConfig::default());
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let mut config = Config {
        base_dir: temp_dir.path().join("nested"),
        ..Config::default()
    };
    config.index.collection = "support_faq".to_string();
    config.faq.source = FaqSourceKind::File;
    config.save().expect("should save config");

    let loaded = Config::load(temp_dir.path().join("nested")).expect("should load config");
    assert_eq!(config, loaded);
}

#[test]
fn load_rejects_invalid_values() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    fs::write(
        temp_dir.path().join("config.toml"),
        "[ollama]\nbatch_size = 0\n",
    )
    .expect("should write config");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn load_faq_only_config_uses_default_sections() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    fs::write(
        temp_dir.path().join("config.toml"),
        "[faq]\nsource = \"file\"\n",
    )
    .expect("should write config");

    let config = Config::load(temp_dir.path()).expect("should load config without [ollama]");
    assert_eq!(config.faq.source, FaqSourceKind::File);
    assert_eq!(config.ollama, OllamaConfig::default());
    assert_eq!(config.index, IndexConfig::default());
    assert_eq!(config.server, ServerConfig::default());
    assert!(matches!(config.faq_source(), FaqSource::File(_)));
}

#[test]
fn faq_file_path_resolution() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut config = Config {
        base_dir: temp_dir.path().to_path_buf(),
        ..Config::default()
    };
    assert_eq!(config.faq_file_path(), temp_dir.path().join("faq_data.json"));

    let absolute = temp_dir.path().join("elsewhere").join("faqs.json");
    config.faq.path = absolute.clone();
    assert_eq!(config.faq_file_path(), absolute);
}

#[test]
fn faq_source_selection() {
    let mut config = Config::default();
    assert!(matches!(config.faq_source(), FaqSource::Inline(pairs) if pairs.len() == 3));

    config.faq.source = FaqSourceKind::File;
    assert!(matches!(config.faq_source(), FaqSource::File(_)));
}

#[test]
#[serial]
fn config_dir_honors_env_override() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(CONFIG_DIR_ENV, temp_dir.path()) };
    let dir = Config::config_dir();
    // SAFETY: see above
    unsafe { std::env::remove_var(CONFIG_DIR_ENV) };

    assert_eq!(dir.expect("should resolve config dir"), temp_dir.path());
}
