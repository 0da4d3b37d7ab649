
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::path::Path;
use std::time::Duration;

use super::{Config, ConfigError, FaqSourceKind, IndexBackend, IndexConfig, OllamaConfig};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 FAQ Search Configuration Setup").bold().cyan());
    eprintln!();

    let config_dir = Config::config_dir().context("Failed to resolve configuration directory")?;
    let mut config = load_existing_config(&config_dir)?;

    eprintln!("{}", style("Ollama Configuration").bold().yellow());
    eprintln!("Configure the Ollama instance used to embed questions.");
    eprintln!();
    configure_ollama(&mut config.ollama)?;

    eprintln!();
    eprintln!("{}", style("Vector Index Configuration").bold().yellow());
    configure_index(&mut config.index)?;

    eprintln!();
    eprintln!("{}", style("FAQ Source").bold().yellow());
    configure_faq_source(&mut config)?;

    eprintln!();
    eprintln!("{}", style("Testing configuration...").yellow());

    let ollama_url = format!(
        "{}://{}:{}/api/version",
        config.ollama.protocol, config.ollama.host, config.ollama.port
    );
    if test_connection(&ollama_url, None) {
        eprintln!("{}", style("✓ Ollama connection successful!").green());
    } else {
        eprintln!(
            "{}",
            style("⚠ Warning: Could not connect to Ollama").yellow()
        );
        eprintln!("You can continue, but make sure Ollama is running before ingesting.");
    }

    if config.index.backend == IndexBackend::Qdrant {
        let qdrant_url = format!(
            "{}://{}:{}/collections",
            config.index.protocol, config.index.host, config.index.port
        );
        if test_connection(&qdrant_url, config.index.api_key.as_deref()) {
            eprintln!("{}", style("✓ Qdrant connection successful!").green());
        } else {
            eprintln!(
                "{}",
                style("⚠ Warning: Could not connect to Qdrant").yellow()
            );
        }
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Ollama Settings:").bold().yellow());
    eprintln!("  Host: {}", style(&config.ollama.host).cyan());
    eprintln!("  Port: {}", style(config.ollama.port).cyan());
    eprintln!("  Model: {}", style(&config.ollama.model).cyan());
    eprintln!(
        "  Dimension: {}",
        style(config.ollama.embedding_dimension).cyan()
    );
    eprintln!("  Batch Size: {}", style(config.ollama.batch_size).cyan());
    match config.ollama_url() {
        Ok(url) => eprintln!("  Ollama URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  Ollama URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!("{}", style("Vector Index Settings:").bold().yellow());
    eprintln!("  Backend: {}", style(format!("{:?}", config.index.backend)).cyan());
    if config.index.backend == IndexBackend::Qdrant {
        match config.qdrant_url() {
            Ok(url) => eprintln!("  Qdrant URL: {}", style(url).cyan()),
            Err(e) => eprintln!("  Qdrant URL: {} ({})", style("Invalid").red(), e),
        }
    }
    eprintln!("  Collection: {}", style(&config.index.collection).cyan());
    eprintln!("  Distance: {}", style(config.index.distance).cyan());

    eprintln!();
    eprintln!("{}", style("FAQ Settings:").bold().yellow());
    match config.faq.source {
        FaqSourceKind::Inline => eprintln!("  Source: {}", style("inline").cyan()),
        FaqSourceKind::File => eprintln!(
            "  Source: {}",
            style(config.faq_file_path().display()).cyan()
        ),
    }
    eprintln!(
        "  Id Strategy: {}",
        style(format!("{:?}", config.faq.id_strategy)).cyan()
    );
    match config.faq.min_score {
        Some(min_score) => eprintln!("  Minimum Score: {}", style(min_score).cyan()),
        None => eprintln!("  Minimum Score: {}", style("none").dim()),
    }

    eprintln!();
    eprintln!("Server bind: {}", style(&config.server.bind).cyan());
    eprintln!("Config file: {}", style(config.config_file_path().display()).dim());

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("Existing configuration is invalid. Using defaults.").yellow()
            );
            Ok(Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            })
        },
        |config| {
            if config.config_file_path().exists() {
                eprintln!("{}", style("Found existing configuration.").green());
            } else {
                eprintln!(
                    "{}",
                    style("No existing configuration found. Using defaults.").yellow()
                );
            }
            Ok(config)
        },
    )
}

fn select_protocol(prompt: &str, current: &str) -> Result<String> {
    let protocols = &["http", "https"];
    let default_index = protocols.iter().position(|&p| p == current).unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt(prompt)
        .default(default_index)
        .items(protocols)
        .interact()?;

    Ok(protocols[protocol_index].to_string())
}

fn prompt_port(prompt: &str, current: u16) -> Result<u16> {
    let port: u16 = Input::new()
        .with_prompt(prompt)
        .default(current)
        .validate_with(|input: &u16| -> Result<(), &str> {
            if *input == 0 {
                Err("Port must be greater than 0")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(port)
}

fn configure_ollama(ollama: &mut OllamaConfig) -> Result<()> {
    let protocol = select_protocol("Ollama protocol", &ollama.protocol)?;

    let host: String = Input::new()
        .with_prompt("Ollama host")
        .default(ollama.host.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let temp_config = OllamaConfig {
                protocol: protocol.clone(),
                host: input.clone(),
                ..OllamaConfig::default()
            };
            temp_config.validate()
        })
        .interact_text()?;

    let port = prompt_port("Ollama port", ollama.port)?;

    let model: String = Input::new()
        .with_prompt("Embedding model")
        .default(ollama.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let dimension: u32 = Input::new()
        .with_prompt("Embedding dimension")
        .default(ollama.embedding_dimension)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if (1..=4096).contains(input) {
                Ok(())
            } else {
                Err("Dimension must be between 1 and 4096")
            }
        })
        .interact_text()?;

    ollama.set_protocol(protocol)?;
    ollama.set_host(host)?;
    ollama.set_port(port)?;
    ollama.set_model(model)?;
    ollama.set_embedding_dimension(dimension)?;

    Ok(())
}

fn configure_index(index: &mut IndexConfig) -> Result<()> {
    let backends = &["qdrant", "memory"];
    let default_index = match index.backend {
        IndexBackend::Qdrant => 0,
        IndexBackend::Memory => 1,
    };
    let backend_index = Select::new()
        .with_prompt("Vector index backend")
        .default(default_index)
        .items(backends)
        .interact()?;
    index.backend = if backend_index == 0 {
        IndexBackend::Qdrant
    } else {
        IndexBackend::Memory
    };

    if index.backend == IndexBackend::Qdrant {
        index.protocol = select_protocol("Qdrant protocol", &index.protocol)?;

        let host: String = Input::new()
            .with_prompt("Qdrant host")
            .default(index.host.clone())
            .interact_text()?;
        index.set_host(host)?;

        let port = prompt_port("Qdrant port", index.port)?;
        index.set_port(port)?;

        let api_key: String = Input::new()
            .with_prompt("Qdrant API key (leave empty for none)")
            .default(index.api_key.clone().unwrap_or_default())
            .allow_empty(true)
            .show_default(false)
            .interact_text()?;
        let api_key = api_key.trim();
        index.api_key = (!api_key.is_empty()).then(|| api_key.to_string());
    }

    let collection: String = Input::new()
        .with_prompt("Collection name")
        .default(index.collection.clone())
        .interact_text()?;
    index.set_collection(collection)?;

    Ok(())
}

fn configure_faq_source(config: &mut Config) -> Result<()> {
    let sources = &["inline", "file"];
    let default_index = match config.faq.source {
        FaqSourceKind::Inline => 0,
        FaqSourceKind::File => 1,
    };
    let source_index = Select::new()
        .with_prompt("FAQ data source")
        .default(default_index)
        .items(sources)
        .interact()?;

    if source_index == 0 {
        config.faq.source = FaqSourceKind::Inline;
        return Ok(());
    }

    config.faq.source = FaqSourceKind::File;
    let path: String = Input::new()
        .with_prompt("FAQ JSON file (relative paths resolve against the config directory)")
        .default(config.faq.path.display().to_string())
        .interact_text()?;
    config.faq.path = path.into();

    Ok(())
}

/// Reachable and authorized. Rejected credentials count as a failure.
fn test_connection(url: &str, api_key: Option<&str>) -> bool {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(5)))
        .build()
        .into();

    let mut request = agent.get(url);
    if let Some(api_key) = api_key {
        request = request.header("api-key", api_key);
    }

    match request.call() {
        Ok(_) => true,
        Err(ureq::Error::StatusCode(401 | 403)) => false,
        Err(ureq::Error::StatusCode(code)) => (400..500).contains(&code),
        Err(_) => false,
    }
}
