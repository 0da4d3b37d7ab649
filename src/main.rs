use anyhow::Result;
use clap::{Parser, Subcommand};
use faq_search::commands::{ask, run_ingestion, serve};
use faq_search::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "faq-search")]
#[command(about = "Semantic FAQ search over an embedding model and a vector index")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the embedding service, vector index and FAQ source
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Ingest the FAQ data and start the HTTP query server
    Serve {
        /// Address to listen on, overriding the configured one
        #[arg(long)]
        bind: Option<String>,
        /// Serve whatever the index already holds
        #[arg(long)]
        skip_ingest: bool,
    },
    /// Embed and index the FAQ data without serving
    Ingest,
    /// Answer a single question from the command line
    Ask {
        /// Question to look up
        question: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Serve { bind, skip_ingest } => {
            serve(bind, skip_ingest).await?;
        }
        Commands::Ingest => {
            run_ingestion().await?;
        }
        Commands::Ask { question } => {
            ask(question).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn ingest_command() {
        let cli = Cli::try_parse_from(["faq-search", "ingest"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Ingest));
        }
    }

    #[test]
    fn serve_command_defaults() {
        let cli = Cli::try_parse_from(["faq-search", "serve"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Serve { bind, skip_ingest } = parsed.command {
                assert_eq!(bind, None);
                assert!(!skip_ingest);
            } else {
                panic!("expected serve command");
            }
        }
    }

    #[test]
    fn serve_command_with_flags() {
        let cli = Cli::try_parse_from([
            "faq-search",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--skip-ingest",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Serve { bind, skip_ingest } = parsed.command {
                assert_eq!(bind, Some("0.0.0.0:9000".to_string()));
                assert!(skip_ingest);
            } else {
                panic!("expected serve command");
            }
        }
    }

    #[test]
    fn ask_command_with_question() {
        let cli = Cli::try_parse_from(["faq-search", "ask", "Siparişim nerede?"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Ask { question } = parsed.command {
                assert_eq!(question, "Siparişim nerede?");
            } else {
                panic!("expected ask command");
            }
        }
    }

    #[test]
    fn ask_requires_question() {
        let cli = Cli::try_parse_from(["faq-search", "ask"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["faq-search", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["faq-search", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["faq-search", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
