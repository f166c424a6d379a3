//! # Measurement Tool
//!
//! Converte measurements entre o binário protobuf e JSON/YAML, e imprime
//! resumos legíveis. Só arquivos locais e stdio.
//!
//! ## Uso
//! ```bash
//! measurement_tool example --format yaml
//! measurement_tool encode -i m.json -o m.pb
//! measurement_tool decode -i m.pb --format yaml
//! measurement_tool inspect -i lote.pb --delimited
//! ```

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use commands::{Context, ToolError};
use measurement_core::{AppConfig, Codec};
use std::process::ExitCode;
use tracing::{error, warn};

fn main() -> ExitCode {
    // ── Logging (stderr, stdout fica para os dados) ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ToolError> {
    // ── Carregar config ──
    let config = match &cli.config {
        Some(path) => AppConfig::load(path),
        None => {
            let path = AppConfig::default_path();
            let config = AppConfig::load(&path);
            // Salva config padrão se não existir
            if !path.exists() {
                if let Err(e) = config.save(&path) {
                    warn!("Não foi possível salvar config padrão: {e}");
                }
            }
            config
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ToolError::InvalidConfig(errors.join("; ")));
    }

    let ctx = Context {
        codec: Codec::from_config(&config.codec),
        output: config.output,
    };

    match &cli.command {
        Command::Encode(args) => commands::run_encode(&ctx, args),
        Command::Decode(args) => commands::run_decode(&ctx, args),
        Command::Inspect(args) => commands::run_inspect(&ctx, args),
        Command::Example(args) => commands::run_example(&ctx, args),
    }
}
