//! Argumentos de linha de comando.

use clap::{Args, Parser, Subcommand, ValueEnum};
use measurement_core::TextFormat;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "measurement_tool", version, about = "Converte e inspeciona measurements protobuf")]
pub struct Cli {
    /// Caminho do measurement.toml (padrão: ao lado do executável)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Texto (JSON/YAML) → binário protobuf
    Encode(ConvertArgs),
    /// Binário protobuf → texto (JSON/YAML)
    Decode(DecodeArgs),
    /// Resumo legível de measurements binários
    Inspect(InspectArgs),
    /// Imprime uma measurement de exemplo em texto
    Example(ExampleArgs),
}

/// Registro contido na entrada.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    #[default]
    Measurement,
    Sample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for TextFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => TextFormat::Json,
            FormatArg::Yaml => TextFormat::Yaml,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Arquivo de entrada (`-` = stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,
    /// Arquivo de saída (padrão: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = RecordKind::Measurement)]
    pub kind: RecordKind,
    /// Formato textual (padrão: o do config)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
    /// Fluxo de registros prefixados pelo tamanho (lista no texto)
    #[arg(short, long)]
    pub delimited: bool,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub convert: ConvertArgs,
    /// JSON numa linha só
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Arquivo de entrada (`-` = stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,
    #[arg(short, long)]
    pub delimited: bool,
}

#[derive(Debug, Args)]
pub struct ExampleArgs {
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn decode_arguments_parse() {
        let cli = Cli::parse_from([
            "measurement_tool",
            "--config",
            "tool.toml",
            "decode",
            "-i",
            "in.pb",
            "--kind",
            "sample",
            "--format",
            "yaml",
            "--delimited",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("tool.toml")));
        let Command::Decode(args) = cli.command else {
            panic!("esperado decode");
        };
        assert_eq!(args.convert.input, PathBuf::from("in.pb"));
        assert_eq!(args.convert.kind, RecordKind::Sample);
        assert_eq!(args.convert.format, Some(FormatArg::Yaml));
        assert!(args.convert.delimited);
        assert!(!args.compact);
    }

    #[test]
    fn encode_defaults_to_stdin_measurement() {
        let cli = Cli::parse_from(["measurement_tool", "encode"]);
        let Command::Encode(args) = cli.command else {
            panic!("esperado encode");
        };
        assert_eq!(args.input, PathBuf::from("-"));
        assert_eq!(args.output, None);
        assert_eq!(args.kind, RecordKind::Measurement);
    }
}
