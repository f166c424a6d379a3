//! Implementação dos subcomandos.
//!
//! A conversão em si trabalha sobre bytes/strings em memória; só as funções
//! `run_*` tocam arquivos e stdio.

use crate::cli::{ConvertArgs, DecodeArgs, ExampleArgs, InspectArgs, RecordKind};
use measurement_core::{
    from_text, to_text, Codec, EntityType, Measurement, MetricType, OutputConfig, ProtocolError,
    Sample, SampleType, TextError, TextFormat, Timestamp, WireRecord,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Erros da ferramenta.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Erro de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),
}

/// Dependências comuns dos subcomandos, derivadas do config.
#[derive(Debug, Clone)]
pub struct Context {
    pub codec: Codec,
    pub output: OutputConfig,
}

// ──────────────────────────────────────────────
// Conversões em memória
// ──────────────────────────────────────────────

/// Texto → binário.
pub fn encode_text(
    codec: &Codec,
    text: &str,
    kind: RecordKind,
    format: TextFormat,
    delimited: bool,
) -> Result<Vec<u8>, ToolError> {
    match kind {
        RecordKind::Measurement => encode_records::<Measurement>(codec, text, format, delimited),
        RecordKind::Sample => encode_records::<Sample>(codec, text, format, delimited),
    }
}

fn encode_records<R>(
    codec: &Codec,
    text: &str,
    format: TextFormat,
    delimited: bool,
) -> Result<Vec<u8>, ToolError>
where
    R: WireRecord + DeserializeOwned,
{
    if delimited {
        let records: Vec<R> = from_text(text, format)?;
        debug!("{} registros lidos do texto", records.len());
        Ok(codec.encode_delimited(&records))
    } else {
        let record: R = from_text(text, format)?;
        Ok(codec.encode(&record))
    }
}

/// Binário → texto.
pub fn decode_binary(
    codec: &Codec,
    bytes: &[u8],
    kind: RecordKind,
    format: TextFormat,
    pretty: bool,
    delimited: bool,
) -> Result<String, ToolError> {
    match kind {
        RecordKind::Measurement => {
            decode_records::<Measurement>(codec, bytes, format, pretty, delimited)
        }
        RecordKind::Sample => decode_records::<Sample>(codec, bytes, format, pretty, delimited),
    }
}

fn decode_records<R>(
    codec: &Codec,
    bytes: &[u8],
    format: TextFormat,
    pretty: bool,
    delimited: bool,
) -> Result<String, ToolError>
where
    R: WireRecord + Serialize,
{
    let text = if delimited {
        let records: Vec<R> = codec.decode_delimited(bytes)?;
        debug!("{} registros decodificados", records.len());
        to_text(&records, format, pretty)?
    } else {
        let record: R = codec.decode(bytes)?;
        to_text(&record, format, pretty)?
    };
    Ok(text)
}

/// Uma linha por measurement, seguida de uma linha por sample.
pub fn inspect_binary(codec: &Codec, bytes: &[u8], delimited: bool) -> Result<String, ToolError> {
    let measurements: Vec<Measurement> = if delimited {
        codec.decode_delimited(bytes)?
    } else {
        vec![codec.decode(bytes)?]
    };

    let mut report = String::new();
    for measurement in &measurements {
        report.push_str(&format!("{measurement}\n"));
        for sample in &measurement.samples {
            report.push_str(&format!(
                "  {} {} / {} {} [{}] = {}\n",
                sample.entity_type,
                sample.entity_name,
                sample.sample_type,
                sample.sample_name,
                sample.metric_type,
                sample
            ));
        }
    }
    Ok(report)
}

pub fn example_measurement() -> Measurement {
    Measurement::new("m1", "sensor-7", "rack-3", Timestamp::from_seconds(1_700_000_000)).with_sample(
        Sample::new(
            EntityType::Tariff,
            "host-a",
            SampleType::ElectricityProduction,
            "cpu",
            MetricType::Counter,
            42.5,
        ),
    )
}

// ──────────────────────────────────────────────
// Subcomandos
// ──────────────────────────────────────────────

pub fn run_encode(ctx: &Context, args: &ConvertArgs) -> Result<(), ToolError> {
    let format = args.format.map(TextFormat::from).unwrap_or(ctx.output.format);
    let input = read_input(&args.input)?;
    let text = String::from_utf8(input).map_err(|e| ToolError::Io {
        path: args.input.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let bytes = encode_text(&ctx.codec, &text, args.kind, format, args.delimited)?;
    write_output(args.output.as_deref(), &bytes)?;
    info!(
        "→ {} bytes ({:?}, {format}{})",
        bytes.len(),
        args.kind,
        if args.delimited { ", delimitado" } else { "" }
    );
    Ok(())
}

pub fn run_decode(ctx: &Context, args: &DecodeArgs) -> Result<(), ToolError> {
    let convert = &args.convert;
    let format = convert.format.map(TextFormat::from).unwrap_or(ctx.output.format);
    let pretty = ctx.output.pretty && !args.compact;
    let bytes = read_input(&convert.input)?;

    let mut text = decode_binary(&ctx.codec, &bytes, convert.kind, format, pretty, convert.delimited)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    write_output(convert.output.as_deref(), text.as_bytes())?;
    info!("← {} bytes decodificados ({:?})", bytes.len(), convert.kind);
    Ok(())
}

pub fn run_inspect(ctx: &Context, args: &InspectArgs) -> Result<(), ToolError> {
    let bytes = read_input(&args.input)?;
    let report = inspect_binary(&ctx.codec, &bytes, args.delimited)?;
    write_output(None, report.as_bytes())
}

pub fn run_example(ctx: &Context, args: &ExampleArgs) -> Result<(), ToolError> {
    let format = args.format.map(TextFormat::from).unwrap_or(ctx.output.format);
    let mut text = to_text(&example_measurement(), format, ctx.output.pretty)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    write_output(None, text.as_bytes())
}

// ──────────────────────────────────────────────
// I/O
// ──────────────────────────────────────────────

fn read_input(path: &Path) -> Result<Vec<u8>, ToolError> {
    let io_error = |source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf).map_err(io_error)?;
        Ok(buf)
    } else {
        std::fs::read(path).map_err(io_error)
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), ToolError> {
    match path {
        Some(path) => std::fs::write(path, bytes).map_err(|source| ToolError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|()| stdout.flush())
                .map_err(|source| ToolError::Io {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}
