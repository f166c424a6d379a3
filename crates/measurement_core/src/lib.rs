//! # Measurement Core
//!
//! Schema de intercâmbio `Sample`/`Measurement`, codec binário protobuf
//! compatível no fio, representação textual e configuração TOML.
//!
//! ## Módulos
//! - [`types`] – Registros `Sample` e `Measurement`
//! - [`enums`] – Enumerações fechadas (`EntityType`, `SampleType`, `MetricType`)
//! - [`timestamp`] – Instante em segundos + nanos
//! - [`wire`] – Mensagens protobuf com números de campo fixos
//! - [`protocol`] – Encode/decode binário e fluxos delimitados
//! - [`text`] – JSON / YAML
//! - [`config`] – Configuração via TOML

pub mod types;
pub mod enums;
pub mod timestamp;
pub mod wire;
pub mod protocol;
pub mod text;
pub mod config;

// Re-exports convenientes
pub use types::{Measurement, Sample};
pub use enums::{EntityType, MetricType, SampleType};
pub use timestamp::Timestamp;
pub use protocol::{
    decode, decode_delimited, decode_measurement, decode_sample, encode, encode_delimited,
    encode_measurement, encode_sample, Codec, ErrorKind, ProtocolError, WireRecord,
};
pub use text::{from_text, to_text, TextError, TextFormat};
pub use config::{AppConfig, CodecConfig, OutputConfig};
