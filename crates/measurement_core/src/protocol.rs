//! Codec binário (protobuf) de [`Sample`] e [`Measurement`].
//!
//! Formato de fio: TLV protobuf puro, sem header próprio, para que qualquer
//! implementação protobuf com o mesmo schema interopere byte a byte.
//!
//! ```text
//! ┌─────────────────────┬──────────────┐
//! │ key (tag<<3 | wire) │ valor        │  … repetido por campo
//! └─────────────────────┴──────────────┘
//! ```
//!
//! - Campos desconhecidos são ignorados (compatibilidade futura)
//! - Enum com valor desconhecido vira o sentinela `Unspecified`
//! - Valores zero não são emitidos; ausência decodifica como zero
//! - Fluxos delimitados: cada registro prefixado pelo tamanho em varint

use crate::config::CodecConfig;
use crate::enums::{EntityType, MetricType, SampleType};
use crate::timestamp::Timestamp;
use crate::types::{Measurement, Sample};
use crate::wire::{MeasurementMessage, SampleMessage};
use prost::Message;
use tracing::{debug, trace};

/// Limite padrão de tamanho de um registro codificado (4 MiB).
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// Classe do erro, para quem só precisa decidir o que fazer com ele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bytes truncados ou corrompidos
    MalformedInput,
    /// Campo com wire type incompatível com o tipo declarado
    TypeMismatch,
    /// Entrada maior que o limite configurado
    LimitExceeded,
}

/// Erros do protocolo.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Entrada malformada: {0}")]
    MalformedInput(String),

    #[error("Tipo de campo incompatível: {0}")]
    TypeMismatch(String),

    #[error("Timestamp inválido: {seconds}s {nanos}ns (nanos deve estar em 0..=999999999)")]
    InvalidTimestamp { seconds: i64, nanos: i32 },

    #[error("Registro muito grande ({size} bytes, máximo {max})")]
    TooLarge { size: usize, max: usize },
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::MalformedInput(_) | ProtocolError::InvalidTimestamp { .. } => {
                ErrorKind::MalformedInput
            }
            ProtocolError::TypeMismatch(_) => ErrorKind::TypeMismatch,
            ProtocolError::TooLarge { .. } => ErrorKind::LimitExceeded,
        }
    }
}

impl From<prost::DecodeError> for ProtocolError {
    fn from(err: prost::DecodeError) -> Self {
        // O prost só expõe a descrição textual; wire type errado é
        // reportado como "invalid wire type: X (expected Y)".
        let description = err.to_string();
        if description.contains("invalid wire type:") {
            ProtocolError::TypeMismatch(description)
        } else {
            ProtocolError::MalformedInput(description)
        }
    }
}

// ──────────────────────────────────────────────
// Registros ⇄ mensagens de fio
// ──────────────────────────────────────────────

/// Registro de domínio com representação protobuf.
pub trait WireRecord: Sized {
    type Message: Message + Default;

    fn to_message(&self) -> Self::Message;

    fn from_message(message: Self::Message) -> Result<Self, ProtocolError>;
}

impl WireRecord for Sample {
    type Message = SampleMessage;

    fn to_message(&self) -> SampleMessage {
        SampleMessage {
            entity_type: self.entity_type.into(),
            entity_name: self.entity_name.clone(),
            sample_type: self.sample_type.into(),
            sample_name: self.sample_name.clone(),
            metric_type: self.metric_type.into(),
            value: (self.value.to_bits() != 0).then_some(self.value),
        }
    }

    fn from_message(message: SampleMessage) -> Result<Self, ProtocolError> {
        Ok(Sample {
            entity_type: EntityType::from_wire(message.entity_type),
            entity_name: message.entity_name,
            sample_type: SampleType::from_wire(message.sample_type),
            sample_name: message.sample_name,
            metric_type: MetricType::from_wire(message.metric_type),
            value: message.value.unwrap_or(0.0),
        })
    }
}

impl WireRecord for Measurement {
    type Message = MeasurementMessage;

    fn to_message(&self) -> MeasurementMessage {
        MeasurementMessage {
            id: self.id.clone(),
            source: self.source.clone(),
            location: self.location.clone(),
            samples: self.samples.iter().map(Sample::to_message).collect(),
            // Época = zero: não emitido, como os escalares
            measured_at_time: (!self.measured_at_time.is_epoch())
                .then(|| self.measured_at_time.into()),
        }
    }

    fn from_message(message: MeasurementMessage) -> Result<Self, ProtocolError> {
        let measured_at_time = message
            .measured_at_time
            .map(Timestamp::from)
            .unwrap_or(Timestamp::UNIX_EPOCH);
        if !measured_at_time.is_valid() {
            return Err(ProtocolError::InvalidTimestamp {
                seconds: measured_at_time.seconds,
                nanos: measured_at_time.nanos,
            });
        }

        let samples = message
            .samples
            .into_iter()
            .map(Sample::from_message)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Measurement {
            id: message.id,
            source: message.source,
            location: message.location,
            samples,
            measured_at_time,
        })
    }
}

// ──────────────────────────────────────────────
// Codec
// ──────────────────────────────────────────────

/// Codec com limite de tamanho por registro, aplicado só na decodificação.
///
/// `Codec::default()` usa [`DEFAULT_MAX_MESSAGE_BYTES`]; as funções livres
/// deste módulo usam [`Codec::unlimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    max_message_bytes: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_BYTES)
    }
}

impl Codec {
    pub fn new(max_message_bytes: usize) -> Self {
        Self { max_message_bytes }
    }

    /// Sem limite: tudo que `encode` produz, `decode` aceita.
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.max_message_bytes)
    }

    pub fn max_message_bytes(&self) -> usize {
        self.max_message_bytes
    }

    /// Codifica um registro. Determinístico: mesmos campos, mesmos bytes.
    pub fn encode<R: WireRecord>(&self, record: &R) -> Vec<u8> {
        record.to_message().encode_to_vec()
    }

    /// Decodifica um registro completo ou falha; nunca retorna parcial.
    pub fn decode<R: WireRecord>(&self, data: &[u8]) -> Result<R, ProtocolError> {
        self.check_size(data.len())?;

        let message = R::Message::decode(data).map_err(|e| {
            let err = ProtocolError::from(e);
            debug!("Falha ao decodificar {} bytes: {err}", data.len());
            err
        })?;
        R::from_message(message)
    }

    /// Concatena os registros, cada um prefixado pelo tamanho (varint).
    pub fn encode_delimited<R: WireRecord>(&self, records: &[R]) -> Vec<u8> {
        let mut buf = Vec::new();
        for record in records {
            buf.extend_from_slice(&record.to_message().encode_length_delimited_to_vec());
        }
        trace!("{} registros delimitados em {} bytes", records.len(), buf.len());
        buf
    }

    /// Lê registros delimitados até consumir toda a entrada.
    pub fn decode_delimited<R: WireRecord>(&self, mut data: &[u8]) -> Result<Vec<R>, ProtocolError> {
        let mut records = Vec::new();

        while !data.is_empty() {
            let len = prost::decode_length_delimiter(&mut data)?;
            self.check_size(len)?;
            if len > data.len() {
                return Err(ProtocolError::MalformedInput(format!(
                    "registro {} truncado: esperados {len} bytes, restam {}",
                    records.len(),
                    data.len()
                )));
            }

            let (record, rest) = data.split_at(len);
            records.push(self.decode(record)?);
            data = rest;
        }

        trace!("{} registros delimitados lidos", records.len());
        Ok(records)
    }

    fn check_size(&self, size: usize) -> Result<(), ProtocolError> {
        if size > self.max_message_bytes {
            return Err(ProtocolError::TooLarge {
                size,
                max: self.max_message_bytes,
            });
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Atalhos sem limite de tamanho
// ──────────────────────────────────────────────

pub fn encode<R: WireRecord>(record: &R) -> Vec<u8> {
    Codec::unlimited().encode(record)
}

pub fn decode<R: WireRecord>(data: &[u8]) -> Result<R, ProtocolError> {
    Codec::unlimited().decode(data)
}

pub fn encode_sample(sample: &Sample) -> Vec<u8> {
    encode(sample)
}

pub fn decode_sample(data: &[u8]) -> Result<Sample, ProtocolError> {
    decode(data)
}

pub fn encode_measurement(measurement: &Measurement) -> Vec<u8> {
    encode(measurement)
}

pub fn decode_measurement(data: &[u8]) -> Result<Measurement, ProtocolError> {
    decode(data)
}

pub fn encode_delimited<R: WireRecord>(records: &[R]) -> Vec<u8> {
    Codec::unlimited().encode_delimited(records)
}

pub fn decode_delimited<R: WireRecord>(data: &[u8]) -> Result<Vec<R>, ProtocolError> {
    Codec::unlimited().decode_delimited(data)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn example_sample() -> Sample {
        Sample::new(
            EntityType::Tariff,
            "host-a",
            SampleType::ElectricityProduction,
            "cpu",
            MetricType::Counter,
            42.5,
        )
    }

    fn example_measurement() -> Measurement {
        Measurement::new("m1", "sensor-7", "rack-3", Timestamp::new(1_700_000_000, 0))
            .with_sample(example_sample())
    }

    fn example_sample_bytes() -> Vec<u8> {
        let mut bytes = vec![0x08, 0x01, 0x12, 0x06];
        bytes.extend_from_slice(b"host-a");
        bytes.extend_from_slice(&[0x18, 0x02, 0x22, 0x03]);
        bytes.extend_from_slice(b"cpu");
        bytes.extend_from_slice(&[0x28, 0x01, 0x31]);
        bytes.extend_from_slice(&42.5f64.to_le_bytes());
        bytes
    }

    #[test]
    fn sample_golden_bytes() {
        assert_eq!(encode_sample(&example_sample()), example_sample_bytes());
    }

    #[test]
    fn measurement_golden_bytes() {
        let sample = example_sample_bytes();
        let mut expected = vec![0x0A, 0x02];
        expected.extend_from_slice(b"m1");
        expected.extend_from_slice(&[0x12, 0x08]);
        expected.extend_from_slice(b"sensor-7");
        expected.extend_from_slice(&[0x1A, 0x06]);
        expected.extend_from_slice(b"rack-3");
        expected.extend_from_slice(&[0x22, sample.len() as u8]);
        expected.extend_from_slice(&sample);
        // Timestamp { seconds: 1700000000 }, nanos = 0 omitido
        expected.extend_from_slice(&[0x2A, 0x06, 0x08, 0x80, 0xE2, 0xCF, 0xAA, 0x06]);

        assert_eq!(encode_measurement(&example_measurement()), expected);
    }

    #[test]
    fn example_measurement_roundtrip() {
        let original = example_measurement();
        let decoded = decode_measurement(&encode_measurement(&original)).unwrap();

        assert_eq!(decoded.id, "m1");
        assert_eq!(decoded.source, "sensor-7");
        assert_eq!(decoded.location, "rack-3");
        assert_eq!(decoded.measured_at_time, Timestamp::new(1_700_000_000, 0));
        assert_eq!(decoded.samples, vec![example_sample()]);
        assert_eq!(decoded, original);
    }

    #[test]
    fn encoding_is_deterministic() {
        let m = example_measurement();
        assert_eq!(encode_measurement(&m), encode_measurement(&m.clone()));
    }

    #[test]
    fn empty_input_is_zero_sample() {
        assert_eq!(decode_sample(&[]).unwrap(), Sample::default());
        assert!(encode_sample(&Sample::default()).is_empty());
    }

    #[test]
    fn explicit_zero_values_decode_as_defaults() {
        let bytes = [0x08, 0x00, 0x12, 0x00, 0x31, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(decode_sample(&bytes).unwrap(), Sample::default());
    }

    #[test]
    fn absent_timestamp_is_epoch() {
        let decoded = decode_measurement(&[0x0A, 0x01, b'x']).unwrap();
        assert_eq!(decoded.id, "x");
        assert_eq!(decoded.measured_at_time, Timestamp::UNIX_EPOCH);
        assert!(decoded.samples.is_empty());

        let epoch = Measurement::new("x", "", "", Timestamp::UNIX_EPOCH);
        assert_eq!(encode_measurement(&epoch), vec![0x0A, 0x01, b'x']);
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let mut bytes = example_sample_bytes();
        bytes.extend_from_slice(&[0x78, 0x05]); // campo 15, varint
        bytes.extend_from_slice(&[0x4A, 0x02, b'x', b'x']); // campo 9, length-delimited
        bytes.extend_from_slice(&[0x55, 1, 2, 3, 4]); // campo 10, fixed32

        assert_eq!(decode_sample(&bytes).unwrap(), example_sample());
    }

    #[test]
    fn unknown_fields_inside_nested_samples_are_skipped() {
        let mut sample = example_sample_bytes();
        sample.extend_from_slice(&[0x78, 0x05]);

        let mut bytes = vec![0x22, sample.len() as u8];
        bytes.extend_from_slice(&sample);
        bytes.extend_from_slice(&[0x30, 0x01]); // campo 6 inexistente em Measurement

        let decoded = decode_measurement(&bytes).unwrap();
        assert_eq!(decoded.samples, vec![example_sample()]);
    }

    #[test]
    fn unknown_enum_values_become_unspecified() {
        let bytes = [0x08, 0x63, 0x18, 0x7F, 0x28, 0x07];
        let decoded = decode_sample(&bytes).unwrap();

        assert_eq!(decoded.entity_type, EntityType::Unspecified);
        assert_eq!(decoded.sample_type, SampleType::Unspecified);
        assert_eq!(decoded.metric_type, MetricType::Unspecified);
    }

    #[test]
    fn negative_enum_value_becomes_unspecified() {
        let mut bytes = vec![0x08];
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        let decoded = decode_sample(&bytes).unwrap();
        assert_eq!(decoded.entity_type, EntityType::Unspecified);
    }

    #[test]
    fn sample_order_is_preserved() {
        let make = |name: &str, value: f64| {
            Sample::new(EntityType::Zone, name, SampleType::Temperature, "t", MetricType::Gauge, value)
        };
        let samples = vec![make("A", 1.0), make("B", 2.0), make("C", 3.0)];
        let m = Measurement::new("m", "s", "l", Timestamp::from_seconds(1)).with_samples(samples.clone());

        assert_eq!(decode_measurement(&encode_measurement(&m)).unwrap().samples, samples);
    }

    #[test]
    fn special_float_values_roundtrip() {
        let roundtrip = |value: f64| {
            let sample = Sample {
                value,
                ..example_sample()
            };
            decode_sample(&encode_sample(&sample)).unwrap().value
        };

        let negative_zero = roundtrip(-0.0);
        assert_eq!(negative_zero, 0.0);
        assert!(negative_zero.is_sign_negative());
        assert!(roundtrip(f64::NAN).is_nan());
        assert_eq!(roundtrip(f64::INFINITY), f64::INFINITY);
        assert_eq!(roundtrip(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn zero_is_omitted_but_negative_zero_is_emitted() {
        let zero = Sample::default();
        assert!(encode_sample(&zero).is_empty());

        let negative_zero = Sample {
            value: -0.0,
            ..Default::default()
        };
        let mut expected = vec![0x31];
        expected.extend_from_slice(&(-0.0f64).to_le_bytes());
        assert_eq!(encode_sample(&negative_zero), expected);
        assert!(decode_sample(&expected).unwrap().value.is_sign_negative());
    }

    #[test]
    fn free_functions_roundtrip_beyond_default_limit() {
        let big = Measurement::new(
            "x".repeat(DEFAULT_MAX_MESSAGE_BYTES + 1),
            "sensor-7",
            "rack-3",
            Timestamp::from_seconds(1_700_000_000),
        );
        let bytes = encode_measurement(&big);
        assert!(bytes.len() > DEFAULT_MAX_MESSAGE_BYTES);
        assert_eq!(decode_measurement(&bytes).unwrap(), big);

        // O limite continua valendo para o codec configurado
        let err = Codec::default().decode::<Measurement>(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn truncated_input_is_malformed() {
        let full = encode_measurement(&example_measurement());
        for cut in [1, 5, full.len() - 1] {
            let err = decode_measurement(&full[..cut]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "corte em {cut}: {err}");
        }

        let err = decode_sample(&[0x12, 0x05, b'a']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        let err = decode_sample(&[0x31, 0x00, 0x00]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = decode_sample(&[0x12, 0x02, 0xFF, 0xFE]).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedInput(_)));
    }

    #[test]
    fn reserved_wire_type_is_malformed_not_mismatch() {
        let err = decode_sample(&[0x0F]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn wrong_wire_type_is_type_mismatch() {
        // value (double) codificado como varint
        let err = decode_sample(&[0x30, 0x01]).unwrap_err();
        assert!(matches!(err, ProtocolError::TypeMismatch(_)), "{err}");

        // entity_name (string) codificado como varint
        let err = decode_sample(&[0x10, 0x01]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        // samples (mensagem) codificado como varint
        let err = decode_measurement(&[0x20, 0x01]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn out_of_range_nanos_are_rejected() {
        for nanos in [1_000_000_000, -1] {
            let message = MeasurementMessage {
                id: "m".into(),
                measured_at_time: Some(prost_types::Timestamp { seconds: 1, nanos }),
                ..Default::default()
            };
            let err = decode_measurement(&message.encode_to_vec()).unwrap_err();
            assert!(matches!(
                err,
                ProtocolError::InvalidTimestamp { seconds: 1, nanos: n } if n == nanos
            ));
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn oversize_input_is_rejected_before_decoding() {
        let codec = Codec::new(4);
        let err = codec.decode::<Sample>(&[0u8; 5]).unwrap_err();
        assert!(matches!(err, ProtocolError::TooLarge { size: 5, max: 4 }));
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    #[test]
    fn codec_from_config_uses_limit() {
        let config = CodecConfig {
            max_message_bytes: 16,
        };
        assert_eq!(Codec::from_config(&config).max_message_bytes(), 16);
        assert_eq!(Codec::default().max_message_bytes(), DEFAULT_MAX_MESSAGE_BYTES);
    }

    #[test]
    fn delimited_stream_roundtrip() {
        let records = vec![
            example_measurement(),
            Measurement::new("m2", "sensor-8", "rack-4", Timestamp::new(1_700_000_060, 5)),
            Measurement::default(),
        ];
        let bytes = encode_delimited(&records);
        let decoded: Vec<Measurement> = decode_delimited(&bytes).unwrap();
        assert_eq!(decoded, records);

        assert!(decode_delimited::<Sample>(&[]).unwrap().is_empty());
    }

    #[test]
    fn delimited_stream_detects_truncation() {
        let bytes = encode_delimited(&[example_sample(), example_sample()]);
        let err = decode_delimited::<Sample>(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn delimited_stream_applies_limit_per_record() {
        let bytes = encode_delimited(&[example_sample()]);
        let codec = Codec::new(8);
        let err = codec.decode_delimited::<Sample>(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
    }

    fn finite_or_infinite() -> impl Strategy<Value = f64> {
        prop::num::f64::POSITIVE
            | prop::num::f64::NEGATIVE
            | prop::num::f64::NORMAL
            | prop::num::f64::SUBNORMAL
            | prop::num::f64::ZERO
            | prop::num::f64::INFINITE
    }

    fn sample_strategy() -> impl Strategy<Value = Sample> {
        (
            prop::sample::select(EntityType::ALL),
            "\\PC{0,12}",
            prop::sample::select(SampleType::ALL),
            "\\PC{0,12}",
            prop::sample::select(MetricType::ALL),
            finite_or_infinite(),
        )
            .prop_map(
                |(entity_type, entity_name, sample_type, sample_name, metric_type, value)| Sample {
                    entity_type,
                    entity_name,
                    sample_type,
                    sample_name,
                    metric_type,
                    value,
                },
            )
    }

    fn measurement_strategy() -> impl Strategy<Value = Measurement> {
        (
            "\\PC{0,12}",
            "\\PC{0,12}",
            "\\PC{0,12}",
            prop::collection::vec(sample_strategy(), 0..6),
            any::<i64>(),
            0..=crate::timestamp::MAX_NANOS,
        )
            .prop_map(|(id, source, location, samples, seconds, nanos)| {
                Measurement::new(id, source, location, Timestamp::new(seconds, nanos))
                    .with_samples(samples)
            })
    }

    proptest! {
        #[test]
        fn sample_roundtrip_law(sample in sample_strategy()) {
            prop_assert_eq!(decode_sample(&encode_sample(&sample)).unwrap(), sample);
        }

        #[test]
        fn measurement_roundtrip_law(measurement in measurement_strategy()) {
            let bytes = encode_measurement(&measurement);
            prop_assert_eq!(decode_measurement(&bytes).unwrap(), measurement);
        }
    }
}
