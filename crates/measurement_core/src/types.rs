//! Registros de dados do schema: [`Sample`] e [`Measurement`].
//!
//! Valores imutáveis: o produtor monta o registro completo, o consumidor
//! decodifica. "Atualizar" significa construir um novo registro.
//! Campos ausentes (no fio ou no texto) valem o zero do tipo.

use crate::enums::{EntityType, MetricType, SampleType};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Sample
// ──────────────────────────────────────────────

/// Um valor medido, classificado por entidade, amostra e métrica.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    /// Tipo da entidade (ex: dispositivo, zona)
    pub entity_type: EntityType,
    /// Instância da entidade (ex: "TP-Link HS110")
    pub entity_name: String,
    /// Categoria da medição
    pub sample_type: SampleType,
    /// Nome da amostra dentro do tipo (ex: "Oven")
    pub sample_name: String,
    /// Interpretação do valor (counter, gauge)
    pub metric_type: MetricType,
    /// Valor medido; unidade implícita em `sample_type`
    #[serde(with = "proto_double")]
    pub value: f64,
}

impl Sample {
    pub fn new(
        entity_type: EntityType,
        entity_name: impl Into<String>,
        sample_type: SampleType,
        sample_name: impl Into<String>,
        metric_type: MetricType,
        value: f64,
    ) -> Self {
        Self {
            entity_type,
            entity_name: entity_name.into(),
            sample_type,
            sample_name: sample_name.into(),
            metric_type,
            value,
        }
    }

    pub fn unit(&self) -> &'static str {
        self.sample_type.unit()
    }
}

/// `"<valor> <unidade>"`, ex: `54000000 J`.
impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit() {
            "" => write!(f, "{}", self.value),
            unit => write!(f, "{} {}", self.value, unit),
        }
    }
}

// ──────────────────────────────────────────────
// Measurement
// ──────────────────────────────────────────────

/// Lote de amostras medidas no mesmo instante, por uma origem/local.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    /// Identificador (unicidade é responsabilidade do chamador)
    pub id: String,
    /// Produtor da medição (ex: nome do exporter)
    pub source: String,
    /// Origem física/lógica (ex: região, casa)
    pub location: String,
    /// Amostras em ordem de inserção
    pub samples: Vec<Sample>,
    /// Instante da medição
    pub measured_at_time: Timestamp,
}

impl Measurement {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        location: impl Into<String>,
        measured_at_time: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            location: location.into(),
            samples: Vec::new(),
            measured_at_time,
        }
    }

    pub fn with_sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }

    pub fn with_samples(mut self, samples: impl IntoIterator<Item = Sample>) -> Self {
        self.samples.extend(samples);
        self
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Resumo de uma linha: `<id> <source>@<location> <instante> (<n> samples)`.
impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}@{} {} ({} samples)",
            self.id,
            self.source,
            self.location,
            self.measured_at_time,
            self.samples.len()
        )
    }
}

/// `double` no estilo JSON do proto3: números finitos como número,
/// `"NaN"`, `"Infinity"` e `"-Infinity"` como string. Na leitura também
/// aceita números em string.
mod proto_double {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else if *value == f64::NEG_INFINITY {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(DoubleVisitor)
    }

    struct DoubleVisitor;

    impl Visitor<'_> for DoubleVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("número, \"NaN\", \"Infinity\" ou \"-Infinity\"")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            match value {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => other
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }
}
