//! Representação textual (JSON / YAML) para depuração e APIs legíveis.
//!
//! As chaves são os nomes dos campos do schema, enums usam os nomes proto
//! e o instante é RFC 3339. Não é formato de fio: o round trip é por valor,
//! não byte a byte.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Formato textual suportado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    #[default]
    Json,
    Yaml,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Json => "json",
            TextFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextFormat {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(TextFormat::Json),
            "yaml" | "yml" => Ok(TextFormat::Yaml),
            other => Err(TextError::UnknownFormat(other.to_string())),
        }
    }
}

/// Erros da representação textual.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Erro JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Formato desconhecido: {0:?} (suportados: json, yaml)")]
    UnknownFormat(String),
}

/// Serializa um valor no formato pedido. `pretty` só afeta JSON.
pub fn to_text<T: Serialize>(value: &T, format: TextFormat, pretty: bool) -> Result<String, TextError> {
    let text = match format {
        TextFormat::Json if pretty => serde_json::to_string_pretty(value)?,
        TextFormat::Json => serde_json::to_string(value)?,
        TextFormat::Yaml => serde_yaml::to_string(value)?,
    };
    Ok(text)
}

pub fn from_text<T: DeserializeOwned>(text: &str, format: TextFormat) -> Result<T, TextError> {
    let value = match format {
        TextFormat::Json => serde_json::from_str(text)?,
        TextFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(value)
}
