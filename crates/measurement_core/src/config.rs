//! Configuração unificada via TOML.
//!
//! Um único `measurement.toml` ao lado do executável, todas as seções opcionais.

use crate::protocol::DEFAULT_MAX_MESSAGE_BYTES;
use crate::text::TextFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Limites do codec binário.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Tamanho máximo de um registro codificado (bytes)
    pub max_message_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

/// Saída textual.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Formato: "json" ou "yaml"
    pub format: TextFormat,
    /// JSON indentado
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: TextFormat::Json,
            pretty: true,
        }
    }
}

/// Configuração raiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub codec: CodecConfig,
    pub output: OutputConfig,
}

/// Erros ao salvar a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro ao serializar configuração: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Nome do arquivo procurado ao lado do executável.
pub const CONFIG_FILE_NAME: &str = "measurement.toml";

impl AppConfig {
    /// Interpreta um documento TOML; seções ausentes ficam no padrão.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Lê `path`; cai no padrão se o arquivo faltar ou não for TOML válido.
    pub fn load(path: &Path) -> Self {
        let config = match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    info!("Config do codec/saída lida de {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("{} ignorado, TOML inválido: {}", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} não existe, usando limites padrão", path.display());
                AppConfig::default()
            }
            Err(e) => {
                warn!("{} ignorado, falha de leitura: {}", path.display(), e);
                AppConfig::default()
            }
        };

        debug!(
            "codec: max {} bytes por registro; saída: {}{}",
            config.codec.max_message_bytes,
            config.output.format,
            if config.output.pretty { " indentada" } else { "" }
        );
        config
    }

    /// Grava o TOML completo (todas as seções) em `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Config padrão gravada em {}", path.display());
        Ok(())
    }

    /// `measurement.toml` no diretório do executável, ou no diretório
    /// corrente se ele não puder ser determinado.
    pub fn default_path() -> PathBuf {
        let dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(CONFIG_FILE_NAME)
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.codec.max_message_bytes == 0 {
            errors.push("Limite max_message_bytes não pode ser 0".into());
        }

        errors
    }
}
