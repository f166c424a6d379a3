//! Instante UTC decomposto em segundos + nanossegundos desde a época Unix.
//!
//! Mesma decomposição do `google.protobuf.Timestamp`, sem perda de precisão
//! para datas distantes. Na forma textual vira uma string RFC 3339.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Maior valor válido de `nanos`.
pub const MAX_NANOS: i32 = 999_999_999;

/// Instante UTC (`seconds` com sinal, `nanos` em `0..=999_999_999`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    /// 1970-01-01T00:00:00Z, também o valor de um campo ausente no fio.
    pub const UNIX_EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn is_valid(&self) -> bool {
        (0..=MAX_NANOS).contains(&self.nanos)
    }

    pub fn is_epoch(&self) -> bool {
        *self == Self::UNIX_EPOCH
    }

    /// `None` se o instante não for válido ou estiver fora do alcance do chrono.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        if !self.is_valid() {
            return None;
        }
        DateTime::from_timestamp(self.seconds, self.nanos as u32)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self {
            seconds: datetime.timestamp(),
            nanos: datetime.timestamp_subsec_nanos() as i32,
        }
    }
}

impl From<prost_types::Timestamp> for Timestamp {
    fn from(timestamp: prost_types::Timestamp) -> Self {
        Self {
            seconds: timestamp.seconds,
            nanos: timestamp.nanos,
        }
    }
}

impl From<Timestamp> for prost_types::Timestamp {
    fn from(timestamp: Timestamp) -> Self {
        Self {
            seconds: timestamp.seconds,
            nanos: timestamp.nanos,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => f.write_str(&datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => write!(f, "{}s+{}ns", self.seconds, self.nanos),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let datetime = self.to_datetime().ok_or_else(|| {
            <S::Error as serde::ser::Error>::custom(format!(
                "timestamp fora do intervalo representável: {}s {}ns",
                self.seconds, self.nanos
            ))
        })?;
        serializer.serialize_str(&datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|datetime| Self::from(datetime.with_timezone(&Utc)))
            .map_err(|e| de::Error::custom(format!("timestamp RFC 3339 inválido {text:?}: {e}")))
    }
}
