//! Enumerações fechadas referenciadas por [`Sample`](crate::types::Sample).
//!
//! Todas seguem a convenção de enum aberto do proto3: o valor `0` é o
//! sentinela "não especificado" e qualquer inteiro desconhecido recebido
//! no fio é mapeado para ele em vez de gerar erro.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Define uma enumeração fechada com nomes proto, mapeamento tolerante de
/// inteiros e serde por nome.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal => $proto:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Todos os membros, na ordem de declaração.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Nome do membro como definido no schema protobuf.
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $($name::$variant => $proto,)+
                }
            }

            /// Resolve um nome protobuf; `None` se não existir.
            pub fn from_str_name(value: &str) -> Option<Self> {
                match value {
                    $($proto => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Converte o inteiro do fio, caindo no sentinela se desconhecido.
            pub fn from_wire(value: i32) -> Self {
                Self::try_from(value).unwrap_or_else(|_| {
                    debug!(
                        "{}: valor desconhecido {} tratado como não especificado",
                        stringify!($name),
                        value
                    );
                    Self::default()
                })
            }

            /// `true` para o sentinela `0`.
            pub fn is_unspecified(&self) -> bool {
                *self as i32 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str_name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str_name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(LenientVisitor::<$name>::new(
                    $name::from_str_name,
                    $name::from_wire,
                ))
            }
        }
    };
}

/// Aceita o nome proto, o nome vazio legado ou o inteiro do fio.
/// Valores desconhecidos viram o sentinela (compatibilidade futura).
struct LenientVisitor<T> {
    by_name: fn(&str) -> Option<T>,
    by_number: fn(i32) -> T,
}

impl<T> LenientVisitor<T> {
    fn new(by_name: fn(&str) -> Option<T>, by_number: fn(i32) -> T) -> Self {
        Self { by_name, by_number }
    }
}

impl<T: Default> Visitor<'_> for LenientVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("nome de enum protobuf ou inteiro")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        Ok((self.by_name)(value).unwrap_or_else(|| {
            if !value.is_empty() {
                debug!("nome de enum desconhecido {value:?} tratado como não especificado");
            }
            T::default()
        }))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        Ok(i32::try_from(value).map_or_else(|_| T::default(), self.by_number))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        Ok(i32::try_from(value).map_or_else(|_| T::default(), self.by_number))
    }

    fn visit_unit<E: de::Error>(self) -> Result<T, E> {
        Ok(T::default())
    }
}

closed_enum! {
    /// Tipo da entidade medida.
    pub enum EntityType {
        Unspecified = 0 => "ENTITY_TYPE_UNSPECIFIED",
        Tariff = 1 => "ENTITY_TYPE_TARIFF",
        Zone = 2 => "ENTITY_TYPE_ZONE",
        Device = 3 => "ENTITY_TYPE_DEVICE",
        Phase = 4 => "ENTITY_TYPE_PHASE",
    }
}

closed_enum! {
    /// Categoria da amostra; determina a unidade implícita do valor.
    pub enum SampleType {
        Unspecified = 0 => "SAMPLE_TYPE_UNSPECIFIED",
        ElectricityConsumption = 1 => "SAMPLE_TYPE_ELECTRICITY_CONSUMPTION",
        ElectricityProduction = 2 => "SAMPLE_TYPE_ELECTRICITY_PRODUCTION",
        GasConsumption = 3 => "SAMPLE_TYPE_GAS_CONSUMPTION",
        Flow = 4 => "SAMPLE_TYPE_FLOW",
        Energy = 5 => "SAMPLE_TYPE_ENERGY",
        HeatDemand = 6 => "SAMPLE_TYPE_HEAT_DEMAND",
        Humidity = 7 => "SAMPLE_TYPE_HUMIDITY",
        Pressure = 8 => "SAMPLE_TYPE_PRESSURE",
        Temperature = 9 => "SAMPLE_TYPE_TEMPERATURE",
        TemperatureSetpoint = 10 => "SAMPLE_TYPE_TEMPERATURE_SETPOINT",
        Time = 11 => "SAMPLE_TYPE_TIME",
        ElectricityVoltage = 12 => "SAMPLE_TYPE_ELECTRICITY_VOLTAGE",
        ElectricityCurrent = 13 => "SAMPLE_TYPE_ELECTRICITY_CURRENT",
        WaterConsumption = 14 => "SAMPLE_TYPE_WATER_CONSUMPTION",
        DistanceTraveled = 15 => "SAMPLE_TYPE_DISTANCE_TRAVELED",
        Availability = 16 => "SAMPLE_TYPE_AVAILABILITY",
        /// Estado de carga da bateria
        BatteryStateOfCharge = 17 => "SAMPLE_TYPE_BATTERY_SOC",
        BatteryChargeRate = 18 => "SAMPLE_TYPE_BATTERY_CHARGE_RATE",
    }
}

closed_enum! {
    /// Como o valor deve ser interpretado.
    pub enum MetricType {
        Unspecified = 0 => "METRIC_TYPE_UNSPECIFIED",
        /// Monotonicamente crescente
        Counter = 1 => "METRIC_TYPE_COUNTER",
        /// Valor instantâneo
        Gauge = 2 => "METRIC_TYPE_GAUGE",
    }
}

impl SampleType {
    /// Unidade convencional do valor para este tipo de amostra.
    ///
    /// Vazio para [`SampleType::Unspecified`].
    pub fn unit(&self) -> &'static str {
        match self {
            SampleType::Unspecified => "",
            SampleType::ElectricityConsumption
            | SampleType::ElectricityProduction
            | SampleType::Energy => "J",
            SampleType::GasConsumption | SampleType::WaterConsumption => "m³",
            SampleType::Flow => "m³/h",
            SampleType::HeatDemand
            | SampleType::Humidity
            | SampleType::Availability
            | SampleType::BatteryStateOfCharge => "%",
            SampleType::Pressure => "Pa",
            SampleType::Temperature | SampleType::TemperatureSetpoint => "°C",
            SampleType::Time => "s",
            SampleType::ElectricityVoltage => "V",
            SampleType::ElectricityCurrent => "A",
            SampleType::DistanceTraveled => "m",
            SampleType::BatteryChargeRate => "W",
        }
    }
}
