//! Mensagens protobuf com os números de campo permanentes.
//!
//! Equivalente ao schema:
//!
//! ```text
//! message Sample {
//!   EntityType entity_type = 1;
//!   string     entity_name = 2;
//!   SampleType sample_type = 3;
//!   string     sample_name = 4;
//!   MetricType metric_type = 5;
//!   double     value       = 6;
//! }
//!
//! message Measurement {
//!   string                    id               = 1;
//!   string                    source           = 2;
//!   string                    location         = 3;
//!   repeated Sample           samples          = 4;
//!   google.protobuf.Timestamp measured_at_time = 5;
//! }
//! ```
//!
//! Os números de campo NÃO podem ser reatribuídos: quebraria a
//! compatibilidade com produtores/consumidores existentes.
//! Enums ficam como `i32` cru, como no proto3; a conversão para os tipos
//! de domínio acontece em [`crate::protocol`].

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SampleMessage {
    #[prost(enumeration = "crate::enums::EntityType", tag = "1")]
    pub entity_type: i32,
    #[prost(string, tag = "2")]
    pub entity_name: ::prost::alloc::string::String,
    #[prost(enumeration = "crate::enums::SampleType", tag = "3")]
    pub sample_type: i32,
    #[prost(string, tag = "4")]
    pub sample_name: ::prost::alloc::string::String,
    #[prost(enumeration = "crate::enums::MetricType", tag = "5")]
    pub metric_type: i32,
    /// Presença pelo padrão de bits: `-0.0` é emitido, `+0.0` não.
    #[prost(double, optional, tag = "6")]
    pub value: ::core::option::Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MeasurementMessage {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub source: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub location: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "4")]
    pub samples: ::prost::alloc::vec::Vec<SampleMessage>,
    #[prost(message, optional, tag = "5")]
    pub measured_at_time: ::core::option::Option<::prost_types::Timestamp>,
}
