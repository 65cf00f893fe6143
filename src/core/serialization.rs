//! Stable serde payloads for bootstrapped curves.
//!
//! A [`BootstrapResult`](crate::core::BootstrapResult) and every type it
//! contains derive `Serialize`/`Deserialize`, so a curve can be persisted or
//! shipped to another process without loss. JSON is the human-facing format;
//! MessagePack is the compact transport.
//!
//! # Examples
//! ```rust
//! use opencurve::core::{from_json, from_msgpack, to_json_pretty, to_msgpack};
//! use opencurve::core::{BootstrapMethod, BootstrapResult};
//! use opencurve::curve::bootstrap;
//!
//! let curve = bootstrap(
//!     &[(1.0, 0.045), (2.0, 0.043), (5.0, 0.042)],
//!     &[],
//!     BootstrapMethod::Linear,
//!     "USD",
//! );
//!
//! let json = to_json_pretty(&curve).expect("json serialization");
//! let decoded: BootstrapResult = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, curve);
//!
//! let bytes = to_msgpack(&curve).expect("msgpack serialization");
//! let decoded: BootstrapResult = from_msgpack(&bytes).expect("msgpack deserialization");
//! assert_eq!(decoded, curve);
//! ```

use serde::de::DeserializeOwned;

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Serialize a value to MessagePack bytes.
pub fn to_msgpack<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(value)
}

/// Deserialize a value from MessagePack bytes.
pub fn from_msgpack<T: DeserializeOwned>(payload: &[u8]) -> Result<T, rmp_serde::decode::Error> {
    rmp_serde::from_slice(payload)
}
