//! JSON codecs for parameter persistence.
//!
//! Saving a plasm needs to turn user-supplied parameter values into JSON and
//! back. The table is keyed by element type; the common primitive types are
//! pre-registered, and embedders register their own parameter types with
//! [`register`].

use crate::error::{Error, Result};
use crate::types::{Datum, TypeDesc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::OnceLock;

type EncodeFn = fn(&Datum) -> Result<serde_json::Value>;
type DecodeFn = fn(&serde_json::Value) -> Result<Datum>;

struct CodecEntry {
    encode: EncodeFn,
    decode: DecodeFn,
}

fn table() -> &'static DashMap<u64, CodecEntry> {
    static TABLE: OnceLock<DashMap<u64, CodecEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let table = DashMap::new();
        macro_rules! builtin {
            ($($ty:ty),* $(,)?) => {
                $(insert::<$ty>(&table);)*
            };
        }
        builtin!(bool, i32, i64, u32, u64, usize, f32, f64, String, serde_json::Value);
        table
    })
}

fn encode_as<T: Serialize + 'static>(datum: &Datum) -> Result<serde_json::Value> {
    let value = datum
        .downcast_ref::<T>()
        .ok_or_else(|| Error::Serialization {
            cause: format!("codec invoked on foreign type {}", datum.desc()),
        })?;
    serde_json::to_value(value).map_err(|e| Error::Serialization {
        cause: e.to_string(),
    })
}

fn decode_as<T>(value: &serde_json::Value) -> Result<Datum>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let value: T = serde_json::from_value(value.clone()).map_err(|e| Error::Serialization {
        cause: e.to_string(),
    })?;
    Ok(Datum::new(value))
}

fn insert<T>(table: &DashMap<u64, CodecEntry>)
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    table.insert(
        TypeDesc::of::<T>().hash_value(),
        CodecEntry {
            encode: encode_as::<T>,
            decode: decode_as::<T>,
        },
    );
}

/// Register a codec for a parameter type, so plasms using it can be saved
/// and loaded.
pub fn register<T>()
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    insert::<T>(table());
}

/// Whether a codec is registered for this element type.
#[must_use]
pub fn has_codec(desc: TypeDesc) -> bool {
    table().contains_key(&desc.hash_value())
}

/// Encode a datum to JSON, or `None` when its type has no codec.
pub fn encode(datum: &Datum) -> Option<Result<serde_json::Value>> {
    table()
        .get(&datum.desc().hash_value())
        .map(|entry| (entry.encode)(datum))
}

/// Decode a JSON value into a datum of the given element type, or `None`
/// when the type has no codec.
pub fn decode(desc: TypeDesc, value: &serde_json::Value) -> Option<Result<Datum>> {
    table()
        .get(&desc.hash_value())
        .map(|entry| (entry.decode)(value))
}
