use serde::de::DeserializeOwned;
use serde::Serialize;

/// Turns values into stored bytes and back.
///
/// An empty byte string is a legitimate encoding. Implementations that cannot
/// produce any bytes for a value report [`SerializerError::NoOutput`], which
/// the client treats as misuse rather than a transient failure.
pub trait ObjectSerializer: Send + Sync {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SerializerError>;
    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SerializerError {
    #[error("serializer produced no bytes for {0}")]
    NoOutput(&'static str),
    #[error("encode: {0}")]
    Encode(String),
    #[error("decode: {0}")]
    Decode(String),
}

/// JSON via serde_json.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl ObjectSerializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, SerializerError> {
        serde_json::to_vec(value).map_err(|e| SerializerError::Encode(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, SerializerError> {
        serde_json::from_slice(data).map_err(|e| SerializerError::Decode(e.to_string()))
    }
}

/// True when `value` has no content to store (`None`, `()`, unit structs).
pub fn serializes_to_null<T: Serialize + ?Sized>(value: &T) -> bool {
    matches!(serde_json::to_value(value), Ok(serde_json::Value::Null))
}
