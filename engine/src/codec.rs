//! Record encoding for the byte-oriented store.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::EngineError;

pub fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>, EngineError> {
    bincode::serialize(record).map_err(|e| EngineError::Codec(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, EngineError> {
    bincode::deserialize(bytes).map_err(|e| EngineError::Codec(e.to_string()))
}
