use crate::DatasetError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

const ZSTD_LEVEL: i32 = 9;

/// Serializes `value` as JSON, compresses it with zstd and encodes the
/// result as base64 text suitable for a string attribute.
pub fn encode_blob<T: Serialize>(value: &T) -> Result<String, DatasetError> {
    let json = serde_json::to_vec(value)?;
    let compressed = zstd::encode_all(json.as_slice(), ZSTD_LEVEL)?;
    Ok(STANDARD.encode(compressed))
}

pub fn decode_blob<T: DeserializeOwned>(text: &str) -> Result<T, DatasetError> {
    let compressed = STANDARD
        .decode(text.trim())
        .map_err(|err| DatasetError::Blob(err.to_string()))?;
    let json = zstd::decode_all(compressed.as_slice())
        .map_err(|err| DatasetError::Blob(err.to_string()))?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blob_restores_value() {
        let value = json!({"wavelength": {"value": 0.55}, "ground": {"reflectance": 0.1}});
        let text = encode_blob(&value).unwrap();
        assert!(!text.contains('{'));
        let restored: serde_json::Value = decode_blob(&text).unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = decode_blob::<serde_json::Value>("not base64!").unwrap_err();
        assert!(matches!(err, DatasetError::Blob(_)));
    }
}
