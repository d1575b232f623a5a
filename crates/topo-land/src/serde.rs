use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use topo_core::errors::{ErrorInfo, TopoError};

fn serde_error(code: &str, err: impl ToString) -> TopoError {
    TopoError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn path_error(code: &str, path: &Path, err: impl ToString) -> TopoError {
    TopoError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Rebuilds every object with its keys in lexical order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .collect::<Map<_, _>>(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Serializes a value into compact JSON bytes with sorted keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, TopoError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    serde_json::to_vec(&sort_keys(value)).map_err(|err| serde_error("json-write", err))
}

/// Writes the canonical JSON form of `value` to `path`, creating parent directories.
pub fn write_canonical_json<T: Serialize>(path: &Path, value: &T) -> Result<(), TopoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| path_error("json-mkdir", parent, err))?;
    }
    let bytes = to_canonical_json_bytes(value)?;
    fs::write(path, bytes).map_err(|err| path_error("json-file-write", path, err))
}

/// Reads a JSON file written by [`write_canonical_json`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, TopoError> {
    let bytes = fs::read(path).map_err(|err| path_error("json-read", path, err))?;
    serde_json::from_slice(&bytes).map_err(|err| path_error("json-parse", path, err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, TopoError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml-serialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, TopoError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml-deserialize", err))
}

/// Hex SHA-256 of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, TopoError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
