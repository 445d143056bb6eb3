use calc_core::errors::{CalcError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};

fn serde_error(code: &str, err: impl ToString) -> CalcError {
    CalcError::Serde(ErrorInfo::new(format!("calc_ci.{code}"), err.to_string()))
}

/// Serializes a value into pretty-printed JSON.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, CalcError> {
    serde_json::to_string_pretty(value).map_err(|err| serde_error("json_serialize", err))
}

/// Serializes a value into YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, CalcError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml_serialize", err))
}

/// Deserializes a YAML document into the requested type.
pub fn from_yaml_str<T: DeserializeOwned>(data: &str) -> Result<T, CalcError> {
    serde_yaml::from_str(data).map_err(|err| serde_error("yaml_deserialize", err))
}
