//! Loosely-typed document values to homogeneous string lists

use toml::Value;

use crate::error::CoercionError;

/// Convert an array of strings into `Vec<String>`.
///
/// Fails on a non-array value, or names the index of the first element that
/// is not a string.
pub fn to_text_sequence(value: &Value) -> Result<Vec<String>, CoercionError> {
    let items = value.as_array().ok_or(CoercionError::NotASequence {
        actual: value.type_str(),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(CoercionError::NotText {
                index,
                actual: other.type_str(),
            }),
        })
        .collect()
}
