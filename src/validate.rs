//! Pre-flight checks run by callers before handing data to the generator.
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::request::GenerateRequest;

/// True when `data` is usable as generator input: a string that parses as
/// JSON, or an object/array that serializes. Scalars and `null` are not.
pub fn is_valid_json_data(data: &Value) -> bool {
    match data {
        Value::String(text) => serde_json::from_str::<Value>(text).is_ok(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(data).is_ok(),
        _ => false,
    }
}

pub fn validate_request(request: &GenerateRequest) -> Result<()> {
    if request.url.trim().is_empty() {
        return Err(Error::InvalidRequest("URL is required".into()));
    }
    if Url::parse(&request.url).is_err() {
        return Err(Error::InvalidRequest("Invalid URL format".into()));
    }
    if let Some(pointer) = request.json_pointer.as_deref() {
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(Error::InvalidRequest(format!("JSON pointer must start with '/': {pointer}")));
        }
    }
    if request.save_to_file {
        if let Some(name) = request.file_name.as_deref() {
            if name.trim().is_empty() {
                return Err(Error::InvalidRequest("File name must not be empty".into()));
            }
        }
    }
    Ok(())
}
