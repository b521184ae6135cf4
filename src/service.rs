//! The end-to-end pipeline behind `fetch` and `request`: fetch the body,
//! check it, pick a root name, generate, optionally save, and summarize the
//! outcome in a [`GenerateReport`].
use std::path::PathBuf;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::fetch::{self, FetchConfig};
use crate::inference::Options;
use crate::request::GenerateRequest;
use crate::validate::{is_valid_json_data, validate_request};
use crate::{naming, save};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub requested_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub saved: bool,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateReport {
    fn failure(requested_url: &str, error: &Error) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            requested_url: requested_url.to_string(),
            ..Self::default()
        }
    }
}

pub fn process_request(request: &GenerateRequest, config: &FetchConfig, options: &Options) -> GenerateReport {
    let fetched = validate_request(request)
        .and_then(|()| fetch::fetch_json(&request.fetch_request(), config));
    match fetched {
        Ok(body) => build_report(request, body, options),
        Err(error) => {
            warn!(url = %request.url, %error, "request failed");
            GenerateReport::failure(&request.url, &error)
        }
    }
}

/// Everything after the fetch; split out so it can run on any body.
pub fn build_report(request: &GenerateRequest, body: Value, options: &Options) -> GenerateReport {
    let root_name = non_blank(request.root_type_name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| naming::suggest_root_name(&request.url));

    let types = match types_for(&body, request.json_pointer.as_deref(), &root_name, options) {
        Ok(types) => types,
        Err(error) => {
            warn!(url = %request.url, %error, "type generation failed");
            return GenerateReport::failure(&request.url, &error);
        }
    };

    let file_info = request.save_to_file.then(|| save_types(request, &root_name, &types));
    GenerateReport {
        success: true,
        types: Some(types),
        error: None,
        requested_url: request.url.clone(),
        original_data: Some(body),
        file_info,
    }
}

fn types_for(body: &Value, pointer: Option<&str>, root_name: &str, options: &Options) -> Result<String> {
    if !is_valid_json_data(body) {
        return Err(Error::NotJson);
    }
    // JSON delivered as text (e.g. `text/plain`) is described by its content
    let decoded;
    let data = match body {
        Value::String(text) => {
            decoded = serde_json::from_str::<Value>(text)?;
            &decoded
        }
        other => other,
    };
    crate::generate_with(select(data, pointer)?, root_name, options)
}

/// Resolve an optional JSON Pointer against `value`.
pub fn select<'a>(value: &'a Value, pointer: Option<&str>) -> Result<&'a Value> {
    match pointer {
        None | Some("") => Ok(value),
        Some(p) => value
            .pointer(p)
            .ok_or_else(|| Error::PointerMiss { pointer: p.to_string() }),
    }
}

/// Empty or whitespace-only names count as missing.
fn non_blank(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.trim().is_empty())
}

fn save_types(request: &GenerateRequest, root_name: &str, types: &str) -> FileInfo {
    let file_name = non_blank(request.file_name.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| save::suggest_file_name(&request.url, non_blank(Some(root_name))));
    match save::save_type_file(types, &file_name, request.save_path.as_deref()) {
        Ok(path) => FileInfo { saved: true, file_name, file_path: Some(path), error: None },
        Err(error) => {
            warn!(%error, file_name = %file_name, "saving type definitions failed");
            FileInfo { saved: false, file_name, file_path: None, error: Some(error.to_string()) }
        }
    }
}
