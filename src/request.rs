//! Request documents: the JSON description of "fetch this, name it that,
//! maybe save it" accepted by the `request` command.
//!
//! ```json
//! { "url": "https://api.example.com/users", "method": "GET",
//!   "headers": {"Authorization": "Bearer ..."}, "rootTypeName": "Users",
//!   "saveToFile": true, "savePath": "./types" }
//! ```
use std::path::{Path, PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fetch::{FetchRequest, HttpMethod};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
    pub root_type_name: Option<String>,
    #[serde(default)]
    pub save_to_file: bool,
    pub file_name: Option<String>,
    pub save_path: Option<PathBuf>,
    /// JSON Pointer selecting the part of the response to describe.
    pub json_pointer: Option<String>,
}

impl GenerateRequest {
    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            url: self.url.clone(),
            method: self.method,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

pub fn parse_request(src: &str) -> Result<GenerateRequest> {
    crate::path_de::from_str_with_path(src)
}

pub fn load_request(path: &Path) -> Result<GenerateRequest> {
    let src = std::fs::read_to_string(path)?;
    parse_request(&src)
}
