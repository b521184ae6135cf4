//! Infer TypeScript declarations from a single JSON value.
//!
//! ```no_run
//! let body = serde_json::json!({"id": 1, "tags": ["x"], "meta": {"ok": true}});
//! let text = json_tsgen::generate(&body, "Item").unwrap();
//! assert!(text.contains("interface ItemMeta"));
//! ```
pub mod cli;
pub mod codegen;
pub mod error;
pub mod fetch;
pub mod inference;
pub mod ir;
pub mod naming;
pub mod path_de;
pub mod request;
pub mod save;
pub mod service;
pub mod validate;

use serde_json::Value;
use tracing::warn;

pub use error::{Error, Result};
pub use inference::{DateStrings, Options};
pub use naming::{suggest_root_name, DEFAULT_ROOT_NAME};
pub use validate::is_valid_json_data;

/// Render the declarations describing `value`, bound to `root_name`.
pub fn generate(value: &Value, root_name: &str) -> Result<String> {
    generate_with(value, root_name, &Options::default())
}

pub fn generate_with(value: &Value, root_name: &str, options: &Options) -> Result<String> {
    if value.is_null() {
        return Err(Error::InvalidInput("no data provided for type generation".into()));
    }
    let root_name = naming::root_type_name(root_name);
    let inferred = inference::infer_root(value, &root_name, options);
    codegen::render(&inferred.declarations, &root_name, &inferred.root)
        .inspect_err(|error| warn!(%error, "type generation failed"))
}
