//! Writing generated definitions to disk.
use std::fs;
use std::path::{Path, PathBuf};
use directories::BaseDirs;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::naming;

/// Directory under `$HOME` used when no save path is given.
pub const DEFAULT_SAVE_DIR: &str = "quick-type-types";

const EXTENSION: &str = ".ts";
const FILE_SUFFIX: &str = "Types";
const FALLBACK_FILE_NAME: &str = "ApiTypes";
const WRITE_PROBE_FILE: &str = ".write-test";

/// Where generated files go on this machine, and whether that works.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub platform: String,
    pub home_dir: PathBuf,
    pub default_save_path: PathBuf,
    pub is_writable: bool,
}

pub fn default_save_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_SAVE_DIR))
        .ok_or(Error::NoHomeDir)
}

pub fn system_info() -> Result<SystemInfo> {
    let dirs = BaseDirs::new().ok_or(Error::NoHomeDir)?;
    let home_dir = dirs.home_dir().to_path_buf();
    Ok(SystemInfo {
        platform: std::env::consts::OS.to_string(),
        default_save_path: home_dir.join(DEFAULT_SAVE_DIR),
        is_writable: is_writable(&home_dir),
        home_dir,
    })
}

/// Whether a file can be created (and removed again) inside `dir`.
pub fn is_writable(dir: &Path) -> bool {
    let probe = dir.join(WRITE_PROBE_FILE);
    match fs::write(&probe, "test").and_then(|()| fs::remove_file(&probe)) {
        Ok(()) => true,
        Err(error) => {
            debug!(dir = %dir.display(), %error, "directory is not writable");
            false
        }
    }
}

/// Write `content` to `<save_path or default dir>/<file_name>.ts`, creating
/// the directory when missing. Returns the absolute path written.
pub fn save_type_file(content: &str, file_name: &str, save_path: Option<&Path>) -> Result<PathBuf> {
    let file_name = if file_name.ends_with(EXTENSION) {
        file_name.to_string()
    } else {
        format!("{file_name}{EXTENSION}")
    };
    let dir = match save_path {
        Some(path) => std::path::absolute(path)?,
        None => default_save_dir()?,
    };
    fs::create_dir_all(&dir)?;
    let full_path = dir.join(file_name);
    fs::write(&full_path, content)?;
    info!(path = %full_path.display(), bytes = content.len(), "saved type definitions");
    Ok(full_path)
}

/// `https://host/api/user-list` → `UserListTypes`; otherwise the root type
/// name, otherwise `ApiTypes`.
pub fn suggest_file_name(url: &str, root_type_name: Option<&str>) -> String {
    naming::last_path_segment(url)
        .and_then(|segment| naming::segment_name(&segment))
        .map(|name| format!("{name}{FILE_SUFFIX}"))
        .unwrap_or_else(|| root_type_name.unwrap_or(FALLBACK_FILE_NAME).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_into_new_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a").join("b");
        let path = save_type_file("export type X = number;\n", "users", Some(target.as_path())).unwrap();
        assert!(path.is_absolute());
        assert_eq!(path, target.join("users.ts"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "export type X = number;\n");
    }

    #[test]
    fn keeps_existing_extension_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        save_type_file("old", "users.ts", Some(tmp.path())).unwrap();
        let path = save_type_file("new", "users.ts", Some(tmp.path())).unwrap();
        assert_eq!(path.file_name().unwrap(), "users.ts");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn writable_check_leaves_no_trace() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(is_writable(tmp.path()));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
        assert!(!is_writable(&tmp.path().join("missing")));
    }

    #[test]
    fn system_info_points_at_default_dir() {
        let Ok(info) = system_info() else { return };
        assert_eq!(info.platform, std::env::consts::OS);
        assert_eq!(info.default_save_path, info.home_dir.join(DEFAULT_SAVE_DIR));
        assert_eq!(default_save_dir().unwrap(), info.default_save_path);
        let v = serde_json::to_value(&info).unwrap();
        assert!(v.get("defaultSavePath").is_some());
        assert!(v["isWritable"].is_boolean());
    }

    #[test]
    fn file_name_suggestions() {
        assert_eq!(suggest_file_name("https://x.dev/api/user-list", None), "UserListTypes");
        assert_eq!(suggest_file_name("https://x.dev/", Some("Root")), "Root");
        assert_eq!(suggest_file_name("nope", None), "ApiTypes");
    }
}
