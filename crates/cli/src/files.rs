//! Output file naming and writing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use orq_core::HttpMethod;

/// `get`, `/pet/{petId}` -> `get/pet/{petId}.ts`
pub fn generate_file_name(method: HttpMethod, api_path: &str) -> String {
    let clean = api_path.strip_prefix('/').unwrap_or(api_path);
    format!("{}/{clean}.ts", method.as_str())
}

/// `{output}/{spec}/{method}/{path}.ts`
pub fn generate_full_path(output: &Path, spec_name: &str, method: HttpMethod, api_path: &str) -> PathBuf {
    output
        .join(spec_name)
        .join(generate_file_name(method, api_path))
}

/// Write `content`, creating parent directories as needed.
pub async fn write_file_safe(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}

/// Remove `path`. Returns `false` if it did not exist.
pub async fn remove_file_safe(path: &Path) -> std::io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
