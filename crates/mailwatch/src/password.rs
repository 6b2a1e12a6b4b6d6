//! Password file loading.

use std::path::Path;

use anyhow::{Context, bail};

/// Reads the password from `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds only whitespace.
pub async fn read_password(path: &Path) -> anyhow::Result<String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read password file {}", path.display()))?;

    let password = contents.trim();
    if password.is_empty() {
        bail!("No contents found in password file {}", path.display());
    }
    Ok(password.to_string())
}
