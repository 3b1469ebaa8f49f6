use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use crate::error::AppError;
use crate::models::page::{build_pages, PageSet};

/// Lists the regular files of a directory, sorted by name
pub async fn list_image_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let exists = fs::try_exists(folder)
        .await
        .with_context(|| format!("failed to check folder: {}", folder.display()))?;
    if !exists {
        return Err(AppError::directory_not_found(folder).into());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(folder)
        .await
        .with_context(|| format!("failed to read folder: {}", folder.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Lists a directory and groups its images into pages
pub async fn load_pages(folder: &Path) -> Result<PageSet> {
    let files = list_image_files(folder).await?;
    tracing::info!("found {} file(s) in {}", files.len(), folder.display());
    Ok(build_pages(files))
}
