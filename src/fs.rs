//! Filesystem helpers used around manifest uploads

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, SwanError};

/// What a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    NotExist,
    File,
    Dir,
    Unknown,
}

/// Contents of a manifest ready to be attached to a multipart request
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

fn read_error(path: &Path, source: std::io::Error) -> SwanError {
    SwanError::ReadFile {
        path: path.to_path_buf(),
        source,
    }
}

pub async fn path_type(path: impl AsRef<Path>) -> PathType {
    match fs::metadata(path.as_ref()).await {
        Err(_) => PathType::NotExist,
        Ok(meta) if meta.is_dir() => PathType::Dir,
        Ok(meta) if meta.is_file() => PathType::File,
        Ok(_) => PathType::Unknown,
    }
}

/// Size in bytes, or `None` when the path cannot be stat'd
pub async fn file_size(path: impl AsRef<Path>) -> Option<u64> {
    fs::metadata(path.as_ref()).await.ok().map(|meta| meta.len())
}

async fn ensure_regular_file(path: &Path) -> Result<()> {
    let meta = fs::metadata(path)
        .await
        .map_err(|source| read_error(path, source))?;

    if !meta.is_file() {
        return Err(SwanError::NotRegularFile {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Read a manifest's base name and full contents.
///
/// The handle is closed before this returns, on success and on error.
pub async fn read_manifest(path: impl AsRef<Path>) -> Result<ManifestFile> {
    let path = path.as_ref();
    ensure_regular_file(path).await?;

    let bytes = fs::read(path)
        .await
        .map_err(|source| read_error(path, source))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| SwanError::NotRegularFile {
            path: path.to_path_buf(),
        })?;

    Ok(ManifestFile { name, bytes })
}

/// Copy a regular file, returning the number of bytes written
pub async fn copy_file(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<u64> {
    let src = src.as_ref();
    ensure_regular_file(src).await?;

    fs::copy(src, dest.as_ref())
        .await
        .map_err(|source| read_error(src, source))
}

pub async fn read_all_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| read_error(path, source))?;

    Ok(contents.lines().map(str::to_string).collect())
}

/// Write each line followed by `\n`, returning the bytes written for the
/// caller to report
pub async fn write_lines(path: impl AsRef<Path>, lines: &[String]) -> Result<usize> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let mut file = fs::File::create(&path)
        .await
        .map_err(|source| read_error(&path, source))?;

    let mut written = 0;
    for line in lines {
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| read_error(&path, source))?;
        file.write_all(b"\n")
            .await
            .map_err(|source| read_error(&path, source))?;
        written += line.len() + 1;
    }
    file.flush()
        .await
        .map_err(|source| read_error(&path, source))?;

    Ok(written)
}
