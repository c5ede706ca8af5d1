//! Async filesystem helpers with not-found folded into the return value.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::path::split_name;

/// `true` if something exists at `path`.
///
/// Not-found is `Ok(false)`; any other error (permissions, I/O) propagates.
pub async fn path_exists(path: impl AsRef<Path>) -> io::Result<bool> {
    match fs::metadata(path.as_ref()).await {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Reads a whole file, `Ok(None)` when it does not exist.
pub async fn input_file(path: impl AsRef<Path>) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path.as_ref()).await {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Like [`input_file`], decoded as UTF-8.
pub async fn input_file_to_string(path: impl AsRef<Path>) -> io::Result<Option<String>> {
    match fs::read_to_string(path.as_ref()).await {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Writes `contents`, creating missing parent directories first.
pub async fn output_file(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, contents).await
}

/// Returns `path` if free, else the first free `name (N).ext` beside it.
pub async fn gen_unique_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();
    let (dir, name, ext) = split_name(path);
    let mut candidate = path.to_path_buf();
    let mut index = 1u32;
    while path_exists(&candidate).await? {
        candidate = dir.join(format!("{name} ({index}){ext}"));
        index += 1;
    }
    Ok(candidate)
}
