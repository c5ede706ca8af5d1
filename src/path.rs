//! Pure path manipulation; nothing here touches the filesystem.

use std::path::{Path, PathBuf};

/// Splits into parent dir, stem and extension (with its leading dot, or
/// empty).
pub(crate) fn split_name(path: &Path) -> (PathBuf, String, String) {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    (dir, name, ext)
}

/// Inserts `suffix` between the file stem and extension.
///
/// `a.js` with `-min` becomes `a-min.js`.
pub fn suffix(path: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let (dir, name, ext) = split_name(path.as_ref());
    dir.join(format!("{name}{suffix}{ext}"))
}

/// `true` if the extension (without dot) is one of `exts`.
pub fn has_ext(path: impl AsRef<Path>, exts: &[&str]) -> bool {
    let ext = path
        .as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy())
        .unwrap_or_default();
    exts.iter().any(|candidate| *candidate == ext)
}
