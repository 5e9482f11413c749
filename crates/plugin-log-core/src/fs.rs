//! Blocking filesystem primitives. Every function here can fail; callers in
//! [`writer`](crate::writer) decide what happens to the error.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{LogError, LogResult};

/// Create `dir` and any missing parents. No-op if it already exists.
pub fn ensure_dir(dir: &Path) -> LogResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| LogError::create_dir(dir, e))
}

/// Open `path` for append (creating it), write `line` plus a newline in one
/// call, close.
pub fn append_line(path: &Path, line: &str) -> LogResult<()> {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LogError::write(path, e))?;
    file.write_all(buf.as_bytes())
        .map_err(|e| LogError::write(path, e))
}

/// Create or truncate `path` with `contents`.
pub fn write_file(path: &Path, contents: &str) -> LogResult<()> {
    std::fs::write(path, contents).map_err(|e| LogError::write(path, e))
}
