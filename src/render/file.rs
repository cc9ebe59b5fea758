//! Output files replaced in one step.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Write `path` through a temporary file in the same directory, then rename
/// it over `path`.
///
/// Readers only ever see a complete file, and two writers of the same path
/// leave one of their outputs intact instead of an interleaving of both.
pub(crate) fn write_atomic<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(BufWriter<&mut File>) -> Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(BufWriter::new(tmp.as_file_mut()))?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
