use camino::Utf8Path;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing content was byte-identical; the file was not touched.
    Unchanged,
}

/// Write `contents` unless the file already holds exactly these bytes.
///
/// Creates missing parent directories.
pub fn write_if_changed(path: &Utf8Path, contents: &[u8]) -> io::Result<WriteOutcome> {
    match std::fs::read(path) {
        Ok(existing) if existing == contents => return Ok(WriteOutcome::Unchanged),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(WriteOutcome::Written)
}
