use crate::error::DataError;
use indexmap::IndexSet;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::info;

/// Read one entry per line, trimming whitespace, skipping blank lines and collapsing
/// duplicates while keeping first-seen order.
pub fn read_lines<R: BufRead>(reader: R) -> Result<IndexSet<String>, DataError> {
    let mut entries = IndexSet::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        entries.insert(trimmed.to_string());
    }

    Ok(entries)
}

/// Open `path` and [`read_lines`] from it. A missing or unreadable file is a
/// [`DataError::Configuration`].
pub fn read_list_file(path: impl AsRef<Path>) -> Result<IndexSet<String>, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|error| {
        DataError::Configuration(format!("failed to open {}: {error}", path.display()))
    })?;

    let entries = read_lines(BufReader::new(file))?;
    info!(path = %path.display(), entries = entries.len(), "loaded input list");
    Ok(entries)
}
