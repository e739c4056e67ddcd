//! Zip container boundary: the only place archive bytes are parsed or produced.

use std::io::{Cursor, Read as _, Write as _};

use crate::codec::record::ArchiveEntry;
use crate::foundation::error::{BitreelError, BitreelResult};

/// Read every file entry of a zip blob, in archive order.
///
/// Directory entries are skipped. Any zip-level failure is reported as
/// [`BitreelError::CorruptArchive`].
#[tracing::instrument(skip(blob), fields(bytes = blob.len()))]
pub fn read_zip_entries(blob: &[u8]) -> BitreelResult<Vec<ArchiveEntry>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(blob))
        .map_err(|e| BitreelError::corrupt_archive(e.to_string()))?;

    let mut entries = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut file = archive
            .by_index(idx)
            .map_err(|e| BitreelError::corrupt_archive(format!("entry #{idx}: {e}")))?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_owned();
        let mut content = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut content)
            .map_err(|e| BitreelError::corrupt_archive(format!("entry '{name}': {e}")))?;
        entries.push(ArchiveEntry { name, content });
    }
    tracing::debug!(entries = entries.len(), "read zip entries");
    Ok(entries)
}

/// Write `entries` into a new deflated zip blob, in order.
#[tracing::instrument(skip(entries), fields(entries = entries.len()))]
pub fn write_zip_entries(entries: &[ArchiveEntry]) -> BitreelResult<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .large_file(entries.iter().any(|e| e.content.len() >= u32::MAX as usize));

    for entry in entries {
        writer
            .start_file(entry.name.as_str(), options)
            .map_err(|e| anyhow::anyhow!("start zip entry '{}': {e}", entry.name))?;
        writer
            .write_all(&entry.content)
            .map_err(|e| anyhow::anyhow!("write zip entry '{}': {e}", entry.name))?;
    }
    let cursor = writer
        .finish()
        .map_err(|e| anyhow::anyhow!("finish zip archive: {e}"))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
#[path = "../tests/unit/archive/zip.rs"]
mod tests;
