use crate::codec::bits::BitSequence;
use crate::foundation::error::{BitreelError, BitreelResult};

/// Sentinel that opens every framed record.
///
/// The leading `0xF1` is not valid UTF-8 on its own and the `\r\n\x1A` tail trips up text-mode
/// mangling, so ordinary text never starts with this pattern. Binary content may still contain
/// it; that is harmless because content is skipped by length, never scanned.
pub const RECORD_MAGIC: [u8; 8] = [0xF1, b'F', b'I', b'L', b'E', 0x0D, 0x0A, 0x1A];

const NAME_LEN_BYTES: usize = 2;
const CONTENT_LEN_BYTES: usize = 8;

/// Fixed part of a record header (sentinel plus both length fields), excluding the name.
pub const RECORD_HEADER_FIXED_LEN: usize = RECORD_MAGIC.len() + NAME_LEN_BYTES + CONTENT_LEN_BYTES;

/// One named file travelling through the codec.
///
/// Produced by the archive reader on encode and by [`demux_records`] on decode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArchiveEntry {
    /// Entry name (path inside the archive).
    pub name: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    /// Create an entry.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Check that the entry can be framed.
    pub fn validate(&self) -> BitreelResult<()> {
        if self.name.is_empty() {
            return Err(BitreelError::invalid_entry("entry name must be non-empty"));
        }
        if self.name.len() > usize::from(u16::MAX) {
            return Err(BitreelError::invalid_entry(format!(
                "entry name is {} bytes, limit is {}",
                self.name.len(),
                u16::MAX
            )));
        }
        if u64::try_from(self.content.len()).is_err() {
            return Err(BitreelError::ContentTooLarge {
                name: self.name.clone(),
                len: self.content.len(),
            });
        }
        Ok(())
    }

    /// Bytes this entry occupies once framed.
    pub fn framed_len(&self) -> usize {
        RECORD_HEADER_FIXED_LEN + self.name.len() + self.content.len()
    }
}

/// Append the framed form of `entry` to `out`.
///
/// Layout: `MAGIC | name_len: u16 BE | name | content_len: u64 BE | content`.
pub fn write_record(out: &mut Vec<u8>, entry: &ArchiveEntry) -> BitreelResult<()> {
    entry.validate()?;
    let name_len = u16::try_from(entry.name.len())
        .map_err(|_| BitreelError::invalid_entry("entry name length overflow"))?;
    let content_len =
        u64::try_from(entry.content.len()).map_err(|_| BitreelError::ContentTooLarge {
            name: entry.name.clone(),
            len: entry.content.len(),
        })?;

    out.extend_from_slice(&RECORD_MAGIC);
    out.extend_from_slice(&name_len.to_be_bytes());
    out.extend_from_slice(entry.name.as_bytes());
    out.extend_from_slice(&content_len.to_be_bytes());
    out.extend_from_slice(&entry.content);
    Ok(())
}

/// Frame every entry, in input order, into one byte stream.
pub fn assemble_records(entries: &[ArchiveEntry]) -> BitreelResult<Vec<u8>> {
    let total = entries.iter().map(ArchiveEntry::framed_len).sum();
    let mut out = Vec::with_capacity(total);
    for entry in entries {
        write_record(&mut out, entry)?;
    }
    Ok(out)
}

/// Frame every entry and expand the result to bits (MSB first).
#[tracing::instrument(skip(entries), fields(entries = entries.len()))]
pub fn assemble_bits(entries: &[ArchiveEntry]) -> BitreelResult<BitSequence> {
    let bytes = assemble_records(entries)?;
    tracing::debug!(bytes = bytes.len(), "assembled records");
    Ok(BitSequence::from_bytes(bytes))
}

/// Split a reassembled byte stream back into entries.
///
/// The stream must be a concatenation of whole records; an empty stream yields no entries.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn demux_records(bytes: &[u8]) -> BitreelResult<Vec<ArchiveEntry>> {
    let mut cursor = RecordCursor { bytes, offset: 0 };
    let mut entries = Vec::new();
    while !cursor.is_at_end() {
        entries.push(cursor.read_record()?);
    }
    tracing::debug!(entries = entries.len(), "demultiplexed records");
    Ok(entries)
}

struct RecordCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> RecordCursor<'a> {
    fn is_at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, n: u64) -> BitreelResult<&'a [u8]> {
        let remaining = self.remaining();
        let len = match usize::try_from(n) {
            Ok(len) if len <= remaining => len,
            _ => {
                return Err(BitreelError::TruncatedRecord {
                    offset: self.offset,
                    needed: n,
                    remaining,
                });
            }
        };
        let out = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(out)
    }

    fn read_magic(&mut self) -> BitreelResult<()> {
        let start = self.offset;
        let avail = self.remaining().min(RECORD_MAGIC.len());
        // A short tail that still agrees with the sentinel is a cut-off header, anything else is
        // not a header at all.
        if self.bytes[start..start + avail] != RECORD_MAGIC[..avail] {
            return Err(BitreelError::MissingHeader { offset: start });
        }
        self.take(RECORD_MAGIC.len() as u64)?;
        Ok(())
    }

    fn read_record(&mut self) -> BitreelResult<ArchiveEntry> {
        self.read_magic()?;

        let name_len = u16::from_be_bytes(
            self.take(NAME_LEN_BYTES as u64)?
                .try_into()
                .map_err(|_| BitreelError::invalid_entry("name length field"))?,
        );
        let name_offset = self.offset;
        let name_bytes = self.take(u64::from(name_len))?;
        if name_bytes.is_empty() {
            return Err(BitreelError::invalid_entry(format!(
                "empty entry name in record at byte offset {name_offset}"
            )));
        }
        let name = std::str::from_utf8(name_bytes)
            .map_err(|e| {
                BitreelError::invalid_entry(format!(
                    "entry name at byte offset {name_offset} is not UTF-8: {e}"
                ))
            })?
            .to_owned();

        let content_len = u64::from_be_bytes(
            self.take(CONTENT_LEN_BYTES as u64)?
                .try_into()
                .map_err(|_| BitreelError::invalid_entry("content length field"))?,
        );
        let content = self.take(content_len)?.to_vec();

        Ok(ArchiveEntry { name, content })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/record.rs"]
mod tests;
