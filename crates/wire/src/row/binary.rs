//! Default binary row format
//!
//! ```text
//! +---------+-------------+------------------------------------------+---------+
//! | version | field count | field 0 .. field N-1 (ascending by name) | crc32   |
//! | u8      | u16 BE      | u16 BE name len | name | u32 BE val len | u32 BE  |
//! |         |             |                 | UTF-8| value bytes    |         |
//! +---------+-------------+------------------------------------------+---------+
//! ```
//!
//! The CRC32 covers every byte before the trailer. Field order is canonical,
//! so equal maps always encode to identical rows.

use super::error::CodecError;
use super::RowCodec;
use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use recordstore_core::{selects, FieldMap};

/// Current row format version.
pub const ROW_FORMAT_VERSION: u8 = 1;

const HEADER_SIZE: usize = 1 + 2;
const TRAILER_SIZE: usize = 4;

/// Self-describing binary row codec with a CRC32 trailer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryRowCodec;

impl BinaryRowCodec {
    /// Create a codec.
    pub fn new() -> Self {
        Self
    }
}

fn take<'a>(rest: &mut &'a [u8], len: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
    if rest.len() < len {
        return Err(CodecError::Truncated(what));
    }
    let (head, tail) = rest.split_at(len);
    *rest = tail;
    Ok(head)
}

impl RowCodec for BinaryRowCodec {
    fn encode(&self, buf: &mut Vec<u8>, fields: &FieldMap) -> Result<(), CodecError> {
        if fields.len() > u16::MAX as usize {
            return Err(CodecError::TooManyFields(fields.len()));
        }

        let mut entries: Vec<(&String, &Vec<u8>)> = fields.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut body = 0usize;
        for (name, value) in &entries {
            if name.len() > u16::MAX as usize {
                return Err(CodecError::FieldNameTooLong(name.len()));
            }
            if value.len() > u32::MAX as usize {
                return Err(CodecError::ValueTooLong {
                    name: (*name).clone(),
                    len: value.len(),
                });
            }
            body += 2 + name.len() + 4 + value.len();
        }

        let start = buf.len();
        buf.reserve(HEADER_SIZE + body + TRAILER_SIZE);
        buf.write_u8(ROW_FORMAT_VERSION)?;
        buf.write_u16::<BigEndian>(entries.len() as u16)?;
        for (name, value) in entries {
            buf.write_u16::<BigEndian>(name.len() as u16)?;
            buf.extend_from_slice(name.as_bytes());
            buf.write_u32::<BigEndian>(value.len() as u32)?;
            buf.extend_from_slice(value);
        }

        let crc = crc32fast::hash(&buf[start..]);
        buf.write_u32::<BigEndian>(crc)?;
        Ok(())
    }

    fn decode(&self, row: &[u8], fields: Option<&[&str]>) -> Result<FieldMap, CodecError> {
        if row.len() < HEADER_SIZE + TRAILER_SIZE {
            return Err(CodecError::Truncated("header"));
        }

        let (payload, trailer) = row.split_at(row.len() - TRAILER_SIZE);
        let stored = BigEndian::read_u32(trailer);
        let computed = crc32fast::hash(payload);
        if stored != computed {
            return Err(CodecError::ChecksumMismatch { stored, computed });
        }

        let mut rest = payload;
        let version = rest.read_u8()?;
        if version != ROW_FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let count = rest.read_u16::<BigEndian>()? as usize;

        let capacity = match fields {
            Some(names) if !names.is_empty() => names.len().min(count),
            _ => count,
        };
        let mut map = FieldMap::with_capacity(capacity);
        let mut previous: Option<&str> = None;

        for _ in 0..count {
            let name_len = BigEndian::read_u16(take(&mut rest, 2, "field name length")?) as usize;
            let name = std::str::from_utf8(take(&mut rest, name_len, "field name")?)
                .map_err(|_| CodecError::InvalidFieldName)?;
            let value_len = BigEndian::read_u32(take(&mut rest, 4, "value length")?) as usize;
            let value = take(&mut rest, value_len, "value")?;

            if previous.map_or(false, |prev| prev >= name) {
                return Err(CodecError::FieldOrder(name.to_owned()));
            }
            previous = Some(name);

            if selects(fields, name) {
                map.insert(name.to_owned(), value.to_vec());
            }
        }

        if !rest.is_empty() {
            return Err(CodecError::TrailingBytes(rest.len()));
        }
        Ok(map)
    }
}
