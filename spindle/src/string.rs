use crate::error::{DecodeError, EncodeError};
use crate::pool::BufferPool;
use crate::stream::{read_full, read_len, write_len};
use std::io::{Read, Write};

/// Writes the UTF-8 byte count as an int32 followed by the bytes. Returns the number of written
/// bytes.
pub fn serialize_str<W: Write + ?Sized>(value: &str, w: &mut W) -> Result<usize, EncodeError> {
    let c = write_len(value.len(), w)?;
    w.write_all(value.as_bytes())?;
    Ok(c + value.len())
}

pub fn deserialize_string<R: Read + ?Sized>(r: &mut R) -> Result<String, DecodeError> {
    let len = read_len(r)?;
    if len == 0 {
        return Ok(String::new());
    }
    let mut buf = BufferPool::shared().try_rent(len)?;
    read_full(r, &mut buf)?;
    Ok(std::str::from_utf8(&buf)?.to_owned())
}

/// Like [`deserialize_string`] but decodes into `target`, reusing its allocation. On error
/// `target` is left empty.
pub fn deserialize_string_into<R: Read + ?Sized>(r: &mut R, target: &mut String) -> Result<(), DecodeError> {
    let mut bytes = std::mem::take(target).into_bytes();
    bytes.clear();
    let len = read_len(r)?;
    bytes.try_reserve_exact(len)?;
    bytes.resize(len, 0);
    read_full(r, &mut bytes)?;
    *target = String::from_utf8(bytes)?;
    Ok(())
}
