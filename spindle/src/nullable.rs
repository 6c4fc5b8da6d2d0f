//! Optional values are prefixed by a one byte presence flag. Encoders write 1 for present and 0
//! for absent; decoders treat any nonzero flag as present. The payload follows only if present.

use crate::error::{DecodeError, EncodeError};
use crate::primitive;
use std::io::{Read, Write};

pub fn write_presence<W: Write + ?Sized>(present: bool, w: &mut W) -> Result<usize, EncodeError> {
    primitive::serialize(present as u8, w)
}

pub fn read_presence<R: Read + ?Sized>(r: &mut R) -> Result<bool, DecodeError> {
    Ok(primitive::deserialize::<u8, _>(r)? != 0)
}

/// Writes the presence flag and, if `value` is `Some`, the payload through `f`.
pub fn serialize_nullable<T, W, F>(value: Option<&T>, w: &mut W, f: F) -> Result<usize, EncodeError>
where
    T: ?Sized,
    W: Write + ?Sized,
    F: FnOnce(&T, &mut W) -> Result<usize, EncodeError>,
{
    match value {
        Some(value) => Ok(write_presence(true, w)? + f(value, w)?),
        None => write_presence(false, w),
    }
}

pub fn deserialize_nullable<T, R, F>(r: &mut R, f: F) -> Result<Option<T>, DecodeError>
where
    R: Read + ?Sized,
    F: FnOnce(&mut R) -> Result<T, DecodeError>,
{
    if read_presence(r)? {
        f(r).map(Some)
    } else {
        Ok(None)
    }
}

/// For kinds whose absence is their default value: the default is written as absent.
pub fn serialize_or_default<T, W, F>(value: &T, w: &mut W, f: F) -> Result<usize, EncodeError>
where
    T: Default + PartialEq,
    W: Write + ?Sized,
    F: FnOnce(&T, &mut W) -> Result<usize, EncodeError>,
{
    let present = *value != T::default();
    serialize_nullable(present.then_some(value), w, f)
}

/// An absent value decodes as `T::default()`.
pub fn deserialize_or_default<T, R, F>(r: &mut R, f: F) -> Result<T, DecodeError>
where
    T: Default,
    R: Read + ?Sized,
    F: FnOnce(&mut R) -> Result<T, DecodeError>,
{
    Ok(deserialize_nullable(r, f)?.unwrap_or_default())
}
