//! Fixed-width scalars. Every kind occupies exactly `WIDTH` bytes on the wire in little-endian
//! byte order, independent of the host. Single values are staged in the per-thread scratch
//! buffer, arrays are converted chunk by chunk through a pooled buffer of `CHUNK_SIZE` bytes.

use crate::error::{DecodeError, EncodeError};
use crate::pool::BufferPool;
use crate::stream::{read_full, with_scratch, CHUNK_SIZE, SCRATCH_LEN};
use std::io::{Read, Write};
use std::mem::size_of;
use uuid::Uuid;

/// A value with a fixed wire width of at most `SCRATCH_LEN` bytes.
///
/// `put` receives and `get` is handed a slice of exactly `WIDTH` bytes.
pub trait Primitive: Copy {
    const WIDTH: usize;

    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError>;

    fn get(src: &[u8]) -> Result<Self, DecodeError>;
}

#[inline]
pub(crate) fn fixed<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&src[..N]);
    buf
}

macro_rules! little_endian {
    ($($t:ty),*) => {$(
        impl Primitive for $t {
            const WIDTH: usize = size_of::<$t>();

            #[inline]
            fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
                dst.copy_from_slice(&self.to_le_bytes());
                Ok(())
            }

            #[inline]
            fn get(src: &[u8]) -> Result<Self, DecodeError> {
                Ok(<$t>::from_le_bytes(fixed(src)))
            }
        }
    )*};
}

little_endian!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Primitive for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        dst[0] = self as u8;
        Ok(())
    }

    #[inline]
    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        Ok(src[0] != 0)
    }
}

/// A single UTF-16 code unit. Lone surrogates have no `char` and fail with
/// `DecodeError::InvalidChar`; fields that must carry arbitrary code units, for instance from
/// writers whose chars are UTF-16 units, use `u16`, which has the same two bytes on the wire.
impl Primitive for char {
    const WIDTH: usize = 2;

    #[inline]
    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        let unit = u16::try_from(self as u32).map_err(|_| EncodeError::CharRange(self))?;
        unit.put(dst)
    }

    #[inline]
    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        let unit = u16::get(src)?;
        char::from_u32(unit as u32).ok_or(DecodeError::InvalidChar(unit))
    }
}

/// GUIDs use the mixed-endian layout: the leading u32 and both u16 fields little-endian, the
/// trailing eight bytes verbatim.
impl Primitive for Uuid {
    const WIDTH: usize = 16;

    #[inline]
    fn put(self, dst: &mut [u8]) -> Result<(), EncodeError> {
        dst.copy_from_slice(&self.to_bytes_le());
        Ok(())
    }

    #[inline]
    fn get(src: &[u8]) -> Result<Self, DecodeError> {
        Ok(Uuid::from_bytes_le(fixed(src)))
    }
}

/// Writes a single value. Returns the number of written bytes.
pub fn serialize<T: Primitive, W: Write + ?Sized>(value: T, w: &mut W) -> Result<usize, EncodeError> {
    debug_assert!(T::WIDTH <= SCRATCH_LEN);
    with_scratch(|buf| {
        let buf = &mut buf[..T::WIDTH];
        value.put(buf)?;
        w.write_all(buf)?;
        Ok(T::WIDTH)
    })
}

/// Reads a single value.
pub fn deserialize<T: Primitive, R: Read + ?Sized>(r: &mut R) -> Result<T, DecodeError> {
    with_scratch(|buf| {
        let buf = &mut buf[..T::WIDTH];
        read_full(r, buf)?;
        T::get(buf)
    })
}

#[inline]
fn per_chunk<T: Primitive>() -> usize {
    (CHUNK_SIZE / T::WIDTH).max(1)
}

/// Writes all values back to back without a count. Returns the number of written bytes.
pub fn serialize_array<T: Primitive, W: Write + ?Sized>(values: &[T], w: &mut W) -> Result<usize, EncodeError> {
    if values.is_empty() {
        return Ok(0);
    }
    let per = per_chunk::<T>();
    let mut chunk = BufferPool::shared().rent(per.min(values.len()) * T::WIDTH);
    let mut c = 0;
    for batch in values.chunks(per) {
        let bytes = &mut chunk[..batch.len() * T::WIDTH];
        for (value, dst) in batch.iter().zip(bytes.chunks_exact_mut(T::WIDTH)) {
            value.put(dst)?;
        }
        w.write_all(bytes)?;
        c += bytes.len();
    }
    Ok(c)
}

/// Reads exactly `count` values.
pub fn deserialize_array<T: Primitive, R: Read + ?Sized>(r: &mut R, count: usize) -> Result<Vec<T>, DecodeError> {
    let mut out = Vec::new();
    deserialize_array_into(r, count, &mut out)?;
    Ok(out)
}

/// Reads exactly `count` values into `out`, replacing its contents but keeping its allocation.
pub fn deserialize_array_into<T: Primitive, R: Read + ?Sized>(r: &mut R, count: usize, out: &mut Vec<T>) -> Result<(), DecodeError> {
    out.clear();
    out.try_reserve_exact(count)?;
    if count == 0 {
        return Ok(());
    }
    let per = per_chunk::<T>();
    let mut chunk = BufferPool::shared().try_rent(per.min(count) * T::WIDTH)?;
    let mut left = count;
    while left > 0 {
        let n = left.min(per);
        let bytes = &mut chunk[..n * T::WIDTH];
        read_full(r, bytes)?;
        for src in bytes.chunks_exact(T::WIDTH) {
            out.push(T::get(src)?);
        }
        left -= n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::testing::ShortReader;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;
    use std::fmt::Debug;
    use std::io::Cursor;

    fn assert_roundtrip<T: Primitive + PartialEq + Debug>(value: T) {
        let mut buf = Vec::new();
        assert_eq!(T::WIDTH, serialize(value, &mut buf).unwrap());
        assert_eq!(T::WIDTH, buf.len());
        let mut r = Cursor::new(&buf);
        assert_eq!(value, deserialize::<T, _>(&mut r).unwrap());
        assert_eq!(buf.len() as u64, r.position());
    }

    #[test]
    fn roundtrip_scalars() {
        assert_roundtrip(0u8);
        assert_roundtrip(-128i8);
        assert_roundtrip(0xbeefu16);
        assert_roundtrip(i16::MIN);
        assert_roundtrip(194301i32);
        assert_roundtrip(u32::MAX);
        assert_roundtrip(i64::MIN);
        assert_roundtrip(1010101010101u64);
        assert_roundtrip(1337.8472f32);
        assert_roundtrip(-0.000001f64);
        assert_roundtrip(true);
        assert_roundtrip(false);
        assert_roundtrip('x');
        assert_roundtrip('\u{fffd}');
        assert_roundtrip(Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff));
    }

    #[test]
    fn wire_is_little_endian() {
        let mut buf = Vec::new();
        serialize(0x0102_0304u32, &mut buf).unwrap();
        serialize(-2i16, &mut buf).unwrap();
        serialize(1.0f64, &mut buf).unwrap();
        assert_eq!(buf, [
            0x04, 0x03, 0x02, 0x01,
            0xfe, 0xff,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0x3f,
        ]);
    }

    #[test]
    fn guid_layout() {
        let guid = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
        let mut buf = Vec::new();
        serialize(guid, &mut buf).unwrap();
        assert_eq!(buf, [
            0x33, 0x22, 0x11, 0x00, // u32 little-endian
            0x55, 0x44,             // u16 little-endian
            0x77, 0x66,             // u16 little-endian
            0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
        ]);
    }

    #[test]
    fn bool_reads_any_nonzero_as_true() {
        assert!(deserialize::<bool, _>(&mut Cursor::new([0x02u8])).unwrap());
        assert!(!deserialize::<bool, _>(&mut Cursor::new([0x00u8])).unwrap());
    }

    #[test]
    fn chars_are_utf16_units() {
        let mut buf = Vec::new();
        serialize('é', &mut buf).unwrap();
        assert_eq!(buf, [0xe9, 0x00]);
        assert!(matches!(serialize('🦀', &mut buf), Err(EncodeError::CharRange('🦀'))));
        let surrogate = 0xd800u16.to_le_bytes();
        assert!(matches!(deserialize::<char, _>(&mut Cursor::new(surrogate)), Err(DecodeError::InvalidChar(0xd800))));
    }

    #[test]
    fn code_units_read_as_u16() {
        let mut buf = Vec::new();
        serialize('é', &mut buf).unwrap();
        buf.extend_from_slice(&0xdc00u16.to_le_bytes());
        let mut r = Cursor::new(&buf);
        assert_eq!(0x00e9, deserialize::<u16, _>(&mut r).unwrap());
        assert_eq!(0xdc00, deserialize::<u16, _>(&mut r).unwrap());
        let mut out = Vec::new();
        serialize(0xdc00u16, &mut out).unwrap();
        assert_eq!(&buf[2..], &out[..]);
    }

    #[test]
    fn short_reads_are_accumulated() {
        let mut buf = Vec::new();
        serialize(u64::MAX - 7, &mut buf).unwrap();
        let mut r = ShortReader(Cursor::new(&buf));
        assert_eq!(u64::MAX - 7, deserialize::<u64, _>(&mut r).unwrap());
    }

    #[test]
    fn truncated_value() {
        let err = deserialize::<u32, _>(&mut Cursor::new([1u8, 2, 3])).unwrap_err();
        assert!(matches!(err, DecodeError::Eof { read: 3, left: 1 }));
    }

    #[test]
    fn empty_array_does_no_io() {
        let mut buf = Vec::new();
        assert_eq!(0, serialize_array::<u32, _>(&[], &mut buf).unwrap());
        assert!(buf.is_empty());
        let mut r = Cursor::new([0xffu8; 0]);
        assert!(deserialize_array::<u32, _>(&mut r, 0).unwrap().is_empty());
    }

    #[test]
    fn array_spans_several_chunks() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let values: Vec<i64> = (0..3 * CHUNK_SIZE / 8 + 5).map(|_| rng.gen()).collect();
        let mut buf = Vec::new();
        assert_eq!(values.len() * 8, serialize_array(&values, &mut buf).unwrap());
        assert_eq!(buf[..8], values[0].to_le_bytes());
        let mut r = ShortReader(Cursor::new(&buf));
        assert_eq!(values, deserialize_array::<i64, _>(&mut r, values.len()).unwrap());
    }

    #[test]
    fn array_matches_single_values() {
        let values = ['a', 'ß', '\u{4e2d}'];
        let mut bulk = Vec::new();
        serialize_array(&values, &mut bulk).unwrap();
        let mut single = Vec::new();
        for c in values {
            serialize(c, &mut single).unwrap();
        }
        assert_eq!(single, bulk);
    }

    #[test]
    fn truncated_array() {
        let mut buf = Vec::new();
        serialize_array(&[1u16, 2, 3], &mut buf).unwrap();
        buf.pop();
        assert!(deserialize_array::<u16, _>(&mut Cursor::new(&buf), 3).unwrap_err().is_eof());
    }

    #[test]
    fn array_into_reuses_allocation() {
        let mut buf = Vec::new();
        serialize_array(&[9u8, 8, 7], &mut buf).unwrap();
        let mut out = Vec::with_capacity(64);
        out.push(1u8);
        deserialize_array_into(&mut Cursor::new(&buf), 3, &mut out).unwrap();
        assert_eq!(vec![9, 8, 7], out);
        assert!(out.capacity() >= 64);
    }
}
