//! The `Encode`/`Decode` contract that record code calls for every field.
//!
//! A record encodes its fields in declaration order, with no tags, names or counts; the decoder
//! must read them back in the same order. Kinds with no implementation here are rejected when
//! the record code is compiled.

use crate::container;
use crate::decimal::Decimal;
use crate::error::{DecodeError, DecoderError, EncodeError};
use crate::nullable;
use crate::primitive;
use crate::stream::{read_len, write_len};
use crate::string;
use crate::temporal::{DateTime, DateTimeOffset, TimeSpan};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};
use std::io::{Read, Write};
use uuid::Uuid;

pub trait Encode {
    /// Writes `self`. Returns the number of written bytes.
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError>;

    /// Writes the elements of a list or array without a count.
    fn encode_slice<W: Write + ?Sized>(items: &[Self], w: &mut W) -> Result<usize, EncodeError>
    where
        Self: Sized,
    {
        container::serialize_elements(items, w, |item: &Self, w: &mut W| item.encode(w))
    }
}

pub trait Decode: Sized {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError>;

    /// Reads `count` elements of a list or array.
    fn decode_vec<R: Read + ?Sized>(r: &mut R, count: usize) -> Result<Vec<Self>, DecodeError> {
        container::deserialize_list(r, count, |r: &mut R| Self::decode(r))
    }

    /// Decodes into an existing value. Kinds that own heap memory may reuse it.
    fn decode_in_place<R: Read + ?Sized>(&mut self, r: &mut R) -> Result<(), DecodeError> {
        *self = Self::decode(r)?;
        Ok(())
    }
}

macro_rules! primitive_codec {
    ($($t:ty),*) => {$(
        impl Encode for $t {
            #[inline]
            fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
                primitive::serialize(*self, w)
            }

            fn encode_slice<W: Write + ?Sized>(items: &[Self], w: &mut W) -> Result<usize, EncodeError> {
                primitive::serialize_array(items, w)
            }
        }

        impl Decode for $t {
            #[inline]
            fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
                primitive::deserialize(r)
            }

            fn decode_vec<R: Read + ?Sized>(r: &mut R, count: usize) -> Result<Vec<Self>, DecodeError> {
                primitive::deserialize_array(r, count)
            }
        }
    )*};
}

primitive_codec!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, bool, char);
primitive_codec!(Uuid, Decimal, DateTime, TimeSpan, DateTimeOffset);

impl Encode for str {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        string::serialize_str(self, w)
    }
}

impl Encode for String {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        string::serialize_str(self, w)
    }
}

impl Decode for String {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        string::deserialize_string(r)
    }

    fn decode_in_place<R: Read + ?Sized>(&mut self, r: &mut R) -> Result<(), DecodeError> {
        string::deserialize_string_into(r, self)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        (**self).encode(w)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        (**self).encode(w)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        T::decode(r).map(Box::new)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        nullable::serialize_nullable(self.as_ref(), w, |v: &T, w: &mut W| v.encode(w))
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        nullable::deserialize_nullable(r, |r: &mut R| T::decode(r))
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        Ok(write_len(self.len(), w)? + T::encode_slice(self, w)?)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        self[..].encode(w)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        self[..].encode(w)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        let count = read_len(r)?;
        T::decode_vec(r, count)
    }
}

impl<T: Decode> Decode for Box<[T]> {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        Vec::<T>::decode(r).map(Vec::into_boxed_slice)
    }
}

impl<T: Encode, S> Encode for HashSet<T, S> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        let c = write_len(self.len(), w)?;
        Ok(c + container::serialize_elements(self, w, |v: &T, w: &mut W| v.encode(w))?)
    }
}

impl<T, S> Decode for HashSet<T, S>
where
    T: Decode + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        let count = read_len(r)?;
        container::deserialize_set(r, count, |r: &mut R| T::decode(r))
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        let c = write_len(self.len(), w)?;
        Ok(c + container::serialize_elements(self, w, |v: &T, w: &mut W| v.encode(w))?)
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        let count = read_len(r)?;
        let mut out = BTreeSet::new();
        for _ in 0..count {
            out.insert(T::decode(r)?);
        }
        Ok(out)
    }
}

impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        let c = write_len(self.len(), w)?;
        Ok(c + container::serialize_map(self, w, |k: &K, w: &mut W| k.encode(w), |v: &V, w: &mut W| v.encode(w))?)
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Eq + Hash,
    V: Decode,
    S: BuildHasher + Default,
{
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        let count = read_len(r)?;
        container::deserialize_map(r, count, |r: &mut R| K::decode(r), |r: &mut R| V::decode(r))
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        let c = write_len(self.len(), w)?;
        Ok(c + container::serialize_map(self, w, |k: &K, w: &mut W| k.encode(w), |v: &V, w: &mut W| v.encode(w))?)
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        let count = read_len(r)?;
        let mut out = BTreeMap::new();
        for _ in 0..count {
            let k = K::decode(r)?;
            let v = V::decode(r)?;
            if out.insert(k, v).is_some() {
                return Err(DecodeError::DuplicateKey);
            }
        }
        Ok(out)
    }
}

/// Encodes `value` into a fresh buffer.
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    value.encode(&mut buf)?;
    Ok(buf)
}

/// Decodes a `T` that must span all of `bytes`. Errors carry the position at which decoding
/// stopped.
pub fn from_slice<T: Decode>(bytes: &[u8]) -> Result<T, DecoderError> {
    let mut r = bytes;
    let value = T::decode(&mut r).map_err(|e| e.at(bytes.len() - r.len()))?;
    match r.len() {
        0 => Ok(value),
        left => Err(DecodeError::Trailing(left).at(bytes.len() - left)),
    }
}
