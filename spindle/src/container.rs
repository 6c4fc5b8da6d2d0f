//! Element-wise container codecs. Element and key/value codecs are passed in as callbacks, so
//! the same functions serve any element kind including nested containers.
//!
//! None of these functions writes or reads the element count: callers write the int32 count
//! with [`write_len`](crate::stream::write_len) first and hand the decoded count back in. In map
//! variants marked nullable only the values carry a presence flag, keys never do.

use crate::error::{DecodeError, EncodeError};
use crate::nullable::{deserialize_nullable, serialize_nullable};
use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hash};
use std::io::{Read, Write};
use tracing::debug;

/// Writes each element with `f`. Shared by arrays, lists and sets. Returns the number of written
/// bytes.
pub fn serialize_elements<'a, T, I, W, F>(items: I, w: &mut W, mut f: F) -> Result<usize, EncodeError>
where
    T: 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
    W: Write + ?Sized,
    F: FnMut(&T, &mut W) -> Result<usize, EncodeError>,
{
    let mut c = 0;
    for item in items {
        c += f(item, w)?;
    }
    Ok(c)
}

pub fn deserialize_list<T, R, F>(r: &mut R, count: usize, mut f: F) -> Result<Vec<T>, DecodeError>
where
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, DecodeError>,
{
    let mut out = Vec::new();
    out.try_reserve_exact(count)?;
    for _ in 0..count {
        out.push(f(r)?);
    }
    Ok(out)
}

pub fn deserialize_array<T, R, F>(r: &mut R, count: usize, f: F) -> Result<Box<[T]>, DecodeError>
where
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, DecodeError>,
{
    deserialize_list(r, count, f).map(Vec::into_boxed_slice)
}

/// Reads `count` elements into a set. Repeated elements collapse into one.
pub fn deserialize_set<T, S, R, F>(r: &mut R, count: usize, mut f: F) -> Result<HashSet<T, S>, DecodeError>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, DecodeError>,
{
    let mut out = HashSet::with_hasher(S::default());
    out.try_reserve(count)?;
    for _ in 0..count {
        out.insert(f(r)?);
    }
    Ok(out)
}

/// Writes each entry as its key followed by its value.
pub fn serialize_map<'a, K, V, I, W, FK, FV>(entries: I, w: &mut W, mut fk: FK, mut fv: FV) -> Result<usize, EncodeError>
where
    K: 'a + ?Sized,
    V: 'a + ?Sized,
    I: IntoIterator<Item = (&'a K, &'a V)>,
    W: Write + ?Sized,
    FK: FnMut(&K, &mut W) -> Result<usize, EncodeError>,
    FV: FnMut(&V, &mut W) -> Result<usize, EncodeError>,
{
    let mut c = 0;
    for (k, v) in entries {
        c += fk(k, w)?;
        c += fv(v, w)?;
    }
    Ok(c)
}

/// Reads `count` key/value pairs. A key that occurs twice is an error.
pub fn deserialize_map<K, V, S, R, FK, FV>(r: &mut R, count: usize, mut fk: FK, mut fv: FV) -> Result<HashMap<K, V, S>, DecodeError>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    R: Read + ?Sized,
    FK: FnMut(&mut R) -> Result<K, DecodeError>,
    FV: FnMut(&mut R) -> Result<V, DecodeError>,
{
    let mut out = HashMap::with_hasher(S::default());
    out.try_reserve(count)?;
    for _ in 0..count {
        let k = fk(r)?;
        let v = fv(r)?;
        if out.insert(k, v).is_some() {
            debug!(count, "duplicate key in map");
            return Err(DecodeError::DuplicateKey);
        }
    }
    Ok(out)
}

/// Like [`serialize_elements`] with a presence flag before every element.
pub fn serialize_elements_nullable<'a, T, I, W, F>(items: I, w: &mut W, mut f: F) -> Result<usize, EncodeError>
where
    T: 'a,
    I: IntoIterator<Item = &'a Option<T>>,
    W: Write + ?Sized,
    F: FnMut(&T, &mut W) -> Result<usize, EncodeError>,
{
    serialize_elements(items, w, |item: &Option<T>, w: &mut W| serialize_nullable(item.as_ref(), w, &mut f))
}

pub fn deserialize_list_nullable<T, R, F>(r: &mut R, count: usize, mut f: F) -> Result<Vec<Option<T>>, DecodeError>
where
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, DecodeError>,
{
    deserialize_list(r, count, |r: &mut R| deserialize_nullable(r, &mut f))
}

pub fn deserialize_array_nullable<T, R, F>(r: &mut R, count: usize, f: F) -> Result<Box<[Option<T>]>, DecodeError>
where
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, DecodeError>,
{
    deserialize_list_nullable(r, count, f).map(Vec::into_boxed_slice)
}

/// Absent elements all collapse into a single `None`.
pub fn deserialize_set_nullable<T, S, R, F>(r: &mut R, count: usize, mut f: F) -> Result<HashSet<Option<T>, S>, DecodeError>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T, DecodeError>,
{
    deserialize_set(r, count, |r: &mut R| deserialize_nullable(r, &mut f))
}

pub fn serialize_map_nullable<'a, K, V, I, W, FK, FV>(entries: I, w: &mut W, fk: FK, mut fv: FV) -> Result<usize, EncodeError>
where
    K: 'a + ?Sized,
    V: 'a,
    I: IntoIterator<Item = (&'a K, &'a Option<V>)>,
    W: Write + ?Sized,
    FK: FnMut(&K, &mut W) -> Result<usize, EncodeError>,
    FV: FnMut(&V, &mut W) -> Result<usize, EncodeError>,
{
    serialize_map(entries, w, fk, |v: &Option<V>, w: &mut W| serialize_nullable(v.as_ref(), w, &mut fv))
}

pub fn deserialize_map_nullable<K, V, S, R, FK, FV>(r: &mut R, count: usize, fk: FK, mut fv: FV) -> Result<HashMap<K, Option<V>, S>, DecodeError>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
    R: Read + ?Sized,
    FK: FnMut(&mut R) -> Result<K, DecodeError>,
    FV: FnMut(&mut R) -> Result<V, DecodeError>,
{
    deserialize_map(r, count, fk, |r: &mut R| deserialize_nullable(r, &mut fv))
}
