use serde::de::{self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::de::value::U32Deserializer;
use spindle::{nullable, primitive, stream, string, DecodeError, Primitive};
use std::io::{self, Read};

use crate::error::{DeserializationError, Error, Result};

/// Counts the bytes pulled from the underlying reader.
struct Input<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> Read for Input<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let c = self.inner.read(buf)?;
        self.pos += c;
        Ok(c)
    }
}

/// Reads values back in the order they were written. Strings and byte buffers are always copied
/// out of the input, so borrowed `&str` and `&[u8]` fields cannot be deserialized.
pub struct Deserializer<R> {
    input: Input<R>,
}

impl<R: Read> Deserializer<R> {
    pub fn new(reader: R) -> Self {
        Deserializer { input: Input { inner: reader, pos: 0 } }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.input.pos
    }

    pub fn into_inner(self) -> R {
        self.input.inner
    }
}

/// Decodes one value from `reader`. Whatever follows the value is left unread.
pub fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> std::result::Result<T, DeserializationError> {
    let mut deserializer = Deserializer::new(reader);
    T::deserialize(&mut deserializer).map_err(|e| e.at(deserializer.position()))
}

/// Decodes one value which must span all of `s`.
pub fn from_bytes<T: DeserializeOwned>(s: &[u8]) -> std::result::Result<T, DeserializationError> {
    let mut deserializer = Deserializer::new(s);
    let t = T::deserialize(&mut deserializer).map_err(|e| e.at(deserializer.position()))?;
    if deserializer.position() == s.len() {
        Ok(t)
    } else {
        Err(Error::Trailing.at(deserializer.position()))
    }
}

impl<R: Read> Deserializer<R> {

    #[inline]
    fn decode<T: Primitive>(&mut self) -> Result<T> {
        Ok(primitive::deserialize(&mut self.input)?)
    }

    #[inline]
    fn decode_len(&mut self) -> Result<usize> {
        Ok(stream::read_len(&mut self.input)?)
    }

    fn decode_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.decode_len()?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(DecodeError::from)?;
        buf.resize(len, 0);
        stream::read_full(&mut self.input, &mut buf)?;
        Ok(buf)
    }

}

impl<'de, 'a, R: Read> de::Deserializer<'de> for &'a mut Deserializer<R> {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("self-describing value"))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.decode()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.decode()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.decode()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.decode()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.decode()?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("128 bit integer"))
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.decode()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.decode()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.decode()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.decode()?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("128 bit integer"))
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.decode()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.decode()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_char(self.decode()?)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(string::deserialize_string(&mut self.input)?)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_byte_buf(self.decode_bytes()?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if nullable::read_presence(&mut self.input)? {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = self.decode_len()?;
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(SeqDeserializer::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(self, _name: &'static str, len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = self.decode_len()?;
        visitor.visit_map(MapDeserializer::new(self, len))
    }

    fn deserialize_struct<V: Visitor<'de>>(self, _name: &'static str, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        self.deserialize_tuple(fields.len(), visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str],  visitor: V) -> Result<V::Value> {
        let index: i32 = self.decode()?;
        match u32::try_from(index) {
            Ok(index) => visitor.visit_enum(UnitVariant { index }),
            Err(_) => Err(Error::Variant(index)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("identifier"))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("self-describing value"))
    }

}

struct MapDeserializer<'a, R> {
    de: &'a mut Deserializer<R>,
    remaining: usize,
}

impl<'a, R> MapDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, remaining: usize) -> Self {
        Self { de, remaining }
    }
}

impl<'de, 'a, R: Read> MapAccess<'de> for MapDeserializer<'a, R> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            Ok(None)
        } else {
            self.remaining -= 1;
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

/// Enumerated fields carry only their variant index.
struct UnitVariant {
    index: u32,
}

impl<'de> EnumAccess<'de> for UnitVariant {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let deserializer: U32Deserializer<Error> = self.index.into_deserializer();
        let variant = seed.deserialize(deserializer)?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for UnitVariant {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, _seed: T) -> Result<T::Value> {
        Err(Error::unsupported("newtype variant"))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("tuple variant"))
    }

    fn struct_variant<V: Visitor<'de>>(self, _fields: &'static [&'static str], _visitor: V) -> Result<V::Value> {
        Err(Error::unsupported("struct variant"))
    }

}

/// Elements of sequences as well as the fields of tuples and structs.
struct SeqDeserializer<'a, R> {
    de: &'a mut Deserializer<R>,
    remaining: usize,
}

impl<'a, R> SeqDeserializer<'a, R> {
    fn new(de: &'a mut Deserializer<R>, remaining: usize) -> Self {
        Self { de, remaining }
    }
}

impl<'de, 'a, R: Read> SeqAccess<'de> for SeqDeserializer<'a, R> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            Ok(None)
        } else {
            self.remaining -= 1;
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }

}
