use serde::ser::{self, Impossible, Serialize};
use spindle::{nullable, primitive, stream, string, EncodeError};
use std::io::Write;

use crate::error::{Error, Result};

pub struct Serializer<W> {
    output: W,
}

pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(Vec::new());
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

pub fn to_writer<T: Serialize + ?Sized, W: Write>(writer: W, value: &T) -> Result<()> {
    let mut serializer = Serializer::new(writer);
    value.serialize(&mut serializer)?;
    Ok(())
}

impl<W: Write> Serializer<W> {
    pub fn new(output: W) -> Self {
        Serializer { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    #[inline]
    fn primitive<T: spindle::Primitive>(&mut self, v: T) -> Result<()> {
        primitive::serialize(v, &mut self.output)?;
        Ok(())
    }
}

impl<'a, W: Write> ser::Serializer for &'a mut Serializer<W> {

    type Ok = ();
    type Error = Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Impossible<(), Error>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_i128(self, _v: i128) -> Result<()> {
        Err(Error::unsupported("128 bit integer"))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_u128(self, _v: u128) -> Result<()> {
        Err(Error::unsupported("128 bit integer"))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.primitive(v)
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        string::serialize_str(v, &mut self.output)?;
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        stream::write_len(v.len(), &mut self.output)?;
        self.output.write_all(v).map_err(EncodeError::from)?;
        Ok(())
    }

    fn serialize_none(self) -> Result<()> {
        nullable::write_presence(false, &mut self.output)?;
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        nullable::write_presence(true, &mut self.output)?;
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(self, _name: &'static str, index: u32, _variant: &'static str) -> Result<()> {
        let index = i32::try_from(index).map_err(|_| EncodeError::Length(index as usize))?;
        self.primitive(index)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _index: u32, _variant: &'static str, _value: &T) -> Result<()> {
        Err(Error::unsupported("newtype variant"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        match len {
            Some(l) => {
                stream::write_len(l, &mut self.output)?;
                Ok(self)
            },
            None => Err(Error::Length),
        }
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    fn serialize_tuple_variant(self, _name: &'static str, _index: u32, _variant: &'static str, _len: usize) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported("tuple variant"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        match len {
            Some(l) => {
                stream::write_len(l, &mut self.output)?;
                Ok(self)
            },
            None => Err(Error::Length),
        }
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(self)
    }

    fn serialize_struct_variant(self, _name: &'static str, _index: u32, _variant: &'static str, _len: usize) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported("struct variant"))
    }

}

impl<'a, W: Write> ser::SerializeSeq for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }

}

impl<'a, W: Write> ser::SerializeTuple for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> ser::SerializeTupleStruct for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, W: Write> ser::SerializeMap for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }

}

/// Fields go out in declaration order, their names are dropped.
impl<'a, W: Write> ser::SerializeStruct for &'a mut Serializer<W> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }

}
