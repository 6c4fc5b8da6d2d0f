use spindle::*;
use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};

#[derive(Debug, PartialEq)]
struct Small {
    byte_value: u8,
    uint_value: u32,
}

impl Encode for Small {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        Ok(self.byte_value.encode(w)? + self.uint_value.encode(w)?)
    }
}

impl Decode for Small {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        Ok(Small {
            byte_value: u8::decode(r)?,
            uint_value: u32::decode(r)?,
        })
    }
}

/// Same fields, declared the other way round.
#[derive(Debug, PartialEq)]
struct Swapped {
    uint_value: u32,
    byte_value: u8,
}

impl Encode for Swapped {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        Ok(self.uint_value.encode(w)? + self.byte_value.encode(w)?)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Color {
    Red,
    Green,
    Blue,
}

impl Encode for Color {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        (*self as i32).encode(w)
    }
}

impl Decode for Color {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        match i32::decode(r)? {
            0 => Ok(Color::Red),
            1 => Ok(Color::Green),
            2 => Ok(Color::Blue),
            _ => Err(DecodeError::Invalid("Color")),
        }
    }
}

#[derive(Debug, PartialEq)]
struct Composite {
    color: Option<Color>,
    parts: Vec<Option<Small>>,
    label: String,
    id: uuid::Uuid,
    price: Decimal,
    samples: Vec<f64>,
}

impl Encode for Composite {
    fn encode<W: Write + ?Sized>(&self, w: &mut W) -> Result<usize, EncodeError> {
        Ok(self.color.encode(w)?
            + self.parts.encode(w)?
            + self.label.encode(w)?
            + self.id.encode(w)?
            + self.price.encode(w)?
            + self.samples.encode(w)?)
    }
}

impl Decode for Composite {
    fn decode<R: Read + ?Sized>(r: &mut R) -> Result<Self, DecodeError> {
        Ok(Composite {
            color: Decode::decode(r)?,
            parts: Decode::decode(r)?,
            label: Decode::decode(r)?,
            id: Decode::decode(r)?,
            price: Decode::decode(r)?,
            samples: Decode::decode(r)?,
        })
    }

    fn decode_in_place<R: Read + ?Sized>(&mut self, r: &mut R) -> Result<(), DecodeError> {
        self.color = Decode::decode(r)?;
        self.parts = Decode::decode(r)?;
        self.label.decode_in_place(r)?;
        self.id = Decode::decode(r)?;
        self.price = Decode::decode(r)?;
        let count = stream::read_len(r)?;
        primitive::deserialize_array_into(r, count, &mut self.samples)
    }
}

fn composite() -> Composite {
    Composite {
        color: Some(Color::Blue),
        parts: vec![Some(Small { byte_value: 1, uint_value: 2 }), None],
        label: "sk\u{f6}ll".to_owned(),
        id: uuid::Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff),
        price: Decimal::new(-1999, 2),
        samples: vec![0.5, -1.25, f64::MAX],
    }
}

#[test]
fn small_record_layout() {
    let small = Small { byte_value: 8, uint_value: 0x69 };
    let bytes = to_vec(&small).unwrap();
    assert_eq!(bytes, [0x08, 0x69, 0x00, 0x00, 0x00]);
    assert_eq!(small, from_slice::<Small>(&bytes).unwrap());
}

#[test]
fn field_order_changes_the_bytes() {
    let small = to_vec(&Small { byte_value: 8, uint_value: 0x69 }).unwrap();
    let swapped = to_vec(&Swapped { uint_value: 0x69, byte_value: 8 }).unwrap();
    assert_eq!(swapped, [0x69, 0x00, 0x00, 0x00, 0x08]);
    assert_ne!(small, swapped);
}

#[test]
fn composite_consumes_everything_it_wrote() {
    let value = composite();
    let mut buf = Vec::new();
    let written = value.encode(&mut buf).unwrap();
    assert_eq!(buf.len(), written);
    let expected = (1 + 4)                  // color
        + 4 + (1 + 5) + 1                   // parts
        + 4 + 6                             // label
        + 16                                // id
        + 16                                // price
        + 4 + 3 * 8;                        // samples
    assert_eq!(expected, written);

    let mut r = &buf[..];
    assert_eq!(value, Composite::decode(&mut r).unwrap());
    assert!(r.is_empty());
}

#[test]
fn composite_decodes_in_place() {
    let bytes = to_vec(&composite()).unwrap();
    let mut target = Composite {
        color: None,
        parts: vec![],
        label: String::with_capacity(64),
        id: uuid::Uuid::nil(),
        price: Decimal::ZERO,
        samples: Vec::with_capacity(64),
    };
    target.decode_in_place(&mut &bytes[..]).unwrap();
    assert_eq!(composite(), target);
    assert!(target.label.capacity() >= 64);
    assert!(target.samples.capacity() >= 64);
}

#[test]
fn absent_values_and_empty_containers() {
    let value = Composite {
        color: None,
        parts: vec![None, None],
        label: String::new(),
        id: uuid::Uuid::nil(),
        price: Decimal::ZERO,
        samples: vec![],
    };
    let bytes = to_vec(&value).unwrap();
    assert_eq!(&bytes[..9], &[0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(value, from_slice::<Composite>(&bytes).unwrap());
}

#[test]
fn truncated_record_reports_position() {
    let bytes = to_vec(&composite()).unwrap();
    let err = from_slice::<Composite>(&bytes[..bytes.len() - 3]).unwrap_err();
    assert_eq!(bytes.len() - 3, err.position());
    assert!(err.into_inner().is_eof());
}

#[test]
fn sets_and_maps() {
    let set: HashSet<i32> = [3, 4, 5].into_iter().collect();
    let bytes = to_vec(&set).unwrap();
    assert_eq!(4 + 3 * 4, bytes.len());
    assert_eq!(&bytes[..4], &[3, 0, 0, 0]);
    assert_eq!(set, from_slice::<HashSet<i32>>(&bytes).unwrap());

    let mut map = BTreeMap::new();
    map.insert("a".to_owned(), Some(Small { byte_value: 1, uint_value: 1 }));
    map.insert("b".to_owned(), None);
    let bytes = to_vec(&map).unwrap();
    assert_eq!(bytes, [
        0x02, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00, 0x61,
        0x01, 0x01, 0x01, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00, 0x62,
        0x00,
    ]);
    assert_eq!(map, from_slice::<BTreeMap<String, Option<Small>>>(&bytes).unwrap());
}

#[test]
fn duplicate_keys_are_rejected() {
    let bytes = [
        0x02, 0x00, 0x00, 0x00,
        0x07, 0x00, 0x00, 0x00, 0x01,
        0x07, 0x00, 0x00, 0x00, 0x02,
    ];
    let err = from_slice::<BTreeMap<i32, u8>>(&bytes).unwrap_err();
    assert!(matches!(err.into_inner(), DecodeError::DuplicateKey));
}

#[test]
fn records_are_fingerprinted_by_their_bytes() {
    let a = Sh128::compute(&to_vec(&composite()).unwrap());
    let b = Sh128::compute(&to_vec(&composite()).unwrap());
    assert_eq!(a, b);
    let mut other = composite();
    other.color = Some(Color::Red);
    assert_ne!(a, Sh128::compute(&to_vec(&other).unwrap()));
}

#[test]
fn unknown_discriminant_is_invalid() {
    let mut bytes = to_vec(&composite()).unwrap();
    bytes[1..5].copy_from_slice(&9i32.to_le_bytes());
    let err = from_slice::<Composite>(&bytes).unwrap_err();
    assert_eq!(5, err.position());
    let inner = err.into_inner();
    assert!(matches!(inner, DecodeError::Invalid("Color")));
    assert_eq!("Invalid value for Color", inner.to_string());
}
