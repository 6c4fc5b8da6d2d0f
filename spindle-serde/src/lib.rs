//! Conveniently serialize and deserialize your Rust data structures into the `spindle` wire format.
//!
//! # Positional records
//!
//! Structs, tuples and tuple structs are written field by field in declaration order. Neither
//! field names nor a field count go over the wire, so the reading side has to use the same type
//! definition as the writing side. Reordering, adding or removing a field changes the format. For
//! the same reason fields must not be conditionally skipped, for instance with
//! `#[serde(skip_serializing_if = "Option::is_none")]`: the reader would take the next field's
//! bytes for the skipped one.
//!
//! A map with a repeated key decodes to its last value, the way serde's map impls insert. Fields
//! annotated with `#[serde(with = "spindle_serde::wire::unique_map")]` reject it instead, matching
//! the core decoder.
//!
//! Enums are written as the int32 index of their variant. Variants carrying data have no
//! positional encoding and are rejected with `Error::UnsupportedShape`, as are 128 bit integers
//! and anything that asks the format to describe itself (`deserialize_any`).
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub enum Species {
//!     PrionailurusViverrinus,
//!     LynxLynx,
//!     FelisCatus,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub struct Cat {
//!     name: String,
//!     species: Species,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message {
//!     version: u32,
//!     cats: Vec<Cat>,
//!     owner: Option<String>,
//! }
//!
//! let msg = Message {
//!     version: 1,
//!     cats: vec![
//!         Cat { name: "Jessica".to_owned(), species: Species::PrionailurusViverrinus },
//!         Cat { name: "Wantan".to_owned(), species: Species::LynxLynx },
//!     ],
//!     owner: None,
//! };
//!
//! let bytes = spindle_serde::to_bytes(&msg).unwrap();
//! assert_eq!(bytes, [
//!   0x01, 0x00, 0x00, 0x00,                         // version
//!   0x02, 0x00, 0x00, 0x00,                         // 2 cats
//!     0x07, 0x00, 0x00, 0x00,                       // String of 7 bytes
//!       0x4a, 0x65, 0x73, 0x73, 0x69, 0x63, 0x61,   // 'Jessica'
//!     0x00, 0x00, 0x00, 0x00,                       // variant 0, PrionailurusViverrinus
//!     0x06, 0x00, 0x00, 0x00,                       // String of 6 bytes
//!       0x57, 0x61, 0x6e, 0x74, 0x61, 0x6e,         // 'Wantan'
//!     0x01, 0x00, 0x00, 0x00,                       // variant 1, LynxLynx
//!   0x00,                                           // no owner
//! ]);
//!
//! let deserialized: Message = spindle_serde::from_bytes(&bytes).unwrap();
//! assert_eq!(msg, deserialized);
//! ```
//!
//! For comparison, `serde_json` produces 128 bytes for the same message.

mod de;
mod error;
mod ser;
pub mod wire;

pub use de::{from_bytes, from_reader, Deserializer};
pub use error::{DeserializationError, Error, Result};
pub use ser::{to_bytes, to_writer, Serializer};
