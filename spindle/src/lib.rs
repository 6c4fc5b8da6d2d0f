//! A positional, little-endian binary codec and SpookyHash V2 fingerprints.
//!
//! Records are written field by field in declaration order without tags, names or a field count,
//! so reader and writer have to agree on the field layout. Fixed-width scalars take exactly their
//! width in little-endian byte order, strings and containers carry an int32 length prefix and
//! optional values a one byte presence flag.
//!
//! All encoding functions take a value and a writer and return the number of written bytes. All
//! decoding functions take a reader and return the decoded value. Readers may return short reads;
//! a read of zero bytes before a value is complete is reported as `DecodeError::Eof`.
//!
//! # A note on lengths
//!
//! Length prefixes are signed 32 bit integers. Encoding a string or container with more than
//! `i32::MAX` bytes or elements raises `EncodeError::Length`, and a negative prefix on the wire
//! raises `DecodeError::Length`.
//!
//! # Examples
//!
//! ```
//! use spindle::*;
//!
//! let mut buf = Vec::new();
//! 8u8.encode(&mut buf).unwrap();
//! 0x69u32.encode(&mut buf).unwrap();
//! Some("hi").encode(&mut buf).unwrap();
//! assert_eq!(buf, [
//!     0x08,                   // byte field
//!     0x69, 0x00, 0x00, 0x00, // uint field
//!     0x01,                   // present
//!     0x02, 0x00, 0x00, 0x00, // 2 bytes of UTF-8
//!     0x68, 0x69,             // "hi"
//! ]);
//!
//! let mut r = &buf[..];
//! assert_eq!(8, u8::decode(&mut r).unwrap());
//! assert_eq!(0x69, u32::decode(&mut r).unwrap());
//! assert_eq!(Some("hi".to_owned()), Option::<String>::decode(&mut r).unwrap());
//! assert!(r.is_empty());
//!
//! assert_eq!("a093e3c4e7df0055d34d472e832d9197", Sh128::compute_str("saxton hale").to_string());
//! ```

mod codec;
mod decimal;
mod error;
mod spooky;
mod temporal;

pub mod container;
pub mod nullable;
pub mod pool;
pub mod primitive;
pub mod stream;
pub mod string;

pub use codec::*;
pub use decimal::*;
pub use error::*;
pub use primitive::Primitive;
pub use spooky::*;
pub use temporal::*;
