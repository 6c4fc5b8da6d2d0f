//! Field adapters for `#[serde(with = "...")]` that give structured kinds the same bytes the
//! core codec writes for them.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use spindle::{Decimal, DateTime};
//! use uuid::Uuid;
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Payment {
//!     #[serde(with = "spindle_serde::wire::guid")]
//!     id: Uuid,
//!     #[serde(with = "spindle_serde::wire::decimal")]
//!     amount: Decimal,
//!     #[serde(with = "spindle_serde::wire::date_time")]
//!     booked: DateTime,
//! }
//!
//! let payment = Payment {
//!     id: Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff),
//!     amount: Decimal::new(1999, 2),
//!     booked: DateTime::from_raw(0),
//! };
//! let bytes = spindle_serde::to_bytes(&payment).unwrap();
//! assert_eq!(16 + 16 + 8, bytes.len());
//! assert_eq!(&bytes[..4], &[0x33, 0x22, 0x11, 0x00]);
//! assert_eq!(payment, spindle_serde::from_bytes::<Payment>(&bytes).unwrap());
//! ```

/// GUIDs in the mixed-endian layout.
pub mod guid {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(value: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        let (d1, d2, d3, d4) = value.as_fields();
        (d1, d2, d3, d4).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let (d1, d2, d3, d4) = <(u32, u16, u16, [u8; 8])>::deserialize(deserializer)?;
        Ok(Uuid::from_fields(d1, d2, d3, &d4))
    }
}

pub mod decimal {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use spindle::Decimal;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        value.to_parts().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let (flags, hi, lo) = <(u32, u32, u64)>::deserialize(deserializer)?;
        Ok(Decimal::from_parts(flags, hi, lo))
    }
}

pub mod date_time {
    use serde::{Deserialize, Deserializer, Serializer};
    use spindle::DateTime;

    pub fn serialize<S: Serializer>(value: &DateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.to_raw())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime, D::Error> {
        u64::deserialize(deserializer).map(DateTime::from_raw)
    }
}

pub mod time_span {
    use serde::{Deserialize, Deserializer, Serializer};
    use spindle::TimeSpan;

    pub fn serialize<S: Serializer>(value: &TimeSpan, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.ticks())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeSpan, D::Error> {
        i64::deserialize(deserializer).map(TimeSpan)
    }
}

/// The clock reading followed by the offset in minutes.
pub mod date_time_offset {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use spindle::{DateTime, DateTimeOffset};

    pub fn serialize<S: Serializer>(value: &DateTimeOffset, serializer: S) -> Result<S::Ok, S::Error> {
        (value.date_time.to_raw(), value.offset_minutes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTimeOffset, D::Error> {
        let (raw, offset_minutes) = <(u64, i16)>::deserialize(deserializer)?;
        Ok(DateTimeOffset { date_time: DateTime::from_raw(raw), offset_minutes })
    }
}

/// Hash maps that reject a repeated key, as the core decoder does. Serde's own map impls keep
/// the last value for a repeated key.
pub mod unique_map {
    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;
    use std::fmt;
    use std::hash::{BuildHasher, Hash};
    use std::marker::PhantomData;

    pub fn serialize<K, V, H, S>(value: &HashMap<K, V, H>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_map(value)
    }

    pub fn deserialize<'de, K, V, H, D>(deserializer: D) -> Result<HashMap<K, V, H>, D::Error>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        H: BuildHasher + Default,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }

    struct UniqueMapVisitor<K, V, H>(PhantomData<fn() -> HashMap<K, V, H>>);

    impl<'de, K, V, H> Visitor<'de> for UniqueMapVisitor<K, V, H>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        H: BuildHasher + Default,
    {
        type Value = HashMap<K, V, H>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map without repeated keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            // the count comes off the wire, so it only bounds the initial capacity
            let capacity = access.size_hint().unwrap_or(0).min(4096);
            let mut map = HashMap::with_capacity_and_hasher(capacity, H::default());
            while let Some((key, value)) = access.next_entry()? {
                if map.insert(key, value).is_some() {
                    return Err(de::Error::custom("duplicate key in map"));
                }
            }
            Ok(map)
        }
    }
}
