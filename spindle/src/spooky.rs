//! SpookyHash V2, a 128-bit non-cryptographic hash.
//!
//! Messages shorter than `BUF_SIZE` take a cheaper path over 32-byte blocks; longer ones are
//! mixed in 96-byte blocks into twelve 64-bit lanes. Words are always read little-endian, so
//! fingerprints are stable across hosts.

use crate::error::EncodeError;
use crate::primitive::{fixed, Primitive};
use crate::stream::SCRATCH_LEN;
use std::fmt::{self, Debug, Display, Formatter, LowerHex};
use std::hash::{BuildHasher, Hasher};
use std::str::FromStr;

const NUM_VARS: usize = 12;
const BLOCK_SIZE: usize = NUM_VARS * 8;
const BUF_SIZE: usize = 2 * BLOCK_SIZE;
const CONST: u64 = 0xdead_beef_dead_beef;

const MIX_ROT: [u32; NUM_VARS] = [11, 32, 43, 31, 17, 28, 39, 57, 55, 54, 22, 46];
const END_ROT: [u32; NUM_VARS] = [44, 15, 34, 21, 38, 33, 10, 13, 38, 53, 42, 54];

/// A 128-bit SpookyHash V2 fingerprint.
///
/// Formats as 32 lowercase hex digits of both halves in little-endian byte order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sh128 {
    pub a: u64,
    pub b: u64,
}

impl Sh128 {
    pub const fn new(a: u64, b: u64) -> Sh128 {
        Sh128 { a, b }
    }

    /// Hashes `bytes` with both seeds zero.
    pub fn compute(bytes: &[u8]) -> Sh128 {
        hash128(bytes, Sh128::default())
    }

    /// Hashes the UTF-8 bytes of `value`.
    pub fn compute_str(value: &str) -> Sh128 {
        Sh128::compute(value.as_bytes())
    }

    /// Hashes the wire bytes of a primitive value.
    pub fn compute_value<T: Primitive>(value: T) -> Result<Sh128, EncodeError> {
        let mut buf = [0u8; SCRATCH_LEN];
        let bytes = &mut buf[..T::WIDTH];
        value.put(bytes)?;
        Ok(Sh128::compute(bytes))
    }

    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.a.to_le_bytes());
        out[8..].copy_from_slice(&self.b.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Sh128 {
        Sh128 {
            a: u64::from_le_bytes(fixed(&bytes[..8])),
            b: u64::from_le_bytes(fixed(&bytes[8..])),
        }
    }
}

impl From<[u8; 16]> for Sh128 {
    fn from(bytes: [u8; 16]) -> Sh128 {
        Sh128::from_bytes(bytes)
    }
}

impl From<Sh128> for [u8; 16] {
    fn from(hash: Sh128) -> [u8; 16] {
        hash.to_bytes()
    }
}

impl Display for Sh128 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl LowerHex for Sh128 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        Display::fmt(self, f)
    }
}

impl Debug for Sh128 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Sh128({})", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseSh128Error {
    /// The input was not exactly 32 characters long.
    Length(usize),
    Hex(hex::FromHexError),
}

impl std::error::Error for ParseSh128Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseSh128Error::Hex(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for ParseSh128Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ParseSh128Error::Length(len) => write!(f, "Expected 32 hex digits, got {} characters", len),
            ParseSh128Error::Hex(e) => write!(f, "Invalid hex: {}", e),
        }
    }
}

/// Accepts exactly the 32 lowercase hex digits that `Display` produces.
impl FromStr for Sh128 {
    type Err = ParseSh128Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSh128Error::Length(s.len()));
        }
        if let Some(index) = s.bytes().position(|b| b.is_ascii_uppercase()) {
            let c = char::from(s.as_bytes()[index]);
            return Err(ParseSh128Error::Hex(hex::FromHexError::InvalidHexCharacter { c, index }));
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes).map_err(ParseSh128Error::Hex)?;
        Ok(Sh128::from_bytes(bytes))
    }
}

#[inline]
fn words(block: &[u8]) -> [u64; NUM_VARS] {
    let mut out = [0u64; NUM_VARS];
    for (word, bytes) in out.iter_mut().zip(block.chunks_exact(8)) {
        *word = u64::from_le_bytes(fixed(bytes));
    }
    out
}

#[inline]
fn word(bytes: &[u8], i: usize) -> u64 {
    u64::from_le_bytes(fixed(&bytes[i * 8..]))
}

fn initial_state(seed1: u64, seed2: u64) -> [u64; NUM_VARS] {
    [seed1, seed2, CONST, seed1, seed2, CONST, seed1, seed2, CONST, seed1, seed2, CONST]
}

/// Folds one block into the lanes.
#[inline]
fn mix(data: &[u64; NUM_VARS], s: &mut [u64; NUM_VARS]) {
    for i in 0..NUM_VARS {
        let (next, wrap, prev) = ((i + 1) % NUM_VARS, (i + 2) % NUM_VARS, (i + 11) % NUM_VARS);
        s[i] = s[i].wrapping_add(data[i]);
        s[wrap] ^= s[(i + 10) % NUM_VARS];
        s[prev] ^= s[i];
        s[i] = s[i].rotate_left(MIX_ROT[i]);
        s[prev] = s[prev].wrapping_add(s[next]);
    }
}

fn end_partial(h: &mut [u64; NUM_VARS]) {
    for i in 0..NUM_VARS {
        let (next, wrap, prev) = ((i + 1) % NUM_VARS, (i + 2) % NUM_VARS, (i + 11) % NUM_VARS);
        h[prev] = h[prev].wrapping_add(h[next]);
        h[wrap] ^= h[prev];
        h[next] = h[next].rotate_left(END_ROT[i]);
    }
}

fn end(data: &[u64; NUM_VARS], h: &mut [u64; NUM_VARS]) {
    for (lane, word) in h.iter_mut().zip(data) {
        *lane = lane.wrapping_add(*word);
    }
    end_partial(h);
    end_partial(h);
    end_partial(h);
}

/// Mixes the zero-padded last partial block, whose final byte holds its length.
fn end_block(rest: &[u8], h: &mut [u64; NUM_VARS]) {
    let mut block = [0u8; BLOCK_SIZE];
    block[..rest.len()].copy_from_slice(rest);
    block[BLOCK_SIZE - 1] = rest.len() as u8;
    end(&words(&block), h);
}

#[inline]
fn short_mix(h0: &mut u64, h1: &mut u64, h2: &mut u64, h3: &mut u64) {
    *h2 = h2.rotate_left(50); *h2 = h2.wrapping_add(*h3); *h0 ^= *h2;
    *h3 = h3.rotate_left(52); *h3 = h3.wrapping_add(*h0); *h1 ^= *h3;
    *h0 = h0.rotate_left(30); *h0 = h0.wrapping_add(*h1); *h2 ^= *h0;
    *h1 = h1.rotate_left(41); *h1 = h1.wrapping_add(*h2); *h3 ^= *h1;
    *h2 = h2.rotate_left(54); *h2 = h2.wrapping_add(*h3); *h0 ^= *h2;
    *h3 = h3.rotate_left(48); *h3 = h3.wrapping_add(*h0); *h1 ^= *h3;
    *h0 = h0.rotate_left(38); *h0 = h0.wrapping_add(*h1); *h2 ^= *h0;
    *h1 = h1.rotate_left(37); *h1 = h1.wrapping_add(*h2); *h3 ^= *h1;
    *h2 = h2.rotate_left(62); *h2 = h2.wrapping_add(*h3); *h0 ^= *h2;
    *h3 = h3.rotate_left(34); *h3 = h3.wrapping_add(*h0); *h1 ^= *h3;
    *h0 = h0.rotate_left(5); *h0 = h0.wrapping_add(*h1); *h2 ^= *h0;
    *h1 = h1.rotate_left(36); *h1 = h1.wrapping_add(*h2); *h3 ^= *h1;
}

#[inline]
fn short_end(h0: &mut u64, h1: &mut u64, h2: &mut u64, h3: &mut u64) {
    *h3 ^= *h2; *h2 = h2.rotate_left(15); *h3 = h3.wrapping_add(*h2);
    *h0 ^= *h3; *h3 = h3.rotate_left(52); *h0 = h0.wrapping_add(*h3);
    *h1 ^= *h0; *h0 = h0.rotate_left(26); *h1 = h1.wrapping_add(*h0);
    *h2 ^= *h1; *h1 = h1.rotate_left(51); *h2 = h2.wrapping_add(*h1);
    *h3 ^= *h2; *h2 = h2.rotate_left(28); *h3 = h3.wrapping_add(*h2);
    *h0 ^= *h3; *h3 = h3.rotate_left(9); *h0 = h0.wrapping_add(*h3);
    *h1 ^= *h0; *h0 = h0.rotate_left(47); *h1 = h1.wrapping_add(*h0);
    *h2 ^= *h1; *h1 = h1.rotate_left(54); *h2 = h2.wrapping_add(*h1);
    *h3 ^= *h2; *h2 = h2.rotate_left(32); *h3 = h3.wrapping_add(*h2);
    *h0 ^= *h3; *h3 = h3.rotate_left(25); *h0 = h0.wrapping_add(*h3);
    *h1 ^= *h0; *h0 = h0.rotate_left(63); *h1 = h1.wrapping_add(*h0);
}

fn short(message: &[u8], seed1: u64, seed2: u64) -> Sh128 {
    let length = message.len();
    let mut remainder = length % 32;
    let (mut a, mut b, mut c, mut d) = (seed1, seed2, CONST, CONST);
    let mut rest = message;

    if length > 15 {
        let mut blocks = message.chunks_exact(32);
        for block in &mut blocks {
            c = c.wrapping_add(word(block, 0));
            d = d.wrapping_add(word(block, 1));
            short_mix(&mut a, &mut b, &mut c, &mut d);
            a = a.wrapping_add(word(block, 2));
            b = b.wrapping_add(word(block, 3));
        }
        rest = blocks.remainder();
        if remainder >= 16 {
            c = c.wrapping_add(word(rest, 0));
            d = d.wrapping_add(word(rest, 1));
            short_mix(&mut a, &mut b, &mut c, &mut d);
            rest = &rest[16..];
            remainder -= 16;
        }
    }

    d = d.wrapping_add((length as u64) << 56);
    if remainder == 0 {
        c = c.wrapping_add(CONST);
        d = d.wrapping_add(CONST);
    } else {
        let mut tail = [0u8; 16];
        tail[..remainder].copy_from_slice(&rest[..remainder]);
        c = c.wrapping_add(word(&tail, 0));
        d = d.wrapping_add(word(&tail, 1));
    }
    short_end(&mut a, &mut b, &mut c, &mut d);
    Sh128 { a, b }
}

/// Hashes `message` in one pass. `seed.a` and `seed.b` seed the two halves.
pub fn hash128(message: &[u8], seed: Sh128) -> Sh128 {
    if message.len() < BUF_SIZE {
        return short(message, seed.a, seed.b);
    }
    let mut h = initial_state(seed.a, seed.b);
    let mut blocks = message.chunks_exact(BLOCK_SIZE);
    for block in &mut blocks {
        mix(&words(block), &mut h);
    }
    end_block(blocks.remainder(), &mut h);
    Sh128 { a: h[0], b: h[1] }
}

/// Incremental hashing. Feeding a message in any number of pieces gives the same result as
/// [`hash128`] over the whole message.
#[derive(Clone)]
pub struct SpookyHasher {
    data: [u8; BUF_SIZE],
    /// Holds the seeds in the first two lanes until the first long update.
    state: [u64; NUM_VARS],
    length: u64,
    remainder: usize,
}

impl SpookyHasher {
    pub fn new(seed1: u64, seed2: u64) -> SpookyHasher {
        let mut state = [0u64; NUM_VARS];
        state[0] = seed1;
        state[1] = seed2;
        SpookyHasher { data: [0; BUF_SIZE], state, length: 0, remainder: 0 }
    }

    pub fn update(&mut self, message: &[u8]) {
        let new_length = self.remainder + message.len();
        if new_length < BUF_SIZE {
            self.data[self.remainder..new_length].copy_from_slice(message);
            self.length += message.len() as u64;
            self.remainder = new_length;
            return;
        }

        let mut h = if self.length < BUF_SIZE as u64 {
            initial_state(self.state[0], self.state[1])
        } else {
            self.state
        };
        self.length += message.len() as u64;

        let mut message = message;
        if self.remainder != 0 {
            let prefix = BUF_SIZE - self.remainder;
            self.data[self.remainder..].copy_from_slice(&message[..prefix]);
            mix(&words(&self.data[..BLOCK_SIZE]), &mut h);
            mix(&words(&self.data[BLOCK_SIZE..]), &mut h);
            message = &message[prefix..];
        }

        let mut blocks = message.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            mix(&words(block), &mut h);
        }
        let rest = blocks.remainder();
        self.data[..rest.len()].copy_from_slice(rest);
        self.remainder = rest.len();
        self.state = h;
    }

    /// The hash of everything fed so far. Does not consume the hasher; more updates may follow.
    pub fn finish128(&self) -> Sh128 {
        if self.length < BUF_SIZE as u64 {
            return short(&self.data[..self.length as usize], self.state[0], self.state[1]);
        }
        let mut h = self.state;
        let mut rest = &self.data[..self.remainder];
        if rest.len() >= BLOCK_SIZE {
            mix(&words(&rest[..BLOCK_SIZE]), &mut h);
            rest = &rest[BLOCK_SIZE..];
        }
        end_block(rest, &mut h);
        Sh128 { a: h[0], b: h[1] }
    }
}

impl Default for SpookyHasher {
    fn default() -> Self {
        SpookyHasher::new(0, 0)
    }
}

impl Hasher for SpookyHasher {
    fn finish(&self) -> u64 {
        self.finish128().a
    }

    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    fn write_u16(&mut self, i: u16) {
        self.update(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.update(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.update(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        self.update(&(i as u64).to_le_bytes());
    }
}

/// Builds seeded [`SpookyHasher`]s, for keying `HashMap`s with SpookyHash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpookyBuildHasher {
    pub seed1: u64,
    pub seed2: u64,
}

impl BuildHasher for SpookyBuildHasher {
    type Hasher = SpookyHasher;

    fn build_hasher(&self) -> SpookyHasher {
        SpookyHasher::new(self.seed1, self.seed2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i + 128) as u8).collect()
    }

    #[test]
    fn reference_vectors() {
        let expected: [u32; 24] = [
            0x6bf50919, 0x70de1d26, 0xa2b37298, 0x35bc5fbf, 0x8223b279, 0x5bcb315e,
            0x53fe88a1, 0xf9f1a233, 0xee193982, 0x54f86f29, 0xc8772d36, 0x9ed60886,
            0x5f23d1da, 0x1ed9f474, 0xf2ef0c89, 0x83ec01f9, 0xf274736c, 0x7e9ac0df,
            0xc7aed250, 0xb1015811, 0xe23470f5, 0x48ac20c4, 0xe2ab3cd5, 0x608f8363,
        ];
        for (len, want) in expected.iter().enumerate() {
            assert_eq!(*want, Sh128::compute(&pattern(len)).a as u32, "length {}", len);
        }
    }

    #[test]
    fn long_messages() {
        for (len, want) in [(192, 0x77e012bdu32), (200, 0x1f6f7162), (300, 0x37e2b1da), (511, 0xcc1c8250)] {
            assert_eq!(want, Sh128::compute(&pattern(len)).a as u32, "length {}", len);
        }
    }

    #[test]
    fn fingerprints() {
        assert_eq!("a093e3c4e7df0055d34d472e832d9197", Sh128::compute_str("saxton hale").to_string());
        assert_eq!("e92a4608a1046f50014c9aedff0af819", Sh128::compute_str("saxton half").to_string());
        assert_eq!("1909f56bfc062723c751e8b465ee728b", Sh128::compute(&[]).to_string());
        let buf: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
        assert_eq!("fed7ef41d92f3a93d8d2760a676a430e", Sh128::compute(&buf).to_string());
        assert_eq!("04ee126ac29127903f50c4ed93194244", hash128(&buf, Sh128::new(1, 2)).to_string());
    }

    #[test]
    fn value_fingerprint_uses_wire_bytes() {
        let h = Sh128::compute_value(0x69u32).unwrap();
        assert_eq!("91db5e4c770576412b11d3b225bae8e8", format!("{:x}", h));
        assert_eq!(Sh128::compute(&[0x69, 0, 0, 0]), h);
        assert!(Sh128::compute_value('🦀').is_err());
    }

    #[test]
    fn parse() {
        let h = Sh128::compute_str("saxton hale");
        assert_eq!(h, h.to_string().parse::<Sh128>().unwrap());
        assert_eq!(
            Err(ParseSh128Error::Hex(hex::FromHexError::InvalidHexCharacter { c: 'A', index: 0 })),
            "A093e3c4e7df0055d34d472e832d9197".parse::<Sh128>()
        );
        assert!(matches!("a093E3C4E7DF0055D34D472E832D9197".parse::<Sh128>(), Err(ParseSh128Error::Hex(_))));
        assert_eq!(Err(ParseSh128Error::Length(3)), "abc".parse::<Sh128>());
        assert!(matches!("zz93e3c4e7df0055d34d472e832d9197".parse::<Sh128>(), Err(ParseSh128Error::Hex(_))));
        assert_eq!(h, Sh128::from(<[u8; 16]>::from(h)));
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in (0..600).step_by(7).chain([1000, 4097]) {
            let message: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let want = hash128(&message, Sh128::new(3, 5));
            for _ in 0..5 {
                let mut hasher = SpookyHasher::new(3, 5);
                let mut rest = &message[..];
                while !rest.is_empty() {
                    let n = rng.gen_range(1..300).min(rest.len());
                    hasher.update(&rest[..n]);
                    rest = &rest[n..];
                }
                assert_eq!(want, hasher.finish128(), "length {}", len);
            }
        }
    }

    #[test]
    fn finish_is_not_destructive() {
        let message = pattern(700);
        let mut hasher = SpookyHasher::default();
        hasher.update(&message[..250]);
        assert_eq!(Sh128::compute(&message[..250]), hasher.finish128());
        hasher.update(&message[250..]);
        assert_eq!(Sh128::compute(&message), hasher.finish128());
    }

    #[test]
    fn seeds_matter() {
        let message = b"positional";
        assert_ne!(hash128(message, Sh128::new(0, 0)), hash128(message, Sh128::new(0, 1)));
    }

    #[test]
    fn keys_a_hash_map() {
        let mut map: HashMap<&str, u32, SpookyBuildHasher> = HashMap::default();
        map.insert("one", 1);
        map.insert("two", 2);
        assert_eq!(Some(&2), map.get("two"));
        let mut hasher = SpookyBuildHasher::default().build_hasher();
        hasher.write(b"abc");
        assert_eq!(Sh128::compute(b"abc").a, hasher.finish());
    }
}
