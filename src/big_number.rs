/*!
[`BigNumber`] wraps a [`BigUint`] and is the single integer type the rest of
the crate uses for `N`, `g`, keys, and session secrets.

Every hash input in the protocol wants a big-endian byte encoding, so unlike
the little-endian view some earlier drafts of this crate exposed,
[`BigNumber::to_bytes_be`] and [`BigNumber::to_bytes_be_padded`] are the
primary accessors. A hex string is always read and written big-endian too.
*/
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, Mul, Rem, Sub};

use derive_more::{Display as DeriveDisplay, Error};
use num_bigint::BigUint;
use num_traits::Zero as _;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A big unsigned integer. Values that represent non-secret group elements
/// (`N`, `g`, `A`, `B`, `v`) use this directly; values that must be
/// zeroized on drop (`a`, `b`, `x`, `S`, `K`) wrap it — see [`crate::primitives`].
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Serialize, Deserialize)]
pub struct BigNumber(BigUint);

#[derive(DeriveDisplay, Error, Debug, PartialEq)]
pub enum BigNumberError {
    #[display("invalid hex string")]
    InvalidHexStr,
}

impl Default for BigNumber {
    fn default() -> Self {
        Self(BigUint::zero())
    }
}

impl BigNumber {
    /// `n_bytes` uniformly random bytes, interpreted as a big-endian integer.
    pub fn new_rand(n_bytes: usize) -> Self {
        let mut bytes = vec![0_u8; n_bytes];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self::from_bytes_be(&bytes)
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `raw` is interpreted big-endian, as every RFC2945/5054 value is.
    pub fn from_bytes_be(raw: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(raw))
    }

    pub fn from_hex_be(s: &str) -> Result<Self, BigNumberError> {
        let s = if s.len() % 2 != 0 {
            format!("0{s}")
        } else {
            s.to_owned()
        };
        Ok(Self::from_bytes_be(
            &hex::decode(s).map_err(|_| BigNumberError::InvalidHexStr)?,
        ))
    }

    pub fn modpow(&self, exponent: &Self, modulus: &Self) -> Self {
        Self(self.0.modpow(&exponent.0, &modulus.0))
    }

    /// `ceil(bitlen(self) / 8)`, the minimal big-endian byte length.
    pub fn byte_len(&self) -> usize {
        self.0.bits().div_ceil(8) as usize
    }

    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// Left-zero-pads the big-endian encoding to `len` bytes. If the value
    /// is already at least `len` bytes long it is returned unpadded (it is
    /// up to the caller to ensure values placed into a hash never exceed
    /// the configured `pad_size`).
    pub fn to_bytes_be_padded(&self, len: usize) -> Vec<u8> {
        pad(&self.to_bytes_be(), len)
    }
}

/// Left-zero-pads `bytes` to `len` bytes; returns `bytes` unchanged if it is
/// already at least `len` bytes long.
pub fn pad(bytes: &[u8], len: usize) -> Vec<u8> {
    if bytes.len() >= len {
        return bytes.to_vec();
    }
    let mut out = vec![0_u8; len - bytes.len()];
    out.extend_from_slice(bytes);
    out
}

/// `num_bigint`'s `BigUint` does not expose its backing limb storage, so
/// this cannot scrub the original heap allocation the way a raw byte buffer
/// could. Replacing the value with zero is the best this wrapper can do;
/// callers that need a hard guarantee should avoid long-lived `BigNumber`s
/// for secret material (see [`crate::primitives::Secret`]).
impl Zeroize for BigNumber {
    fn zeroize(&mut self) {
        self.0 = BigUint::zero();
    }
}

impl From<u32> for BigNumber {
    fn from(n: u32) -> Self {
        Self(BigUint::from(n))
    }
}

impl From<&[u8]> for BigNumber {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes_be(bytes)
    }
}

impl From<BigNumber> for String {
    fn from(x: BigNumber) -> Self {
        hex::encode_upper(x.to_bytes_be())
    }
}

impl Debug for BigNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BigNumber({self})")
    }
}

impl Display for BigNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_upper(self.to_bytes_be()))
    }
}

impl Rem for &BigNumber {
    type Output = BigNumber;
    fn rem(self, rhs: &BigNumber) -> BigNumber {
        BigNumber(&self.0 % &rhs.0)
    }
}

impl Add for &BigNumber {
    type Output = BigNumber;
    fn add(self, rhs: &BigNumber) -> BigNumber {
        BigNumber(&self.0 + &rhs.0)
    }
}

impl Sub for &BigNumber {
    type Output = BigNumber;
    fn sub(self, rhs: &BigNumber) -> BigNumber {
        BigNumber(&self.0 - &rhs.0)
    }
}

impl Mul for &BigNumber {
    type Output = BigNumber;
    fn mul(self, rhs: &BigNumber) -> BigNumber {
        BigNumber(&self.0 * &rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modpow_matches_textbook_arithmetic() {
        let a = BigNumber::from(6u32);
        let p = BigNumber::from(3u32);
        let m = BigNumber::from(7u32);
        assert_eq!(a.modpow(&p, &m), BigNumber::from(6u32));
    }

    #[test]
    fn hex_round_trips() {
        let x = BigNumber::from_hex_be("AB11CD").unwrap();
        assert_eq!(x.to_bytes_be(), &[0xAB, 0x11, 0xCD]);
        assert_eq!(String::from(x), "AB11CD");
    }

    #[test]
    fn odd_length_hex_is_accepted() {
        assert_eq!(BigNumber::from_hex_be("6").unwrap(), BigNumber::from(6u32));
    }

    #[test]
    fn padding_left_zero_extends() {
        let x = BigNumber::from_bytes_be(&[0x11, 0xCD]);
        assert_eq!(x.to_bytes_be_padded(4), vec![0, 0, 0x11, 0xCD]);
    }

    #[test]
    fn padding_is_idempotent() {
        let bytes = BigNumber::new_rand(8).to_bytes_be();
        let once = pad(&bytes, 32);
        let twice = pad(&once, 32);
        assert_eq!(once, twice);
    }

    #[test]
    fn padding_is_noop_when_already_long_enough() {
        let bytes = vec![0xFF; 4];
        assert_eq!(pad(&bytes, 2), bytes);
    }

    #[test]
    fn new_rand_produces_distinct_values() {
        assert_ne!(BigNumber::new_rand(16), BigNumber::new_rand(16));
    }

    #[test]
    fn zeroize_clears_value() {
        let mut x = BigNumber::from(42u32);
        x.zeroize();
        assert!(x.is_zero());
    }
}
