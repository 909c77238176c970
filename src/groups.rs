/*!
Predefined SRP groups `(N, g)`.

The 1024-bit modulus is the safe prime from [RFC5054] Appendix A, transcribed
directly as a hex literal (and cross-checked against the Appendix B test
vectors in [`crate::protocol_details::testdata`]). The 1536-bit and larger
moduli are the same Appendix A primes, which RFC5054 in turn inherits
byte-for-byte from the Oakley/MODP groups in [RFC3526]; rather than
re-transcribing several kilobytes of hex by hand, this module sources them
from the `srp` crate's `groups` table (RustCrypto's SRP implementation,
already present in this codebase's retrieval set — see DESIGN.md), which
carries the same constants under test. The generator is `2` for every
predefined group.

[RFC5054]: https://datatracker.ietf.org/doc/html/rfc5054#appendix-A
[RFC3526]: https://datatracker.ietf.org/doc/html/rfc3526
*/
use hex_literal::hex;
use log::debug;

use crate::big_number::BigNumber;
use crate::{Result, Srp6Error};

/// A named SRP group: a safe prime modulus `N` and generator `g`.
///
/// `pad_size` is cached as `ceil(bitlen(N) / 8)`, the byte length every
/// group element is left-zero-padded to before it enters a hash input.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub n: BigNumber,
    pub g: BigNumber,
    pad_size: usize,
}

impl Group {
    /// Builds a group from arbitrary `(N, g)`. No primality check is
    /// performed; callers are responsible for supplying a safe prime.
    pub fn custom(n: BigNumber, g: BigNumber) -> Self {
        let pad_size = n.byte_len();
        debug!("custom group: pad_size = {pad_size}");
        Self { n, g, pad_size }
    }

    fn predefined(n_bytes: &[u8]) -> Self {
        Self::custom(BigNumber::from_bytes_be(n_bytes), BigNumber::from(2u32))
    }

    /// Builds a group from one of the `srp` crate's verified RFC5054/RFC3526
    /// group tables, converting its `num-bigint` values through a big-endian
    /// byte round-trip so this crate's own `BigNumber` stays the only
    /// integer type its public API exposes.
    fn from_srp_group(group: &srp::groups::Group) -> Self {
        Self::custom(
            BigNumber::from_bytes_be(&group.n.to_bytes_be()),
            BigNumber::from_bytes_be(&group.g.to_bytes_be()),
        )
    }

    /// Byte length every element of `ℤ_N` is padded to before hashing.
    pub fn pad_size(&self) -> usize {
        self.pad_size
    }

    /// Parses a public key (`A` or `B`) received as raw big-endian bytes
    /// over some external transport. No wire format is mandated by this
    /// crate, but a caller that receives `A`/`B` as bytes or hex needs a
    /// fallible entry point rather than the infallible [`BigNumber::from_bytes_be`]:
    /// anything longer than `pad_size` cannot be a valid element of `ℤ_N`
    /// ([`Srp6Error::KeyLengthMismatch`]), and an empty byte string carries
    /// no integer to parse at all ([`Srp6Error::InvalidKey`]).
    pub fn parse_public_key(&self, bytes: &[u8]) -> Result<BigNumber> {
        if bytes.is_empty() {
            return Err(Srp6Error::InvalidKey);
        }
        if bytes.len() > self.pad_size {
            return Err(Srp6Error::KeyLengthMismatch {
                given: bytes.len(),
                expected: self.pad_size,
            });
        }
        Ok(BigNumber::from_bytes_be(bytes))
    }

    pub fn n1024() -> Self {
        Self::predefined(&hex!(
            "EEAF0AB9 ADB38DD6 9C33F80A FA8FC5E8 60726187 75FF3C0B
             9EA2314C 9C256576 D674DF74 96EA81D3 383B4813 D692C6E0
             E0D5D8E2 50B98BE4 8E495C1D 6089DAD1 5DC7D7B4 6154D6B6
             CE8EF4AD 69B15D49 82559B29 7BCF1885 C529F566 660E57EC
             68EDBC3C 05726CC0 2FD4CBF4 976EAA9A FD5138FE 8376435B
             9FC61D2F C0EB06E3"
        ))
    }

    pub fn n1536() -> Self {
        Self::from_srp_group(&srp::groups::G_1536)
    }

    pub fn n2048() -> Self {
        Self::from_srp_group(&srp::groups::G_2048)
    }

    pub fn n3072() -> Self {
        Self::from_srp_group(&srp::groups::G_3072)
    }

    pub fn n4096() -> Self {
        Self::from_srp_group(&srp::groups::G_4096)
    }

    pub fn n6144() -> Self {
        Self::from_srp_group(&srp::groups::G_6144)
    }

    pub fn n8192() -> Self {
        Self::from_srp_group(&srp::groups::G_8192)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_size_matches_bit_length() {
        let g = Group::n1024();
        assert_eq!(g.pad_size(), 128);
    }

    #[test]
    fn custom_group_accepts_arbitrary_parameters() {
        let g = Group::custom(BigNumber::from(37u32), BigNumber::from(3u32));
        assert_eq!(g.pad_size(), 1);
    }

    #[test]
    fn parse_public_key_accepts_bytes_within_pad_size() {
        let g = Group::n1024();
        let parsed = g.parse_public_key(&[0xAB, 0xCD]).unwrap();
        assert_eq!(parsed, BigNumber::from_bytes_be(&[0xAB, 0xCD]));
    }

    #[test]
    fn parse_public_key_rejects_oversized_input() {
        let g = Group::custom(BigNumber::from(37u32), BigNumber::from(3u32));
        let err = g.parse_public_key(&[0x01, 0x02]).unwrap_err();
        assert!(matches!(
            err,
            Srp6Error::KeyLengthMismatch {
                given: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn parse_public_key_rejects_empty_input() {
        let g = Group::n1024();
        let err = g.parse_public_key(&[]).unwrap_err();
        assert!(matches!(err, Srp6Error::InvalidKey));
    }
}
