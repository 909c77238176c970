/*!
Hash helpers shared by both the client and the server role.

Every function here is generic over `D: Digest`, so the same code path
serves SHA-1 (needed to reproduce the RFC5054 Appendix B test vectors) and
SHA-256/384/512 (the production digests). Nothing in this module cares
which one it got; `D::output_size()` gives the digest length at runtime.
*/
pub use digest::Digest;

use crate::big_number::{pad, BigNumber};

/// One-shot `H(a ‖ b ‖ ...)` over already-concatenated byte slices.
pub fn hash<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

/// `u = H(PAD(A) | PAD(B))`, interpreted as a big integer.
///
/// Per RFC5054/§4.3, callers MUST treat a zero result as a fatal
/// [`crate::Srp6Error::NullServerKey`] / [`crate::Srp6Error::NullClientKey`]
/// condition; this function only computes the value.
#[allow(non_snake_case)]
pub fn compute_u<D: Digest>(A: &[u8], B: &[u8], pad_size: usize) -> BigNumber {
    let a_pad = pad(A, pad_size);
    let b_pad = pad(B, pad_size);
    BigNumber::from_bytes_be(&hash::<D>(&[&a_pad, &b_pad]))
}

/// `k = H(PAD(N) | PAD(g))`. Note both operands are padded to the same
/// `pad_size`; padding only `g` (as some historical SRP-6 implementations
/// do) does not reproduce the RFC5054 vectors.
#[allow(non_snake_case)]
pub fn compute_k<D: Digest>(n: &BigNumber, g: &BigNumber, pad_size: usize) -> BigNumber {
    let n_pad = n.to_bytes_be_padded(pad_size);
    let g_pad = g.to_bytes_be_padded(pad_size);
    BigNumber::from_bytes_be(&hash::<D>(&[&n_pad, &g_pad]))
}

/// `x = H(salt | H(username ":" password))`.
pub fn compute_private_key<D: Digest>(username: &str, password: &[u8], salt: &[u8]) -> BigNumber {
    let identity_hash = hash::<D>(&[username.as_bytes(), b":", password]);
    BigNumber::from_bytes_be(&hash::<D>(&[salt, &identity_hash]))
}

/// `x = H(salt | H(":" password))`, the raw-password variant: the username
/// is omitted from the inner hash entirely rather than being hashed
/// alongside the password. Equivalent to [`compute_private_key`] with
/// `username = ""`, but spelled out explicitly since callers that already
/// hold a pre-formatted `0x3A | password` message (rather than a separate
/// username) should not have to fabricate an empty username to use it.
pub fn compute_private_key_raw<D: Digest>(password: &[u8], salt: &[u8]) -> BigNumber {
    let message_hash = hash::<D>(&[b":", password]);
    BigNumber::from_bytes_be(&hash::<D>(&[salt, &message_hash]))
}

/// `K = H(PAD(S))`, the session key derived from the raw shared secret.
///
/// RFC 2945 originally specified an interleaved SHA-1-only construction
/// (`SHA_Interleave`); RFC5054/SRP-6a instead hashes the padded secret
/// directly, which is what this crate implements.
#[allow(non_snake_case)]
pub fn compute_session_key<D: Digest>(S: &BigNumber, pad_size: usize) -> Vec<u8> {
    hash::<D>(&[&S.to_bytes_be_padded(pad_size)])
}

/// `M1 = H( H(PAD(N)) xor H(PAD(g)) | H(username) | salt | PAD(A) | PAD(B) | K )`.
#[allow(non_snake_case)]
pub fn compute_client_proof<D: Digest>(
    n: &BigNumber,
    g: &BigNumber,
    username: &str,
    salt: &[u8],
    A: &[u8],
    B: &[u8],
    K: &[u8],
    pad_size: usize,
) -> Vec<u8> {
    let h_n_xor_g = hash_n_xor_g::<D>(n, g, pad_size);
    let h_username = hash::<D>(&[username.as_bytes()]);
    let a_pad = pad(A, pad_size);
    let b_pad = pad(B, pad_size);
    hash::<D>(&[&h_n_xor_g, &h_username, salt, &a_pad, &b_pad, K])
}

/// `M2 = H(PAD(A) | M1 | K)`.
#[allow(non_snake_case)]
pub fn compute_server_proof<D: Digest>(A: &[u8], m1: &[u8], K: &[u8], pad_size: usize) -> Vec<u8> {
    let a_pad = pad(A, pad_size);
    hash::<D>(&[&a_pad, m1, K])
}

/// `H(PAD(N)) xor H(PAD(g))` — both operands padded to `pad_size`, the same
/// rule [`compute_k`] applies.
#[allow(non_snake_case)]
fn hash_n_xor_g<D: Digest>(n: &BigNumber, g: &BigNumber, pad_size: usize) -> Vec<u8> {
    let h_n = hash::<D>(&[&n.to_bytes_be_padded(pad_size)]);
    let h_g = hash::<D>(&[&g.to_bytes_be_padded(pad_size)]);
    h_n.iter().zip(h_g.iter()).map(|(a, b)| a ^ b).collect()
}
