/*!
This module defines a list of all primitive types and functions
needed to express the meaning of certain variables better.

For instance in [RFC2945] the big prime number that acts
as the modulus in every mathematical power operation is called `N`.

In order to increase readability the type of `N` is
an alias to [`BigNumber`] that aims to express the meaning,
so [`PrimeModulus`] is same as `N` which is a [`BigNumber`].

This scheme is applied for all variables used in the calculus. Values
that must not outlive the handshake that produced them (`a`, `b`, `x`,
`S`, `K`) are wrapped in [`zeroize::Zeroizing`] so they are scrubbed the
moment they go out of scope; everything else (`N`, `g`, `A`, `B`, `v`,
salts and proofs) is ordinary, serializable data.

[RFC2945]: https://datatracker.ietf.org/doc/html/rfc2945
*/
use log::debug;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::big_number::BigNumber;
use crate::groups::Group;
use crate::hash::{self, Digest};
#[cfg(feature = "norand")]
use crate::protocol_details::testdata;
use crate::{Result, Srp6Error};

/// Refers to a large safe prime called `N` (`N = 2q+1`, where `q` is prime)
#[doc(alias = "N")]
pub type PrimeModulus = BigNumber;

/// Refers to the modulus generator `g`
#[doc(alias = "g")]
pub type Generator = BigNumber;

/// Refers to a User's salt called `s`. An opaque byte string, not a number.
#[doc(alias = "s")]
pub type Salt = Vec<u8>;

/// Refers to a Public shared key called A (user), B (server)
#[doc(alias("A", "B"))]
pub type PublicKey = BigNumber;

/// Refers to a private secret random number a (user), b (server). Zeroized
/// on drop since recovering it lets an attacker impersonate its owner.
#[doc(alias("a", "b"))]
pub type PrivateKey = Zeroizing<BigNumber>;

/// Password Verifier is the users secret on the server side
#[doc(alias = "v")]
pub type PasswordVerifier = BigNumber;

/// Refers to a multiplier parameter `k` (`k = H(PAD(N), PAD(g))` in SRP-6a)
#[doc(alias = "k")]
pub type MultiplierParameter = BigNumber;

/// Refers to the raw session key `S`. Zeroized on drop.
#[doc(alias = "S")]
pub type SessionKey = Zeroizing<BigNumber>;
/// Refers to the derived session key `K = H(PAD(S))`. Zeroized on drop.
#[doc(alias = "K")]
pub type StrongSessionKey = Zeroizing<Vec<u8>>;

/// Refers to `M1`, the client's proof of `K`.
#[doc(alias = "M1")]
pub type Proof = Vec<u8>;
/// Refers to `M2`, the server's proof of `K`.
#[doc(alias = "M2")]
pub type StrongProof = Vec<u8>;

/// Username `I` as [`String`]
#[doc(alias = "I")]
pub type Username = String;
/// Username reference `I` as [`&str`]
pub type UsernameRef<'a> = &'a str;
/// Clear text password `p` as [`str`]
#[doc(alias = "p")]
pub type ClearTextPassword = str;

/// [`Username`] and [`ClearTextPassword`] used on the client side
#[derive(Debug, Clone)]
pub struct UserCredentials<'a> {
    pub username: UsernameRef<'a>,
    pub password: &'a ClearTextPassword,
}

/// User details composes [`Username`], [`Salt`] and [`PasswordVerifier`] in one struct.
/// This is what a server persists per account; it never sees the cleartext password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    pub username: Username,
    pub salt: Salt,
    pub verifier: PasswordVerifier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHandshake {
    pub username: Username,
    pub user_publickey: PublicKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerHandshake {
    pub salt: Salt,
    pub server_publickey: PublicKey,
}

/// `v = g^x % N`. Only ever computed once, at signup / password change.
#[allow(non_snake_case)]
pub(crate) fn calculate_password_verifier_v(group: &Group, x: &PrivateKey) -> PasswordVerifier {
    let v = group.g.modpow(x, &group.n);
    debug!("v = {v:?}");
    v
}

/// `x = H(s | H(I ":" p))`
#[allow(non_snake_case)]
pub(crate) fn calculate_private_key_x<D: Digest>(
    I: UsernameRef,
    p: &ClearTextPassword,
    s: &Salt,
) -> PrivateKey {
    let x = hash::compute_private_key::<D>(I, p.as_bytes(), s);
    debug!("x = {x:?}");
    Zeroizing::new(x)
}

/// `x = H(s | H(":" p))` — the raw byte-string password variant: the
/// username is omitted from the inner hash rather than supplied as an
/// empty string. Useful for callers whose password material is not
/// naturally paired with a username at the point `x` is derived.
pub(crate) fn calculate_private_key_x_raw<D: Digest>(p: &[u8], s: &Salt) -> PrivateKey {
    let x = hash::compute_private_key_raw::<D>(p, s);
    debug!("x = {x:?}");
    Zeroizing::new(x)
}

/// `A = g^a % N`
#[allow(non_snake_case)]
pub(crate) fn calculate_pubkey_A(group: &Group, a: &PrivateKey) -> PublicKey {
    let A = group.g.modpow(a, &group.n);
    debug!("A = {A:?}");
    A
}

/// `B = (k*v + g^b) % N`
#[allow(non_snake_case)]
pub(crate) fn calculate_pubkey_B<D: Digest>(
    group: &Group,
    v: &PasswordVerifier,
    b: &PrivateKey,
) -> PublicKey {
    let k = hash::compute_k::<D>(&group.n, &group.g, group.pad_size());
    let g_pow_b = group.g.modpow(b, &group.n);
    let kv = &(&k * v) % &group.n;
    let B = &(&kv + &g_pow_b) % &group.n;
    debug!("k = {k:?}");
    debug!("B = {B:?}");
    B
}

/// Client-side shared secret: `S = (B - k*g^x) ^ (a + u*x) % N`.
///
/// Fails with [`Srp6Error::NullServerKey`] if `B mod N == 0` or if the
/// derived scrambling parameter `u` is zero — both are the client-side
/// safeguards this protocol requires before any key material is derived.
#[allow(non_snake_case)]
pub(crate) fn calculate_shared_secret_client<D: Digest>(
    group: &Group,
    A: &PublicKey,
    a: &PrivateKey,
    B: &PublicKey,
    x: &PrivateKey,
) -> Result<SessionKey> {
    if (B % &group.n).is_zero() {
        return Err(Srp6Error::NullServerKey);
    }

    let pad_size = group.pad_size();
    let u = hash::compute_u::<D>(&A.to_bytes_be(), &B.to_bytes_be(), pad_size);
    if u.is_zero() {
        return Err(Srp6Error::NullServerKey);
    }

    let k = hash::compute_k::<D>(&group.n, &group.g, pad_size);
    let g_pow_x = group.g.modpow(x, &group.n);
    let k_g_pow_x = &(&k * &g_pow_x) % &group.n;
    // (N + B - k*g^x) mod N, staying in unsigned arithmetic throughout.
    let base = &(&(&group.n + B) - &k_g_pow_x) % &group.n;
    let u_times_x: BigNumber = &u * &**x;
    let exponent: BigNumber = &**a + &u_times_x;
    let S = base.modpow(&exponent, &group.n);

    debug!("u = {u:?}");
    debug!("S = {S:?}");
    Ok(Zeroizing::new(S))
}

/// Server-side shared secret: `S = (A * v^u) ^ b % N`.
///
/// Fails with [`Srp6Error::NullClientKey`] if `A mod N == 0`.
#[allow(non_snake_case)]
pub(crate) fn calculate_shared_secret_server<D: Digest>(
    group: &Group,
    A: &PublicKey,
    B: &PublicKey,
    b: &PrivateKey,
    v: &PasswordVerifier,
) -> Result<SessionKey> {
    if (A % &group.n).is_zero() {
        return Err(Srp6Error::NullClientKey);
    }

    let pad_size = group.pad_size();
    let u = hash::compute_u::<D>(&A.to_bytes_be(), &B.to_bytes_be(), pad_size);
    let v_pow_u = v.modpow(&u, &group.n);
    let base = &(A * &v_pow_u) % &group.n;
    let S = base.modpow(b, &group.n);

    debug!("u = {u:?}");
    debug!("S = {S:?}");
    Ok(Zeroizing::new(S))
}

/// `K = H(PAD(S))`
#[allow(non_snake_case)]
pub(crate) fn calculate_session_key<D: Digest>(
    group: &Group,
    S: &SessionKey,
) -> StrongSessionKey {
    let K = hash::compute_session_key::<D>(S, group.pad_size());
    debug!("K = {K:02x?}");
    Zeroizing::new(K)
}

/// `M1 = H( H(PAD(N)) xor H(g) | H(I) | s | PAD(A) | PAD(B) | K )`
#[allow(non_snake_case)]
pub(crate) fn calculate_client_proof<D: Digest>(
    group: &Group,
    I: UsernameRef,
    s: &Salt,
    A: &PublicKey,
    B: &PublicKey,
    K: &StrongSessionKey,
) -> Proof {
    let M1 = hash::compute_client_proof::<D>(
        &group.n,
        &group.g,
        I,
        s,
        &A.to_bytes_be(),
        &B.to_bytes_be(),
        K,
        group.pad_size(),
    );
    debug!("M1 = {M1:02x?}");
    M1
}

/// `M2 = H(PAD(A) | M1 | K)`
#[allow(non_snake_case)]
pub(crate) fn calculate_server_proof<D: Digest>(
    group: &Group,
    A: &PublicKey,
    M1: &Proof,
    K: &StrongSessionKey,
) -> StrongProof {
    let M2 = hash::compute_server_proof::<D>(&A.to_bytes_be(), M1, K, group.pad_size());
    debug!("M2 = {M2:02x?}");
    M2
}

/// The client's secret ephemeral exponent `a`, `n_bytes` of uniform randomness.
///
/// Under the `norand` feature this returns the fixed RFC5054 Appendix B
/// vector instead, so a handshake can be replayed against known values.
#[allow(unused_variables)]
pub(crate) fn generate_private_key_a(n_bytes: usize) -> PrivateKey {
    #[cfg(not(feature = "norand"))]
    return Zeroizing::new(BigNumber::new_rand(n_bytes));
    #[cfg(feature = "norand")]
    Zeroizing::new(BigNumber::from_bytes_be(&testdata::A_PRIVATE))
}

/// The server's secret ephemeral exponent `b`. See [`generate_private_key_a`].
#[allow(unused_variables)]
pub(crate) fn generate_private_key_b(n_bytes: usize) -> PrivateKey {
    #[cfg(not(feature = "norand"))]
    return Zeroizing::new(BigNumber::new_rand(n_bytes));
    #[cfg(feature = "norand")]
    Zeroizing::new(BigNumber::from_bytes_be(&testdata::B_PRIVATE))
}

/// `s`, a random salt. RFC5054 recommends at least 16 bytes. Under the
/// `norand` feature this returns the fixed RFC5054 Appendix B salt instead.
#[allow(unused_variables)]
pub(crate) fn generate_salt(n_bytes: usize) -> Salt {
    #[cfg(not(feature = "norand"))]
    {
        let mut salt = vec![0_u8; n_bytes];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut salt);
        return salt;
    }
    #[cfg(feature = "norand")]
    testdata::SALT.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::Group;
    use sha1::Sha1;

    #[test]
    #[allow(non_snake_case)]
    fn client_and_server_shared_secrets_agree() {
        let group = Group::n1024();
        let x = Zeroizing::new(BigNumber::from(7u32));
        let v = calculate_password_verifier_v(&group, &x);

        let a = generate_private_key_a(32);
        let A = calculate_pubkey_A(&group, &a);
        let b = generate_private_key_b(32);
        let B = calculate_pubkey_B::<Sha1>(&group, &v, &b);

        let client_S = calculate_shared_secret_client::<Sha1>(&group, &A, &a, &B, &x).unwrap();
        let server_S = calculate_shared_secret_server::<Sha1>(&group, &A, &B, &b, &v).unwrap();
        assert_eq!(*client_S, *server_S);
    }

    #[test]
    #[allow(non_snake_case)]
    fn null_client_key_is_rejected() {
        let group = Group::n1024();
        let b = generate_private_key_b(32);
        let v = BigNumber::from(2u32);
        let B = calculate_pubkey_B::<Sha1>(&group, &v, &b);
        let A = BigNumber::zero();
        let err = calculate_shared_secret_server::<Sha1>(&group, &A, &B, &b, &v).unwrap_err();
        assert!(matches!(err, Srp6Error::NullClientKey));
    }

    #[test]
    #[allow(non_snake_case)]
    fn null_server_key_is_rejected() {
        let group = Group::n1024();
        let a = generate_private_key_a(32);
        let A = calculate_pubkey_A(&group, &a);
        let x = Zeroizing::new(BigNumber::from(3u32));
        let B = BigNumber::zero();
        let err = calculate_shared_secret_client::<Sha1>(&group, &A, &a, &B, &x).unwrap_err();
        assert!(matches!(err, Srp6Error::NullServerKey));
    }

    #[test]
    fn generated_salts_are_distinct() {
        assert_ne!(generate_salt(16), generate_salt(16));
    }

    #[test]
    #[allow(non_snake_case)]
    fn client_key_equal_to_N_is_rejected() {
        // A == N is congruent to 0 mod N, same as the literal-zero case.
        let group = Group::n1024();
        let b = generate_private_key_b(32);
        let v = BigNumber::from(2u32);
        let B = calculate_pubkey_B::<Sha1>(&group, &v, &b);
        let A = group.n.clone();
        let err = calculate_shared_secret_server::<Sha1>(&group, &A, &B, &b, &v).unwrap_err();
        assert!(matches!(err, Srp6Error::NullClientKey));
    }

    #[test]
    #[allow(non_snake_case)]
    fn server_key_equal_to_N_is_rejected() {
        let group = Group::n1024();
        let a = generate_private_key_a(32);
        let A = calculate_pubkey_A(&group, &a);
        let x = Zeroizing::new(BigNumber::from(3u32));
        let B = group.n.clone();
        let err = calculate_shared_secret_client::<Sha1>(&group, &A, &a, &B, &x).unwrap_err();
        assert!(matches!(err, Srp6Error::NullServerKey));
    }
}
