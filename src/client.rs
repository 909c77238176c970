/*!
The client (user) side of a handshake, modeled as a small typestate chain:
each step consumes the previous one, so a half-finished handshake cannot be
driven twice or out of order — the compiler enforces the flow the server
side of [RFC2945] expects.

```plain
ClientHandshake -> ClientAwaitingProofCheck -> StrongSessionKey
```
[RFC2945]: https://datatracker.ietf.org/doc/html/rfc2945
*/
use std::marker::PhantomData;

use subtle::ConstantTimeEq;

use crate::groups::Group;
use crate::hash::Digest;
use crate::primitives::{
    calculate_client_proof, calculate_password_verifier_v, calculate_private_key_x,
    calculate_private_key_x_raw, calculate_pubkey_A, calculate_server_proof,
    calculate_session_key, calculate_shared_secret_client, generate_private_key_a, generate_salt,
    ClearTextPassword, PasswordVerifier, PrivateKey, Proof, PublicKey, Salt, ServerHandshake,
    StrongProof, StrongSessionKey, UserCredentials, UserHandshake, Username, UsernameRef,
};
use crate::{Result, Srp6Error};

/// A user about to start a handshake against a known [`Group`].
#[derive(Debug, Clone)]
pub struct ClientHandshake<D: Digest> {
    group: Group,
    _digest: PhantomData<D>,
}

impl<D: Digest> ClientHandshake<D> {
    pub fn new(group: Group) -> Self {
        Self {
            group,
            _digest: PhantomData,
        }
    }

    /// Signup-time only: derives a fresh 16-byte salt and the password
    /// verifier `v = g^x mod N` the server persists against `username`. Never
    /// call this again for an existing account — a fresh salt changes `x`
    /// and therefore invalidates every previously stored verifier.
    pub fn generate_salt_and_verifier(
        &self,
        username: UsernameRef,
        password: &ClearTextPassword,
    ) -> (Salt, PasswordVerifier) {
        let salt = generate_salt(16);
        let x = calculate_private_key_x::<D>(username, password, &salt);
        let verifier = calculate_password_verifier_v(&self.group, &x);
        (salt, verifier)
    }

    /// Raw byte-string password variant of [`Self::generate_salt_and_verifier`]:
    /// `x = H(salt | H(":" password))`, omitting the username from the
    /// inner hash entirely rather than hashing it alongside the password.
    pub fn generate_salt_and_verifier_raw_password(
        &self,
        password: &[u8],
    ) -> (Salt, PasswordVerifier) {
        let salt = generate_salt(16);
        let x = calculate_private_key_x_raw::<D>(password, &salt);
        let verifier = calculate_password_verifier_v(&self.group, &x);
        (salt, verifier)
    }

    /// Draws a fresh ephemeral key pair `(a, A)` and produces the first
    /// message sent to the server.
    ///
    /// Resamples `a` whenever `A mod N == 0`; this is astronomically
    /// unlikely for a properly sized group but cheap to guard against.
    #[allow(non_snake_case)]
    pub fn start(self, username: impl Into<Username>) -> (ClientAwaitingServerProof<D>, UserHandshake) {
        let username = username.into();
        let (a, A) = loop {
            let a = generate_private_key_a(32);
            let A = calculate_pubkey_A(&self.group, &a);
            if !(&A % &self.group.n).is_zero() {
                break (a, A);
            }
        };
        let handshake = UserHandshake {
            username: username.clone(),
            user_publickey: A.clone(),
        };
        (
            ClientAwaitingServerProof {
                group: self.group,
                username,
                a,
                A,
                _digest: PhantomData,
            },
            handshake,
        )
    }
}

/// Holds the client's ephemeral key pair until the server's half of the
/// handshake arrives.
pub struct ClientAwaitingServerProof<D: Digest> {
    group: Group,
    username: Username,
    a: PrivateKey,
    #[allow(non_snake_case)]
    A: PublicKey,
    _digest: PhantomData<D>,
}

impl<D: Digest> ClientAwaitingServerProof<D> {
    /// Derives the shared secret from the server's salt and public key,
    /// and produces this client's proof `M1`.
    ///
    /// Fails with [`Srp6Error::NullServerKey`] if `B mod N == 0` or the
    /// scrambling parameter `u` is zero.
    #[allow(non_snake_case)]
    pub fn process_server_handshake(
        self,
        credentials: &UserCredentials,
        server_handshake: &ServerHandshake,
    ) -> Result<(ClientAwaitingProofCheck<D>, Proof)> {
        let x = calculate_private_key_x::<D>(
            credentials.username,
            credentials.password,
            &server_handshake.salt,
        );
        self.finish_with_private_key(x, server_handshake)
    }

    /// Raw byte-string password variant of [`Self::process_server_handshake`]:
    /// derives `x = H(salt | H(":" password))`, omitting the username from
    /// the inner hash. The username is still sent as part of `M1` (it
    /// identifies the account and prevents a malicious server from
    /// correlating two accounts sharing a password); only the `x`
    /// derivation changes.
    #[allow(non_snake_case)]
    pub fn process_server_handshake_with_raw_password(
        self,
        password: &[u8],
        server_handshake: &ServerHandshake,
    ) -> Result<(ClientAwaitingProofCheck<D>, Proof)> {
        let x = calculate_private_key_x_raw::<D>(password, &server_handshake.salt);
        self.finish_with_private_key(x, server_handshake)
    }

    #[allow(non_snake_case)]
    fn finish_with_private_key(
        self,
        x: PrivateKey,
        server_handshake: &ServerHandshake,
    ) -> Result<(ClientAwaitingProofCheck<D>, Proof)> {
        let S = calculate_shared_secret_client::<D>(
            &self.group,
            &self.A,
            &self.a,
            &server_handshake.server_publickey,
            &x,
        )?;
        let K = calculate_session_key::<D>(&self.group, &S);
        let M1 = calculate_client_proof::<D>(
            &self.group,
            &self.username,
            &server_handshake.salt,
            &self.A,
            &server_handshake.server_publickey,
            &K,
        );

        Ok((
            ClientAwaitingProofCheck {
                group: self.group,
                A: self.A,
                M1: M1.clone(),
                K,
                _digest: PhantomData,
            },
            M1,
        ))
    }
}

/// The client has sent `M1` and is waiting on the server's `M2`. RFC2945
/// requires the client show its proof before the server shows its own, so
/// this state has no "go back" — only `verify_server_proof` or drop.
pub struct ClientAwaitingProofCheck<D: Digest> {
    group: Group,
    #[allow(non_snake_case)]
    A: PublicKey,
    #[allow(non_snake_case)]
    M1: Proof,
    K: StrongSessionKey,
    _digest: PhantomData<D>,
}

impl<D: Digest> ClientAwaitingProofCheck<D> {
    /// Verifies the server's `M2` in constant time and, on success, yields
    /// the strong session key `K` both sides now share.
    pub fn verify_server_proof(self, m2: &StrongProof) -> Result<StrongSessionKey> {
        let expected = calculate_server_proof::<D>(&self.group, &self.A, &self.M1, &self.K);
        if expected.len() != m2.len() || expected.as_slice().ct_eq(m2.as_slice()).unwrap_u8() != 1 {
            return Err(Srp6Error::InvalidServerProof);
        }
        Ok(self.K)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::Group;
    use crate::primitives::generate_salt;
    use sha2::Sha256;

    #[test]
    fn signup_verifier_matches_manual_computation() {
        let group = Group::n1024();
        let (salt, verifier) =
            ClientHandshake::<Sha256>::new(group.clone()).generate_salt_and_verifier("alice", "hunter2");
        let x = calculate_private_key_x::<Sha256>("alice", "hunter2", &salt);
        assert_eq!(verifier, calculate_password_verifier_v(&group, &x));
    }

    #[test]
    fn rejects_zero_server_public_key() {
        let group = Group::n1024();
        let (client, _handshake) = ClientHandshake::<Sha256>::new(group.clone()).start("alice");
        let salt = generate_salt(16);
        let server_handshake = ServerHandshake {
            salt,
            server_publickey: PublicKey::from(0u32),
        };
        let credentials = UserCredentials {
            username: "alice",
            password: "hunter2",
        };
        let err = client
            .process_server_handshake(&credentials, &server_handshake)
            .unwrap_err();
        assert!(matches!(err, Srp6Error::NullServerKey));
    }

    /// The raw-password variant must interoperate with the ordinary
    /// username-keyed server side as long as both sides are only told the
    /// same `(salt, password)` — the username is never part of `x` here.
    #[test]
    fn raw_password_variant_round_trips_with_server() {
        use crate::server::ServerHandshake as ServerHandshakeSession;

        let group = Group::n1024();
        let username = "raw-user";
        let password: &[u8] = b"correct horse battery staple";

        let (salt, verifier) = ClientHandshake::<Sha256>::new(group.clone())
            .generate_salt_and_verifier_raw_password(password);

        let (client, client_hello) = ClientHandshake::<Sha256>::new(group.clone()).start(username);
        let server =
            ServerHandshakeSession::<Sha256>::new(group, username, salt, verifier);
        let (server, server_hello) = server.start(client_hello.user_publickey);

        let (client, m1) = client
            .process_server_handshake_with_raw_password(password, &server_hello)
            .unwrap();
        let (m2, server_key) = server.verify_client_proof(&server_hello.salt, &m1).unwrap();
        let client_key = client.verify_server_proof(&m2).unwrap();

        assert_eq!(*client_key, *server_key);
    }
}
