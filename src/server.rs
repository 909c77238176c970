/*!
The server (host) side of a handshake, mirroring [`crate::client`]'s
typestate chain:

```plain
ServerHandshake -> ServerAwaitingClientProof -> StrongSessionKey
```
*/
use std::marker::PhantomData;

use subtle::ConstantTimeEq;

use crate::groups::Group;
use crate::hash::Digest;
use crate::primitives::{
    calculate_client_proof, calculate_pubkey_B, calculate_server_proof, calculate_session_key,
    calculate_shared_secret_server, generate_private_key_b, PasswordVerifier, PrivateKey, Proof,
    PublicKey, Salt, ServerHandshake as ServerHandshakeMessage, StrongProof, StrongSessionKey,
    Username,
};
use crate::{Result, Srp6Error};

/// A server about to answer a client's handshake, holding that user's
/// persisted [`crate::primitives::UserDetails`].
#[derive(Debug, Clone)]
pub struct ServerHandshake<D: Digest> {
    group: Group,
    username: Username,
    salt: Vec<u8>,
    verifier: PasswordVerifier,
    _digest: PhantomData<D>,
}

impl<D: Digest> ServerHandshake<D> {
    pub fn new(group: Group, username: impl Into<Username>, salt: Vec<u8>, verifier: PasswordVerifier) -> Self {
        Self {
            group,
            username: username.into(),
            salt,
            verifier,
            _digest: PhantomData,
        }
    }

    /// Draws a fresh ephemeral key pair `(b, B)` and produces the message
    /// sent back to the client.
    ///
    /// Resamples `b` whenever `B mod N == 0`, mirroring the client's
    /// own resample loop in [`crate::client::ClientHandshake::start`].
    #[allow(non_snake_case)]
    pub fn start(
        self,
        client_publickey: PublicKey,
    ) -> (ServerAwaitingClientProof<D>, ServerHandshakeMessage) {
        let (b, B) = loop {
            let b = generate_private_key_b(32);
            let B = calculate_pubkey_B::<D>(&self.group, &self.verifier, &b);
            if !(&B % &self.group.n).is_zero() {
                break (b, B);
            }
        };
        let message = ServerHandshakeMessage {
            salt: self.salt.clone(),
            server_publickey: B.clone(),
        };
        (
            ServerAwaitingClientProof {
                group: self.group,
                username: self.username,
                A: client_publickey,
                B,
                b,
                verifier: self.verifier,
                _digest: PhantomData,
            },
            message,
        )
    }
}

/// Holds the server's ephemeral key pair until the client's proof `M1`
/// arrives.
pub struct ServerAwaitingClientProof<D: Digest> {
    group: Group,
    username: Username,
    #[allow(non_snake_case)]
    A: PublicKey,
    #[allow(non_snake_case)]
    B: PublicKey,
    b: PrivateKey,
    verifier: PasswordVerifier,
    _digest: PhantomData<D>,
}

impl<D: Digest> ServerAwaitingClientProof<D> {
    /// Verifies the client's `M1` in constant time. On success, returns
    /// the server's own proof `M2` (to send back) and the strong session
    /// key `K`.
    ///
    /// Fails with [`Srp6Error::NullClientKey`] if `A mod N == 0`, or with
    /// [`Srp6Error::InvalidClientProof`] if the proof does not match —
    /// per RFC2945 this crate never reveals `M2` in that case.
    #[allow(non_snake_case)]
    pub fn verify_client_proof(
        self,
        salt: &Salt,
        m1: &Proof,
    ) -> Result<(StrongProof, StrongSessionKey)> {
        let S = calculate_shared_secret_server::<D>(
            &self.group,
            &self.A,
            &self.B,
            &self.b,
            &self.verifier,
        )?;
        let K = calculate_session_key::<D>(&self.group, &S);
        let expected_m1 = calculate_client_proof::<D>(
            &self.group,
            &self.username,
            salt,
            &self.A,
            &self.B,
            &K,
        );

        if expected_m1.len() != m1.len() || expected_m1.as_slice().ct_eq(m1.as_slice()).unwrap_u8() != 1 {
            return Err(Srp6Error::InvalidClientProof);
        }

        let m2 = calculate_server_proof::<D>(&self.group, &self.A, m1, &K);
        Ok((m2, K))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientHandshake;
    use crate::groups::Group;
    use crate::primitives::{
        calculate_password_verifier_v, calculate_private_key_x, generate_salt, UserCredentials,
    };
    use sha2::Sha256;

    #[test]
    fn full_handshake_agrees_on_session_key() {
        let group = Group::n1024();
        let username = "carol";
        let password = "correct horse battery staple";
        let salt = generate_salt(16);

        let x = calculate_private_key_x::<Sha256>(username, password, &salt);
        let verifier = calculate_password_verifier_v(&group, &x);

        let (client, client_hello) =
            ClientHandshake::<Sha256>::new(group.clone()).start(username);
        let server = ServerHandshake::<Sha256>::new(group.clone(), username, salt, verifier);
        let (server, server_hello) = server.start(client_hello.user_publickey);

        let credentials = UserCredentials { username, password };
        let (client, m1) = client
            .process_server_handshake(&credentials, &server_hello)
            .unwrap();

        let (m2, server_key) = server.verify_client_proof(&server_hello.salt, &m1).unwrap();
        let client_key = client.verify_server_proof(&m2).unwrap();

        assert_eq!(*client_key, *server_key);
    }

    #[test]
    fn wrong_password_is_rejected_without_leaking_server_proof() {
        let group = Group::n1024();
        let username = "carol";
        let salt = generate_salt(16);

        let x = calculate_private_key_x::<Sha256>(username, "correct horse battery staple", &salt);
        let verifier = calculate_password_verifier_v(&group, &x);

        let (client, client_hello) =
            ClientHandshake::<Sha256>::new(group.clone()).start(username);
        let server = ServerHandshake::<Sha256>::new(group.clone(), username, salt, verifier);
        let (server, server_hello) = server.start(client_hello.user_publickey);

        let credentials = UserCredentials {
            username,
            password: "wrong guess",
        };
        let (_client, m1) = client
            .process_server_handshake(&credentials, &server_hello)
            .unwrap();

        let err = server
            .verify_client_proof(&server_hello.salt, &m1)
            .unwrap_err();
        assert!(matches!(err, Srp6Error::InvalidClientProof));
    }
}
