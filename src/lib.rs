/*!
An implementation of the Secure Remote Password protocol, version 6a
(SRP-6a), as specified by [RFC2945] and [RFC5054].

**Note**: use a group of at least 2048 bits in production — [`groups::Group::n2048`]
or larger. The smaller groups ([`groups::Group::n1024`], [`groups::Group::custom`])
exist purely so tests run fast.

# Usage
See [`demos/`](https://github.com) for a full client/server walkthrough, or
the integration tests below for a self-contained example.

# Handshake flow
The client and server each drive a small typestate chain ([`client::ClientHandshake`],
[`server::ServerHandshake`]) that only allows the messages defined by the
protocol to be sent in the order it defines; there is no mutable, reusable
session object to misuse.

# Further details and domain vocabulary
- [Variable names and message formulas][`protocol_details`]
- [RFC2945](https://datatracker.ietf.org/doc/html/rfc2945) — Secure Remote Password (SRP) protocol
- [RFC5054] — SRP6 for TLS authentication

[RFC5054]: https://datatracker.ietf.org/doc/html/rfc5054
*/
use derive_more::{Display, Error};

#[cfg(doc)]
pub mod protocol_details;
#[cfg(not(doc))]
mod protocol_details;

pub mod groups;
pub(crate) mod primitives;

mod big_number;
mod client;
mod hash;
mod server;

pub use big_number::BigNumber;
pub use client::{ClientAwaitingProofCheck, ClientAwaitingServerProof, ClientHandshake};
pub use groups::Group;
pub use primitives::{
    ClearTextPassword, Generator, MultiplierParameter, PasswordVerifier, PrimeModulus, PrivateKey,
    Proof, PublicKey, Salt, ServerHandshake, SessionKey, StrongProof, StrongSessionKey,
    UserCredentials, UserDetails, UserHandshake, Username, UsernameRef,
};
pub use server::{ServerAwaitingClientProof, ServerHandshake as ServerHandshakeSession};

/// encapsulates a [`Srp6Error`]
pub type Result<T> = std::result::Result<T, Srp6Error>;

#[derive(Error, Display, Debug, PartialEq, serde::Serialize)]
pub enum Srp6Error {
    #[display(
        "the provided key length ({given} bytes) does not match the expected ({expected} bytes)"
    )]
    KeyLengthMismatch { given: usize, expected: usize },

    #[display("the client's public key A was zero modulo N")]
    NullClientKey,

    #[display("the server's public key B was zero modulo N, or the scrambling parameter u was zero")]
    NullServerKey,

    #[display("the client's proof of the session key did not match")]
    InvalidClientProof,

    #[display("the server's proof of the session key did not match")]
    InvalidServerProof,

    #[display("the supplied key bytes could not be parsed as a group element")]
    InvalidKey,
}
