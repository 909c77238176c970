use std::time::{Duration, Instant};

use sha2::Sha256;
use srp6::{
    ClearTextPassword, ClientHandshake, Group, ServerHandshakeSession, UserCredentials,
    UserDetails, UsernameRef,
};

fn main() {
    let username: UsernameRef = "Bob";
    let password: &ClearTextPassword = "secret-password";
    let group = Group::n4096();

    // new user: this is sent to the server once and stored there
    let (salt, verifier) =
        ClientHandshake::<Sha256>::new(group.clone()).generate_salt_and_verifier(username, password);
    let user_details = UserDetails {
        username: username.to_owned(),
        salt,
        verifier,
    };

    let mut total: Duration = Duration::default();
    #[cfg(debug_assertions)]
    const NLOOPS: u32 = 10;
    #[cfg(not(debug_assertions))]
    const NLOOPS: u32 = 100;

    for _ in 0..NLOOPS {
        let start = Instant::now();

        // client starts a fresh handshake
        let (client, client_hello) = ClientHandshake::<Sha256>::new(group.clone()).start(username);

        // simulate `A` crossing the wire as raw bytes rather than a typed
        // value, and the server parsing it back before use
        let a_on_the_wire = client_hello.user_publickey.to_bytes_be();
        let client_publickey = group
            .parse_public_key(&a_on_the_wire)
            .expect("A did not survive the wire");

        // server loads the persisted verifier/salt and answers
        let server = ServerHandshakeSession::<Sha256>::new(
            group.clone(),
            user_details.username.clone(),
            user_details.salt.clone(),
            user_details.verifier.clone(),
        );
        let (server, server_hello) = server.start(client_publickey);

        // client derives the shared secret and its proof M1
        let credentials = UserCredentials { username, password };
        let (client, m1) = client
            .process_server_handshake(&credentials, &server_hello)
            .expect("client derives shared secret");

        // server verifies M1 and returns its own proof M2
        let (m2, server_key) = server
            .verify_client_proof(&server_hello.salt, &m1)
            .expect("invalid client proof");

        // client verifies M2
        let client_key = client
            .verify_server_proof(&m2)
            .expect("invalid server proof");

        total = total.checked_add(start.elapsed()).unwrap();
        assert_eq!(*client_key, *server_key, "not same session keys");
    }

    println!("Time elapsed in auth is: {:?}", total / NLOOPS);
}
