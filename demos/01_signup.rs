use srp6::{ClearTextPassword, ClientHandshake, Group, UserDetails, UsernameRef};

fn main() {
    // this is what a user would enter in a form / terminal
    let new_username: UsernameRef = "Bob";
    let user_password: &ClearTextPassword = "secret-password";

    let group = Group::n4096();
    let client = ClientHandshake::<sha2::Sha256>::new(group);
    let (salt, verifier) = client.generate_salt_and_verifier(new_username, user_password);

    let user_details = UserDetails {
        username: new_username.to_owned(),
        salt,
        verifier,
    };

    println!("Simulating a server and signup with user {}", new_username);
    println!(" - User's username   [I] = {:?}", &user_details.username);
    println!(" - Salt              [s] = {}", hex::encode(&user_details.salt));
    println!(" - Password verifier [v] = {}", &user_details.verifier);
    println!("This is a one time action, normally this data is stored in a user database");
    println!();
    println!("Next authentication process `cargo run --example 02_authentication`");
}
