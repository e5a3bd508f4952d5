//! Runs a registration and an authentication against the software platform and prints what the
//! page would display. Set `RUST_LOG=debug` to follow the state transitions.

use url::Url;
use webauthn_demo::{
    client::{Client, Credential, Snapshot, State},
    platform::SoftwarePlatform,
    types::encoding,
};

fn report(snapshot: &Snapshot) {
    println!("state: {}", snapshot.state);
    match &snapshot.credential {
        Some(Credential::Created(credential)) => {
            println!("id: {}", credential.id);
            println!("type: {}", credential.ty);
            println!(
                "attestationObject: {}",
                encoding::base64url(&credential.response.attestation_object)
            );
        }
        Some(Credential::Authenticated(credential)) => {
            println!("id: {}", credential.id);
            println!("type: {}", credential.ty);
        }
        None => {}
    }
    if let Some(credential) = &snapshot.credential {
        println!("clientDataJSON: {}", credential.client_data_text());
    }
    if let Some(key) = &snapshot.public_key {
        println!("publicKey: {key}");
    }
    if let Some(error) = &snapshot.last_error {
        println!("error: {error}");
    }
    println!();
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let origin = Url::parse("https://demo.example").expect("Should Parse");
    let client = Client::new(SoftwarePlatform::new(origin, true));
    report(&client.snapshot());

    let created = client.create().await;
    report(&created);

    let got = client.get().await;
    report(&got);

    if got.state != State::Got {
        log::error!("authentication did not complete");
    }
}
