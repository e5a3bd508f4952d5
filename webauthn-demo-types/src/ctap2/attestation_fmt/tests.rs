use ciborium::cbor;
use coset::CoseKeyBuilder;

use super::*;
use crate::rand::random_vec;

// Authenticator data produced by a YubiKey 5 during registration, with `credProtect` set.
const YUBIKEY_AT_ED: [u8; 195] = [
    0x74, 0xa6, 0xea, 0x92, 0x13, 0xc9, 0x9c, 0x2f, 0x74, 0xb2, 0x24, 0x92, 0xb3, 0x20, 0xcf, 0x40,
    0x26, 0x2a, 0x94, 0xc1, 0xa9, 0x50, 0xa0, 0x39, 0x7f, 0x29, 0x25, 0x0b, 0x60, 0x84, 0x1e, 0xf0,
    0xc5, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x0c, 0x98, 0x51, 0xdc, 0x8b, 0xd1, 0xef, 0x2d, 0x08,
    0x4b, 0x20, 0x1c, 0xbf, 0x5e, 0x4c, 0x14, 0x04, 0x4f, 0xf8, 0x87, 0x04, 0x11, 0x5e, 0x6c, 0x58,
    0x94, 0xb8, 0x69, 0xbb, 0x45, 0x3c, 0x3f, 0xe2, 0x1e, 0xb1, 0x22, 0x44, 0xc6, 0xe7, 0xe9, 0x6a,
    0xbe, 0xd3, 0x0f, 0x18, 0x1b, 0x9f, 0x86, 0xa5, 0x01, 0x02, 0x03, 0x26, 0x20, 0x01, 0x21, 0x58,
    0x20, 0x0c, 0x98, 0x51, 0xdc, 0x8b, 0xd1, 0xef, 0x2d, 0x08, 0x4b, 0x20, 0x1c, 0xbf, 0xad, 0xd9,
    0xa6, 0x97, 0xbb, 0x48, 0xd9, 0xd7, 0xff, 0x91, 0x0f, 0x0a, 0x6a, 0xc1, 0x0b, 0x91, 0x2b, 0xe9,
    0x58, 0x22, 0x58, 0x20, 0x46, 0x78, 0x6f, 0x2a, 0x95, 0x76, 0x69, 0x8c, 0x9f, 0x3a, 0xe2, 0x52,
    0x3b, 0x4e, 0xb9, 0x4b, 0x8e, 0x07, 0x4c, 0x35, 0xab, 0xc4, 0xdf, 0x68, 0x8f, 0xcd, 0x85, 0xd2,
    0x9a, 0x01, 0xab, 0xba, 0xa1, 0x6b, 0x63, 0x72, 0x65, 0x64, 0x50, 0x72, 0x6f, 0x74, 0x65, 0x63,
    0x74, 0x02, 0x00,
];

fn yubikey_data() -> &'static [u8] {
    // the trailing zero is padding for the negative tests below
    &YUBIKEY_AT_ED[..YUBIKEY_AT_ED.len() - 1]
}

fn es256_key(x: Vec<u8>, y: Vec<u8>) -> CoseKey {
    CoseKeyBuilder::new_ec2_pub_key(iana::EllipticCurve::P_256, x, y)
        .algorithm(iana::Algorithm::ES256)
        .build()
}

#[test]
fn parse_yubikey_registration() {
    let auth_data = AuthenticatorData::from_slice(yubikey_data()).expect("could not parse");

    assert_eq!(auth_data.flags, Flags::UP | Flags::UV | Flags::AT | Flags::ED);
    assert_eq!(auth_data.counter, 1);
    assert_eq!(auth_data.rp_id_hash()[..4], [0x74, 0xa6, 0xea, 0x92]);
    assert_eq!(
        auth_data.extensions,
        Some(cbor!({ "credProtect" => 2 }).expect("valid cbor"))
    );

    let acd = auth_data
        .attested_credential_data
        .as_ref()
        .expect("AT flag is set");
    assert_eq!(acd.aaguid, Aaguid::new_empty());
    assert_eq!(acd.credential_id().len(), 0x30);
    assert_eq!(acd.credential_id()[..3], [0x0c, 0x98, 0x51]);
}

#[test]
fn yubikey_public_key_point_is_uncompressed() {
    let auth_data = AuthenticatorData::from_slice(yubikey_data()).expect("could not parse");

    let point = auth_data
        .credential_public_key_point()
        .expect("ES256 key on P-256");

    assert_eq!(point[0], 0x04);
    assert_eq!(point[1..4], [0x0c, 0x98, 0x51]);
    assert_eq!(point[33..36], [0x46, 0x78, 0x6f]);
    assert_eq!(point[64], 0xba);
}

#[test]
fn too_short_is_rejected() {
    let err = AuthenticatorData::from_slice(&yubikey_data()[..36]).expect_err("only 36 bytes");
    assert_eq!(
        err,
        AuthenticatorDataError::TooShort {
            expected: 37,
            actual: 36
        }
    );
}

#[test]
fn truncated_credential_id_is_rejected() {
    let err = AuthenticatorData::from_slice(&yubikey_data()[..60]).expect_err("truncated");
    assert_eq!(err, AuthenticatorDataError::Truncated("credential id"));
}

#[test]
fn trailing_bytes_are_rejected() {
    let err = AuthenticatorData::from_slice(&YUBIKEY_AT_ED).expect_err("one extra byte");
    assert_eq!(err, AuthenticatorDataError::TrailingBytes(1));
}

#[test]
fn reserved_flag_is_rejected() {
    let mut data = yubikey_data().to_vec();
    data[32] |= 1 << 1;
    let err = AuthenticatorData::from_slice(&data).expect_err("reserved bit");
    assert_eq!(err, AuthenticatorDataError::InvalidFlags(0xc7));
}

#[test]
fn assertion_data_has_no_public_key() {
    let auth_data = AuthenticatorData::new("demo.example", 7).set_flags(Flags::UP);
    let bytes = auth_data.to_vec().expect("could not encode");
    assert_eq!(bytes.len(), AUTHENTICATOR_DATA_MIN_LEN);
    // no backup flags on top of what was asked for
    assert_eq!(bytes[32], 0x01);

    let parsed = AuthenticatorData::from_slice(&bytes).expect("could not parse");
    assert_eq!(parsed.flags, Flags::UP);
    assert_eq!(parsed.counter, 7);
    assert_eq!(
        parsed.credential_public_key_point(),
        Err(AuthenticatorDataError::MissingAttestedCredentialData)
    );
}

#[test]
fn round_trip_with_attested_credential_data() {
    let x = random_vec(32);
    let y = random_vec(32);
    let acd = AttestedCredentialData::new(
        Aaguid::new_empty(),
        random_vec(16),
        es256_key(x.clone(), y.clone()),
    )
    .expect("short credential id");
    let expected = AuthenticatorData::new("demo.example", 0).set_attested_credential_data(acd);

    let bytes = expected.to_vec().expect("could not encode");
    let parsed = AuthenticatorData::from_slice(&bytes).expect("could not parse");

    assert_eq!(parsed, expected);
    assert_eq!(parsed.rp_id_hash(), &sha256(b"demo.example"));

    // seeing as these are random, the point is not on the curve, only its layout is checked
    let point = parsed.credential_public_key_point().expect("ES256 key");
    assert_eq!(point[1..33], x[..]);
    assert_eq!(point[33..], y[..]);
}

#[test]
fn other_algorithms_are_unsupported() {
    let key = CoseKeyBuilder::new_ec2_pub_key(
        iana::EllipticCurve::P_384,
        random_vec(48),
        random_vec(48),
    )
    .algorithm(iana::Algorithm::ES384)
    .build();
    let acd = AttestedCredentialData::new(Aaguid::new_empty(), random_vec(16), key)
        .expect("short credential id");

    assert_eq!(
        acd.public_key_point(),
        Err(AuthenticatorDataError::UnsupportedKey("algorithm is not ES256"))
    );
}

#[test]
fn short_coordinates_are_unsupported() {
    let acd = AttestedCredentialData::new(
        Aaguid::new_empty(),
        random_vec(16),
        es256_key(random_vec(31), random_vec(32)),
    )
    .expect("short credential id");

    assert_eq!(
        acd.public_key_point(),
        Err(AuthenticatorDataError::UnsupportedKey(
            "coordinates are not 32 bytes long"
        ))
    );
}

#[test]
fn credential_id_longer_than_u16_is_refused() {
    AttestedCredentialData::new(
        Aaguid::new_empty(),
        vec![0; usize::from(u16::MAX) + 1],
        es256_key(random_vec(32), random_vec(32)),
    )
    .expect_err("credential id does not fit the length prefix");
}
