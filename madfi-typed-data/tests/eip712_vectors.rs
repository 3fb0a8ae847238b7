mod common;

use alloy_primitives::{address, b256, keccak256};
use pretty_assertions::assert_eq;
use serde_json::json;

use madfi_typed_data::errors::TypedDataError;
use madfi_typed_data::signing::{
    Signable, SignerError, assert_signature_is_valid, parse_signature, recover_signer,
};

use common::{RECIPIENT, load_typed_data, minimal_message, registry};

const MAIL: &str = "mail_typed_data.json";

// Signature published alongside the EIP-712 `Mail` example, made with the
// private key `keccak256("cow")`.
const COW_SIGNATURE: &str = "0x4355c47d63924e8a72e509b65029052eb6c299d53a04e167c5775fd466751c9d07299936d304c153f6443dfa05f40ff007d72911b6f72307f996231605b915621c";

#[test]
fn test_mail_encode_type() {
    let registry = load_typed_data(MAIL).registry().unwrap();
    assert_eq!(
        registry.encode_type("Mail").unwrap(),
        "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
    );
    assert_eq!(
        registry.type_hash("Mail").unwrap(),
        b256!("0xa0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2")
    );
    assert_eq!(
        registry.type_hash("Person").unwrap(),
        keccak256("Person(string name,address wallet)")
    );
}

#[test]
fn test_mail_hashes() {
    let typed_data = load_typed_data(MAIL);
    let registry = typed_data.registry().unwrap();

    assert_eq!(
        registry.domain_separator(),
        b256!("0xf2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f")
    );
    assert_eq!(
        registry.hash_struct("Mail", &typed_data.message).unwrap(),
        b256!("0xc52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e")
    );
    assert_eq!(
        typed_data.try_get_hash().unwrap(),
        b256!("0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2")
    );
}

#[test]
fn test_recover_mail_signer() {
    let typed_data = load_typed_data(MAIL);
    let signature = parse_signature(COW_SIGNATURE).unwrap();
    let cow = address!("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826");

    assert_eq!(recover_signer(&typed_data, &signature).unwrap(), cow);
    assert_signature_is_valid(&typed_data, &signature, cow).unwrap();

    let bob = address!("0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB");
    match assert_signature_is_valid(&typed_data, &signature, bob) {
        Err(SignerError::Unauthorized {
            expected,
            recovered,
        }) => {
            assert_eq!(expected, bob);
            assert_eq!(recovered, cow);
        }
        other => panic!("expected unauthorized, got {other:?}"),
    }
}

#[test]
fn test_tampered_message_recovers_someone_else() {
    let mut typed_data = load_typed_data(MAIL);
    typed_data.message["contents"] = json!("Hello, Alice!");
    let signature = parse_signature(COW_SIGNATURE).unwrap();

    let recovered = recover_signer(&typed_data, &signature).unwrap();
    assert_ne!(
        recovered,
        address!("0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826")
    );
}

#[test]
fn test_parse_signature_rejects_bad_input() {
    assert!(matches!(
        parse_signature("0x1234"),
        Err(SignerError::InvalidSignature(_))
    ));
    assert!(matches!(
        parse_signature("not hex"),
        Err(SignerError::InvalidSignature(_))
    ));
}

#[test]
fn test_bound_message_hashes_like_registry() {
    let registry = registry();
    let message = minimal_message();
    let expected = registry.signing_hash(&message).unwrap();

    assert_eq!(registry.bind(&message).try_get_hash().unwrap(), expected);

    let record = madfi_typed_data::bounty::RankedSettleInput {
        bounty_id: alloy_primitives::U256::from(1),
        bid: alloy_primitives::U256::from(100),
        recipient: RECIPIENT,
        rev_share: alloy_primitives::U256::from(500),
        ..Default::default()
    };
    let bound = registry.bind_record(&record).unwrap();
    assert_eq!(bound.try_get_hash().unwrap(), expected);
}

#[test]
fn test_invalid_message_is_reported_before_recovery() {
    let registry = registry();
    let mut message = minimal_message();
    message.as_object_mut().unwrap().remove("bid");
    let signature = parse_signature(COW_SIGNATURE).unwrap();

    match recover_signer(&registry.bind(&message), &signature) {
        Err(SignerError::InvalidMessage(TypedDataError::MissingField { field, .. })) => {
            assert_eq!(field, "bid");
        }
        other => panic!("expected a missing field, got {other:?}"),
    }
}
