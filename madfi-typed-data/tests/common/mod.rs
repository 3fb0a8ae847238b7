#![allow(dead_code)]

use std::fs;
use std::path::Path;

use alloy_primitives::{Address, address};
use serde_json::{Value, json};

use madfi_typed_data::TypedSchemaRegistry;
use madfi_typed_data::schema::{default_domain, ranked_settle_registry};
use madfi_typed_data::typed_data::{Domain, TypedData};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

pub(crate) const VERIFYING_CONTRACT: Address =
    address!("0x0000000000000000000000000000000000000001");
pub(crate) const RECIPIENT: Address = address!("0x0000000000000000000000000000000000000002");

pub(crate) fn load_typed_data(file_name: &str) -> TypedData {
    let path = Path::new(FIXTURES_DIR).join(file_name);
    let raw = fs::read_to_string(&path).expect("Error opening the fixture");
    serde_json::from_str(&raw).expect("Error parsing the JSON")
}

pub(crate) fn deployment_domain() -> Domain {
    default_domain()
        .with_chain_id(1)
        .with_verifying_contract(VERIFYING_CONTRACT)
}

pub(crate) fn registry() -> TypedSchemaRegistry {
    ranked_settle_registry(deployment_domain()).expect("ranked settle schema is valid")
}

pub(crate) fn minimal_post_params() -> Value {
    json!({
        "profileId": 0,
        "contentURI": "",
        "actionModules": [],
        "actionModulesInitDatas": [],
        "referenceModule": "0x0000000000000000000000000000000000000000",
        "referenceModuleInitData": "0x"
    })
}

pub(crate) fn minimal_message() -> Value {
    json!({
        "bountyId": 1,
        "bid": 100,
        "recipient": "0x0000000000000000000000000000000000000002",
        "revShare": 500,
        "postParams": minimal_post_params(),
        "mirrorParams": {
            "profileId": 0,
            "metadataURI": "",
            "pointedProfileId": 0,
            "pointedPubId": 0,
            "referrerProfileIds": [],
            "referrerPubIds": [],
            "referenceModuleData": "0x"
        },
        "followParams": {
            "datas": [],
            "followTokenIds": [],
            "followerProfileId": 0,
            "idsOfProfilesToFollow": []
        }
    })
}
