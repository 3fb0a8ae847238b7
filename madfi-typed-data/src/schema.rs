//! The ranked settle schema signed by bounty owners.

use indexmap::IndexMap;

use crate::errors::TypedDataError;
use crate::registry::TypedSchemaRegistry;
use crate::types::typed_data::{Domain, Field};

pub const DOMAIN_NAME: &str = "MadFi Bounties";
pub const DOMAIN_VERSION: &str = "1";

pub const RANKED_SETTLE_INPUT: &str = "RankedSettleInput";
pub const POST_PARAMS: &str = "PostParams";
pub const MIRROR_PARAMS: &str = "MirrorParams";
pub const FOLLOW_PARAMS: &str = "FollowParams";

pub const PRIMARY_TYPE: &str = RANKED_SETTLE_INPUT;

// Field order is part of the type hash, never reorder.
const RANKED_SETTLE_INPUT_FIELDS: &[(&str, &str)] = &[
    ("bountyId", "uint256"),
    ("bid", "uint256"),
    ("recipient", "address"),
    ("revShare", "uint256"),
    ("postParams", POST_PARAMS),
    ("mirrorParams", MIRROR_PARAMS),
    ("followParams", FOLLOW_PARAMS),
];

const POST_PARAMS_FIELDS: &[(&str, &str)] = &[
    ("profileId", "uint256"),
    ("contentURI", "string"),
    ("actionModules", "address[]"),
    ("actionModulesInitDatas", "bytes[]"),
    ("referenceModule", "address"),
    ("referenceModuleInitData", "bytes"),
];

const MIRROR_PARAMS_FIELDS: &[(&str, &str)] = &[
    ("profileId", "uint256"),
    ("metadataURI", "string"),
    ("pointedProfileId", "uint256"),
    ("pointedPubId", "uint256"),
    ("referrerProfileIds", "uint256[]"),
    ("referrerPubIds", "uint256[]"),
    ("referenceModuleData", "bytes"),
];

const FOLLOW_PARAMS_FIELDS: &[(&str, &str)] = &[
    ("datas", "bytes[]"),
    ("followTokenIds", "uint256[]"),
    ("followerProfileId", "uint256"),
    ("idsOfProfilesToFollow", "uint256[]"),
];

/// The `{name, version}` domain; `chainId` and `verifyingContract` are added
/// by the deployment.
pub fn default_domain() -> Domain {
    Domain::new(DOMAIN_NAME, DOMAIN_VERSION)
}

pub fn ranked_settle_types() -> IndexMap<String, Vec<Field>> {
    [
        (RANKED_SETTLE_INPUT, RANKED_SETTLE_INPUT_FIELDS),
        (POST_PARAMS, POST_PARAMS_FIELDS),
        (MIRROR_PARAMS, MIRROR_PARAMS_FIELDS),
        (FOLLOW_PARAMS, FOLLOW_PARAMS_FIELDS),
    ]
    .into_iter()
    .map(|(name, fields)| {
        let fields = fields.iter().map(|(n, t)| Field::new(*n, *t)).collect();
        (name.to_string(), fields)
    })
    .collect()
}

/// Builds the ranked settle registry bound to `domain`.
pub fn ranked_settle_registry(domain: Domain) -> Result<TypedSchemaRegistry, TypedDataError> {
    TypedSchemaRegistry::new(domain, PRIMARY_TYPE, ranked_settle_types())
}
