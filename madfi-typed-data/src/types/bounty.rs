use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TypedDataError;
use crate::schema::{FOLLOW_PARAMS, MIRROR_PARAMS, POST_PARAMS, RANKED_SETTLE_INPUT};

/// A typed record that maps onto a declared struct type.
pub trait Eip712Struct: Serialize {
    const TYPE_NAME: &'static str;

    /// Converts the record into the message value the registry encodes.
    fn to_message(&self) -> Result<Value, TypedDataError> {
        serde_json::to_value(self).map_err(|e| TypedDataError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostParams {
    pub profile_id: U256,
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    pub action_modules: Vec<Address>,
    pub action_modules_init_datas: Vec<Bytes>,
    pub reference_module: Address,
    pub reference_module_init_data: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorParams {
    pub profile_id: U256,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    pub pointed_profile_id: U256,
    pub pointed_pub_id: U256,
    pub referrer_profile_ids: Vec<U256>,
    pub referrer_pub_ids: Vec<U256>,
    pub reference_module_data: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowParams {
    pub datas: Vec<Bytes>,
    pub follow_token_ids: Vec<U256>,
    pub follower_profile_id: U256,
    pub ids_of_profiles_to_follow: Vec<U256>,
}

/// The message signed to settle a ranked bounty for one winner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSettleInput {
    pub bounty_id: U256,
    pub bid: U256,
    pub recipient: Address,
    pub rev_share: U256,
    pub post_params: PostParams,
    pub mirror_params: MirrorParams,
    pub follow_params: FollowParams,
}

impl Eip712Struct for PostParams {
    const TYPE_NAME: &'static str = POST_PARAMS;
}

impl Eip712Struct for MirrorParams {
    const TYPE_NAME: &'static str = MIRROR_PARAMS;
}

impl Eip712Struct for FollowParams {
    const TYPE_NAME: &'static str = FOLLOW_PARAMS;
}

impl Eip712Struct for RankedSettleInput {
    const TYPE_NAME: &'static str = RANKED_SETTLE_INPUT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_uses_schema_field_names() {
        let message = RankedSettleInput::default().to_message().unwrap();
        let mut keys: Vec<&str> = message
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "bid",
                "bountyId",
                "followParams",
                "mirrorParams",
                "postParams",
                "recipient",
                "revShare",
            ]
        );

        let post = &message["postParams"];
        assert!(post.get("contentURI").is_some());
        assert!(post.get("actionModulesInitDatas").is_some());
        assert!(message["mirrorParams"].get("metadataURI").is_some());
        let follow = &message["followParams"];
        assert!(follow.get("idsOfProfilesToFollow").is_some());
    }
}
