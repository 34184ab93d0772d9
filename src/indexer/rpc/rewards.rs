use std::collections::BTreeMap;
use tracing::warn;

use crate::indexer::rpc::LcdClient;
use crate::indexer::transformations::amounts::parse_numeric;
use crate::models::common::HeightAccount;
use crate::models::errors::RpcError;
use crate::models::rpc::{DecCoin, DelegatorRewards, LcdResponse};
use crate::models::tasks::GetRewardResponse;
use crate::models::transactions::TransactionAmount;

fn dec_coins(coins: &[DecCoin]) -> Vec<TransactionAmount> {
    coins
        .iter()
        .filter_map(|coin| match parse_numeric(&coin.amount) {
            Ok((numeric, exp)) => Some(TransactionAmount::new(&coin.denom, &coin.amount, numeric, exp)),
            Err(e) => {
                warn!(denom = %coin.denom, amount = %coin.amount, error = %e, "Dropping unreadable reward");
                None
            }
        })
        .collect()
}

/// Converts the LCD rewards document into the worker's reward payload.
pub fn to_reward_response(
    params: &HeightAccount,
    response: LcdResponse<DelegatorRewards>,
) -> GetRewardResponse {
    let height = response.height.parse().unwrap_or(params.height);
    let rewards = response.result.total.as_deref().map(dec_coins).unwrap_or_default();

    let validators: BTreeMap<_, _> = response
        .result
        .rewards
        .unwrap_or_default()
        .into_iter()
        .map(|r| {
            let amounts = r.reward.as_deref().map(dec_coins).unwrap_or_default();
            (r.validator_address, amounts)
        })
        .collect();

    GetRewardResponse {
        height,
        account: params.account.clone(),
        rewards,
        validators,
    }
}

impl LcdClient {
    pub(crate) async fn fetch_reward(
        &self,
        params: HeightAccount,
    ) -> Result<GetRewardResponse, RpcError> {
        let path = format!("distribution/delegators/{}/rewards", params.account);
        let query = [("height", params.height.to_string())];

        let response: LcdResponse<DelegatorRewards> = self
            .transport
            .get_json("/distribution/delegators/rewards", &path, &query)
            .await?;

        Ok(to_reward_response(&params, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_reward_conversion() {
        let raw = r#"{"height":"1581000","result":{
            "rewards":[{"validator_address":"kavavaloper1ffcujj05v6220ccxa6qdnpz3j48ng024ykh2df",
                        "reward":[{"denom":"ukava","amount":"12.500000000000000000"}]}],
            "total":[{"denom":"ukava","amount":"12.500000000000000000"},{"denom":"hard","amount":"3"}]
        }}"#;
        let response: LcdResponse<DelegatorRewards> = serde_json::from_str(raw).unwrap();
        let params = HeightAccount {
            height: 0,
            account: "kava1m5ctmu8hlsqm7wqstxykvl8pxdm9dtvzxh9rrq".to_string(),
        };

        let out = to_reward_response(&params, response);
        assert_eq!(out.height, 1_581_000);
        assert_eq!(out.rewards.len(), 2);
        assert_eq!(out.rewards[0].numeric, BigInt::from(12_500_000_000_000_000_000u128));
        assert_eq!(out.rewards[0].exp, 18);
        assert_eq!(out.rewards[1].currency, "hard");
        assert_eq!(
            out.validators["kavavaloper1ffcujj05v6220ccxa6qdnpz3j48ng024ykh2df"].len(),
            1
        );
    }

    #[test]
    fn test_empty_rewards() {
        let response: LcdResponse<DelegatorRewards> =
            serde_json::from_str(r#"{"height":"","result":{"rewards":null,"total":null}}"#).unwrap();
        let params = HeightAccount {
            height: 9,
            account: "kava1m5ctmu8hlsqm7wqstxykvl8pxdm9dtvzxh9rrq".to_string(),
        };
        let out = to_reward_response(&params, response);
        assert_eq!(out.height, 9);
        assert!(out.rewards.is_empty());
        assert!(out.validators.is_empty());
    }
}
