use super::account;
use crate::indexer::transformations::messages::ChainMsg;
use crate::indexer::transformations::reconciler::produce_transfers;
use crate::models::errors::MapperError;
use crate::models::logs::LogFormat;
use crate::models::transactions::SubsetEvent;

/// Every incentive claim carries the same fields; only the event type differs.
pub fn claim_reward_to_sub(msg: &ChainMsg, logf: &LogFormat) -> Result<SubsetEvent, MapperError> {
    let (kind, m) = match msg {
        ChainMsg::IncentiveClaimUsdxMintingReward(m) => ("claim_usdx_minting_reward", m),
        ChainMsg::IncentiveClaimHardReward(m) => ("claim_hard_reward", m),
        ChainMsg::IncentiveClaimDelegatorReward(m) => ("claim_delegator_reward", m),
        _ => {
            return Err(MapperError::UnexpectedMessage {
                expected: "incentive claim",
            });
        }
    };

    let mut se = SubsetEvent::new(kind, "incentive")
        .with_node("sender", account("sender", &m.sender)?)
        .with_additional("multiplier_name", m.multiplier_name.as_str());

    produce_transfers(&mut se, "reward", None, logf)?;
    Ok(se)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::transformations::mappers::fixtures::*;
    use crate::models::proto::kava;

    #[test]
    fn test_claim_variants() {
        let claim = kava::MsgClaimReward {
            sender: DELEGATOR.to_string(),
            multiplier_name: "large".to_string(),
        };
        let logf = transfer_log(&[("recipient", DELEGATOR), ("amount", "3000000hard")]);

        let se = claim_reward_to_sub(&ChainMsg::IncentiveClaimHardReward(claim.clone()), &logf)
            .unwrap();
        assert_eq!(se.kind, vec!["claim_hard_reward"]);
        assert_eq!(se.additional["multiplier_name"], vec!["large"]);
        assert_eq!(se.transfers["reward"][0].amounts[0].currency, "hard");

        let se = claim_reward_to_sub(
            &ChainMsg::IncentiveClaimUsdxMintingReward(claim),
            &LogFormat::default(),
        )
        .unwrap();
        assert_eq!(se.kind, vec!["claim_usdx_minting_reward"]);
    }
}
